use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitRef {
    pub message: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssueRef {
    pub title: String,
    pub url: String,
}

/// Event-type specific payload of a public GitHub event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityDetail {
    Push { commits: Vec<CommitRef> },
    Create { ref_type: Option<String>, ref_name: Option<String> },
    Issues { action: Option<String>, issue: Option<IssueRef> },
    Watch { action: Option<String> },
    Public,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubActivity {
    #[serde(rename = "type")]
    pub event_type: String,
    pub date: DateTime<Utc>,
    pub repo: String,
    pub url: String,
    pub detail: ActivityDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repo {
    pub name: String,
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub language: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commit {
    pub repo: String,
    pub message: String,
    pub date: DateTime<Utc>,
    pub url: String,
}
