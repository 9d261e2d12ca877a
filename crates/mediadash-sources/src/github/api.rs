//! GitHub wire types and their projection into activity records.

use chrono::{DateTime, Utc};
use mediadash_models::{ActivityDetail, Commit, CommitRef, GitHubActivity, IssueRef, Repo};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

const WEB_BASE: &str = "https://github.com";

#[derive(Debug, Deserialize)]
pub(crate) struct GhEvent {
    #[serde(rename = "type")]
    event_type: String,
    created_at: DateTime<Utc>,
    repo: GhEventRepo,
    #[serde(default)]
    payload: GhPayload,
}

#[derive(Debug, Deserialize)]
struct GhEventRepo {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GhPayload {
    action: Option<String>,
    ref_type: Option<String>,
    #[serde(rename = "ref")]
    ref_name: Option<String>,
    commits: Vec<GhPushCommit>,
    issue: Option<GhIssue>,
}

#[derive(Debug, Deserialize)]
struct GhPushCommit {
    sha: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct GhIssue {
    title: String,
    html_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GhRepo {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    pub language: Option<String>,
    pub html_url: String,
}

/// Decode array elements one by one; an element missing required fields is
/// skipped.
fn decode_each<T: DeserializeOwned>(values: Vec<serde_json::Value>, what: &'static str) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(source = "github", item = what, error = %e, "Skipping malformed element");
                None
            }
        })
        .collect()
}

pub(crate) fn decode_events(values: Vec<serde_json::Value>) -> Vec<GhEvent> {
    decode_each(values, "event")
}

pub(crate) fn decode_repos(values: Vec<serde_json::Value>) -> Vec<GhRepo> {
    decode_each(values, "repo")
}

fn repo_url(repo_name: &str) -> String {
    format!("{}/{}", WEB_BASE, repo_name)
}

pub(crate) fn format_activity(event: GhEvent) -> GitHubActivity {
    let url = repo_url(&event.repo.name);
    let payload = event.payload;

    let detail = match event.event_type.as_str() {
        "PushEvent" => ActivityDetail::Push {
            commits: payload
                .commits
                .into_iter()
                .map(|c| CommitRef {
                    url: format!("{}/commit/{}", url, c.sha),
                    message: c.message,
                })
                .collect(),
        },
        "CreateEvent" => ActivityDetail::Create {
            ref_type: payload.ref_type,
            ref_name: payload.ref_name,
        },
        "IssuesEvent" => ActivityDetail::Issues {
            action: payload.action,
            issue: payload.issue.map(|i| IssueRef {
                title: i.title,
                url: i.html_url,
            }),
        },
        "WatchEvent" => ActivityDetail::Watch {
            action: payload.action,
        },
        "PublicEvent" => ActivityDetail::Public,
        _ => ActivityDetail::Other,
    };

    GitHubActivity {
        event_type: event.event_type,
        date: event.created_at,
        repo: event.repo.name,
        url,
        detail,
    }
}

/// Commits of every push event, newest events first as returned by the API.
pub(crate) fn push_commits(events: Vec<GhEvent>) -> Vec<Commit> {
    events
        .into_iter()
        .filter(|e| e.event_type == "PushEvent")
        .flat_map(|event| {
            let repo = event.repo.name;
            let date = event.created_at;
            event.payload.commits.into_iter().map(move |c| Commit {
                url: format!("{}/commit/{}", repo_url(&repo), c.sha),
                repo: repo.clone(),
                message: c.message,
                date,
            })
        })
        .collect()
}

impl From<GhRepo> for Repo {
    fn from(repo: GhRepo) -> Self {
        Repo {
            name: repo.name,
            description: repo.description,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            watchers: repo.watchers_count,
            language: repo.language,
            url: repo.html_url,
        }
    }
}
