use chrono::{Duration, SecondsFormat, Utc};
use mediadash_models::{Commit, GitHubActivity, GitHubStats, Repo};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::api::{decode_events, decode_repos, format_activity, push_commits, GhRepo};
use crate::error::SourceError;
use crate::fetcher::{create_http_client, DEFAULT_TIMEOUT};

const SOURCE: &str = "github";
const REPO_LIMIT: usize = 10;
const COMMIT_LIMIT: usize = 20;
const STATS_WINDOW_DAYS: i64 = 30;

/// Client for the public GitHub REST API of one user
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    username: String,
    token: Option<String>,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    pub fn new(username: String, token: Option<String>, base_url: String) -> Self {
        Self::with_client(create_http_client(), username, token, base_url)
    }

    pub fn with_client(client: Client, username: String, token: Option<String>, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            token,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, SourceError> {
        self.get_allowing(path, query, None)
            .await?
            .ok_or_else(|| SourceError::decode(SOURCE, "empty response"))
    }

    /// GET a JSON document. A response with status `missing_status` yields
    /// `Ok(None)`.
    async fn get_allowing<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        missing_status: Option<StatusCode>,
    ) -> Result<Option<T>, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .get(&url)
            .query(query)
            .timeout(DEFAULT_TIMEOUT)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "GitHub-Activity-Tracker");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request.send().await.map_err(SourceError::http(SOURCE))?;
        let status = response.status();
        debug!(source = SOURCE, url = %url, status = status.as_u16(), "GitHub request");

        if Some(status) == missing_status {
            return Ok(None);
        }
        match status {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => {
                return Err(SourceError::Auth {
                    source_name: SOURCE,
                    message: "GitHub authentication failed - check your token".to_string(),
                })
            }
            StatusCode::FORBIDDEN => return Err(SourceError::RateLimited { source_name: SOURCE }),
            _ => return Err(crate::error::status_error(SOURCE, response).await),
        }

        response
            .json()
            .await
            .map(Some)
            .map_err(|e| SourceError::decode(SOURCE, e))
    }

    fn user_path(&self, suffix: &str) -> String {
        format!("/users/{}/{}", urlencoding::encode(&self.username), suffix)
    }

    async fn public_events(&self) -> Result<Vec<super::api::GhEvent>, SourceError> {
        let values: Vec<serde_json::Value> = self.get(&self.user_path("events/public"), &[]).await?;
        Ok(decode_events(values))
    }

    async fn user_repos(&self, query: &[(&str, &str)]) -> Result<Vec<GhRepo>, SourceError> {
        let values: Vec<serde_json::Value> = self.get(&self.user_path("repos"), query).await?;
        Ok(decode_repos(values))
    }

    /// Recent public events, newest first.
    pub async fn activity(&self) -> Result<Vec<GitHubActivity>, SourceError> {
        let activities: Vec<GitHubActivity> =
            self.public_events().await?.into_iter().map(format_activity).collect();
        info!(source = SOURCE, count = activities.len(), "Fetched GitHub activity");
        Ok(activities)
    }

    /// The 10 most recently updated repositories.
    pub async fn repos(&self) -> Result<Vec<Repo>, SourceError> {
        let repos = self.user_repos(&[("sort", "updated")]).await?;
        Ok(repos.into_iter().take(REPO_LIMIT).map(Repo::from).collect())
    }

    /// Commits carried by recent push events, at most 20.
    pub async fn commits(&self) -> Result<Vec<Commit>, SourceError> {
        let mut commits = push_commits(self.public_events().await?);
        commits.truncate(COMMIT_LIMIT);
        Ok(commits)
    }

    /// Repository count plus commits in the last 30 days, pull requests and
    /// issues summed over every repository. Repositories are visited one at a
    /// time.
    pub async fn stats(&self) -> Result<GitHubStats, SourceError> {
        let repos = self.user_repos(&[]).await?;
        let since = (Utc::now() - Duration::days(STATS_WINDOW_DAYS)).to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut stats = GitHubStats {
            total_repos: repos.len(),
            ..GitHubStats::default()
        };
        for repo in &repos {
            let full_name = if repo.full_name.is_empty() {
                format!("{}/{}", self.username, repo.name)
            } else {
                repo.full_name.clone()
            };

            // An empty repository answers 409 on its commit list.
            let commits: Option<Vec<serde_json::Value>> = self
                .get_allowing(
                    &format!("/repos/{}/commits", full_name),
                    &[("since", since.as_str())],
                    Some(StatusCode::CONFLICT),
                )
                .await?;
            let pulls: Vec<serde_json::Value> = self
                .get(&format!("/repos/{}/pulls", full_name), &[("state", "all")])
                .await?;
            let issues: Vec<serde_json::Value> = self
                .get(&format!("/repos/{}/issues", full_name), &[("state", "all")])
                .await?;

            stats.total_commits += commits.map(|c| c.len()).unwrap_or(0) as u64;
            stats.total_prs += pulls.len() as u64;
            stats.total_issues += issues.len() as u64;
        }

        Ok(stats)
    }
}
