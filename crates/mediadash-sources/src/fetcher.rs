use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{status_error, SourceError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const SCRAPE_TIMEOUT: Duration = Duration::from_secs(15);

const DESKTOP_CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Shared HTTP client; per-request timeouts are set by each caller
pub fn create_http_client() -> Client {
    Client::builder()
        .timeout(SCRAPE_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Header set used when requesting a feed or page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedProfile {
    Goodreads,
    Letterboxd,
    MyAnimeList,
    TrueAchievements,
    Generic,
}

impl FeedProfile {
    pub fn source_name(&self) -> &'static str {
        match self {
            FeedProfile::Goodreads => "goodreads",
            FeedProfile::Letterboxd => "letterboxd",
            FeedProfile::MyAnimeList => "myanimelist",
            FeedProfile::TrueAchievements => "trueachievements",
            FeedProfile::Generic => "feed",
        }
    }

    fn headers(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            FeedProfile::Goodreads => &[
                ("User-Agent", DESKTOP_CHROME_UA),
                (
                    "Accept",
                    "application/rss+xml, application/xml, application/atom+xml, text/xml;q=0.9, */*;q=0.8",
                ),
                ("Accept-Language", "en-US,en;q=0.5"),
            ],
            FeedProfile::Letterboxd | FeedProfile::MyAnimeList => &[
                ("User-Agent", "Mozilla/5.0"),
                ("Accept", "application/rss+xml, application/xml"),
            ],
            FeedProfile::TrueAchievements => &[
                ("User-Agent", DESKTOP_CHROME_UA),
                (
                    "Accept",
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                ),
                ("Accept-Language", "en-US,en;q=0.5"),
            ],
            FeedProfile::Generic => &[],
        }
    }

    fn timeout(&self) -> Duration {
        match self {
            FeedProfile::TrueAchievements => SCRAPE_TIMEOUT,
            _ => DEFAULT_TIMEOUT,
        }
    }

    fn content_type_matches(&self, content_type: &str) -> bool {
        match self {
            FeedProfile::TrueAchievements => content_type.contains("html"),
            FeedProfile::Generic => true,
            _ => content_type.contains("xml") || content_type.contains("rss"),
        }
    }
}

/// Check that a configured URL has a scheme and a host.
pub fn validate_url(url: &str, source_name: &'static str) -> Result<Url, SourceError> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| SourceError::not_configured(source_name, format!("invalid URL {}: {}", url, e)))?;
    if parsed.host_str().is_none() || !matches!(parsed.scheme(), "http" | "https") {
        return Err(SourceError::not_configured(
            source_name,
            format!("invalid URL format: {}", url),
        ));
    }
    Ok(parsed)
}

/// Fetches RSS feeds and scraped pages with per-site request headers.
#[derive(Clone)]
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new() -> Self {
        Self::with_client(create_http_client())
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch `url` and return the body. Any non-2xx status is an error.
    pub async fn fetch(&self, url: &str, profile: FeedProfile) -> Result<String, SourceError> {
        match self.fetch_inner(url, profile, false).await? {
            Some(body) => Ok(body),
            None => Err(SourceError::Status {
                source_name: profile.source_name(),
                status: StatusCode::NOT_FOUND.as_u16(),
                body: String::new(),
            }),
        }
    }

    /// Like [`fetch`](Self::fetch), but a 404 yields `Ok(None)`.
    pub async fn fetch_allow_missing(
        &self,
        url: &str,
        profile: FeedProfile,
    ) -> Result<Option<String>, SourceError> {
        self.fetch_inner(url, profile, true).await
    }

    async fn fetch_inner(
        &self,
        url: &str,
        profile: FeedProfile,
        allow_missing: bool,
    ) -> Result<Option<String>, SourceError> {
        let source_name = profile.source_name();
        let url = validate_url(url, source_name)?;

        let mut request = self.client.get(url.clone()).timeout(profile.timeout());
        for (name, value) in profile.headers() {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(SourceError::http(source_name))?;
        let status = response.status();
        debug!(source = source_name, url = %url, status = status.as_u16(), "Fetched feed");

        if status == StatusCode::NOT_FOUND && allow_missing {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(source_name, response).await);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();
        if !profile.content_type_matches(&content_type) {
            warn!(source = source_name, url = %url, content_type = %content_type, "Unexpected content type");
        }

        let body = response.text().await.map_err(SourceError::http(source_name))?;
        Ok(Some(body))
    }
}

impl Default for FeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, StatusCode as AxumStatus};
    use axum::routing::get;
    use axum::Router;
    use crate::test_support::spawn_server as spawn;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://letterboxd.com/me/rss/", "letterboxd").is_ok());
        assert!(validate_url("letterboxd.com/me/rss", "letterboxd")
            .unwrap_err()
            .is_not_configured());
        assert!(validate_url("ftp://example.com/feed", "letterboxd").is_err());
    }

    #[tokio::test]
    async fn test_fetch_sends_profile_headers() {
        let router = Router::new().route(
            "/rss",
            get(|headers: HeaderMap| async move {
                let ua = headers
                    .get(header::USER_AGENT)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                ([(header::CONTENT_TYPE, "application/rss+xml")], ua)
            }),
        );
        let base = spawn(router).await;

        let body = FeedFetcher::new()
            .fetch(&format!("{}/rss", base), FeedProfile::Letterboxd)
            .await
            .unwrap();
        assert_eq!(body, "Mozilla/5.0");
    }

    #[tokio::test]
    async fn test_fetch_unexpected_content_type_still_returns_body() {
        let router = Router::new().route("/rss", get(|| async { "<rss/>" }));
        let base = spawn(router).await;

        let body = FeedFetcher::new()
            .fetch(&format!("{}/rss", base), FeedProfile::MyAnimeList)
            .await
            .unwrap();
        assert_eq!(body, "<rss/>");
    }

    #[tokio::test]
    async fn test_fetch_status_error() {
        let router = Router::new().route(
            "/rss",
            get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn(router).await;

        let err = FeedFetcher::new()
            .fetch(&format!("{}/rss", base), FeedProfile::Goodreads)
            .await
            .unwrap_err();
        match err {
            SourceError::Status { source_name, status, body } => {
                assert_eq!(source_name, "goodreads");
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_allow_missing() {
        let base = spawn(Router::new()).await;

        let body = FeedFetcher::new()
            .fetch_allow_missing(&format!("{}/gamer/nobody/games", base), FeedProfile::TrueAchievements)
            .await
            .unwrap();
        assert!(body.is_none());
    }
}
