//! Builds every source client from configuration.
//!
//! Sources without enough configuration are still represented: asking for
//! them yields `SourceError::NotConfigured`, so one missing setting never
//! affects the other sources.

use chrono::Utc;
use mediadash_config::{non_placeholder, Config, CredentialStore};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::fetcher::{FeedFetcher, FeedProfile};
use crate::github::GitHubClient;
use crate::goodreads::GoodreadsClient;
use crate::jikan::JikanClient;
use crate::tmdb::TmdbClient;
use crate::trakt::TraktClient;
use crate::trueachievements::TrueAchievementsClient;

/// RSS feeds read through the shared [`FeedFetcher`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Goodreads,
    Letterboxd,
    MyAnimeListAnime,
    MyAnimeListManga,
}

impl Feed {
    pub fn profile(&self) -> FeedProfile {
        match self {
            Feed::Goodreads => FeedProfile::Goodreads,
            Feed::Letterboxd => FeedProfile::Letterboxd,
            Feed::MyAnimeListAnime | Feed::MyAnimeListManga => FeedProfile::MyAnimeList,
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.profile().source_name()
    }

    /// Environment variable that configures this feed
    pub fn env_var(&self) -> &'static str {
        match self {
            Feed::Goodreads => "GOODREADS_RSS_URL",
            Feed::Letterboxd => "LETTERBOXD_RSS_URL",
            Feed::MyAnimeListAnime => "MAL_ANIME_RSS_URL",
            Feed::MyAnimeListManga => "MAL_MANGA_RSS_URL",
        }
    }
}

fn owned(value: &str) -> Option<String> {
    non_placeholder(value).map(str::to_string)
}

/// One instance of every source client, built once per process
pub struct SourceRegistry {
    fetcher: FeedFetcher,
    tmdb: TmdbClient,
    jikan: JikanClient,
    goodreads_pages: GoodreadsClient,
    trakt: Option<TraktClient>,
    github: Option<GitHubClient>,
    trueachievements: Option<TrueAchievementsClient>,
    goodreads_rss: Option<String>,
    letterboxd_rss: Option<String>,
    mal_anime_rss: Option<String>,
    mal_manga_rss: Option<String>,
}

impl SourceRegistry {
    /// Build every client once. Fails only when an HTTP client cannot be
    /// constructed; missing settings leave the source unconfigured.
    pub fn from_config(config: &Config, credentials: &CredentialStore) -> Result<Self, SourceError> {
        let fetcher = FeedFetcher::new();

        let trakt = owned(&config.trakt.client_id).map(|client_id| {
            let access_token = owned(&config.trakt.access_token).or_else(|| stored_trakt_token(credentials));
            TraktClient::new(
                client_id,
                owned(&config.trakt.client_secret),
                access_token,
                config.trakt.base_url.clone(),
            )
        });

        let github = owned(&config.github.username).map(|username| {
            GitHubClient::new(username, owned(&config.github.token), config.github.base_url.clone())
        });

        let trueachievements = owned(&config.trueachievements.username).map(|username| {
            TrueAchievementsClient::new(fetcher.clone(), username, config.trueachievements.base_url.clone())
        });

        let registry = Self {
            tmdb: TmdbClient::new(owned(&config.tmdb.api_key), config.tmdb.base_url.clone()),
            jikan: JikanClient::new(
                config.myanimelist.jikan_base_url.clone(),
                Duration::from_secs(config.myanimelist.jikan_min_interval_secs),
            )?,
            goodreads_pages: GoodreadsClient::new(config.goodreads.base_url.clone()),
            trakt,
            github,
            trueachievements,
            goodreads_rss: owned(&config.goodreads.rss_url),
            letterboxd_rss: owned(&config.letterboxd.rss_url),
            mal_anime_rss: owned(&config.myanimelist.anime_rss_url),
            mal_manga_rss: owned(&config.myanimelist.manga_rss_url),
            fetcher,
        };
        debug!(sources = ?registry.configured_sources(), "Built source registry");
        Ok(registry)
    }

    pub fn fetcher(&self) -> &FeedFetcher {
        &self.fetcher
    }

    /// Artwork lookups; without an API key every lookup yields nothing
    pub fn tmdb(&self) -> &TmdbClient {
        &self.tmdb
    }

    pub fn jikan(&self) -> &JikanClient {
        &self.jikan
    }

    pub fn goodreads_pages(&self) -> &GoodreadsClient {
        &self.goodreads_pages
    }

    pub fn trakt(&self) -> Result<&TraktClient, SourceError> {
        self.trakt
            .as_ref()
            .ok_or_else(|| SourceError::not_configured("trakt", "TRAKT_CLIENT_ID is not set"))
    }

    pub fn github(&self) -> Result<&GitHubClient, SourceError> {
        self.github
            .as_ref()
            .ok_or_else(|| SourceError::not_configured("github", "GITHUB_USERNAME is not set"))
    }

    pub fn trueachievements(&self) -> Result<&TrueAchievementsClient, SourceError> {
        self.trueachievements.as_ref().ok_or_else(|| {
            SourceError::not_configured("trueachievements", "TRUEACHIEVEMENTS_USERNAME is not set")
        })
    }

    pub fn feed_url(&self, feed: Feed) -> Result<&str, SourceError> {
        let url = match feed {
            Feed::Goodreads => &self.goodreads_rss,
            Feed::Letterboxd => &self.letterboxd_rss,
            Feed::MyAnimeListAnime => &self.mal_anime_rss,
            Feed::MyAnimeListManga => &self.mal_manga_rss,
        };
        url.as_deref()
            .ok_or_else(|| SourceError::not_configured(feed.source_name(), format!("{} is not set", feed.env_var())))
    }

    /// Fetch a configured RSS feed.
    pub async fn fetch_feed(&self, feed: Feed) -> Result<String, SourceError> {
        let url = self.feed_url(feed)?;
        self.fetcher.fetch(url, feed.profile()).await
    }

    pub fn configured_sources(&self) -> Vec<&'static str> {
        let mut sources = Vec::new();
        if self.trakt.is_some() {
            sources.push("trakt");
        }
        if self.tmdb.has_api_key() {
            sources.push("tmdb");
        }
        if self.github.is_some() {
            sources.push("github");
        }
        if self.goodreads_rss.is_some() {
            sources.push("goodreads");
        }
        if self.letterboxd_rss.is_some() {
            sources.push("letterboxd");
        }
        if self.mal_anime_rss.is_some() || self.mal_manga_rss.is_some() {
            sources.push("myanimelist");
        }
        if self.trueachievements.is_some() {
            sources.push("trueachievements");
        }
        sources
    }
}

fn stored_trakt_token(credentials: &CredentialStore) -> Option<String> {
    let token = credentials.get_trakt_access_token()?.clone();
    if let Some(expires) = credentials.get_trakt_token_expires() {
        if expires < Utc::now() {
            warn!("Stored Trakt token expired at {} - run `mediadash auth trakt`", expires);
        }
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn empty_credentials() -> CredentialStore {
        CredentialStore::new(PathBuf::from("/nonexistent/credentials.toml"))
    }

    #[test]
    fn test_unconfigured_sources() {
        let registry = SourceRegistry::from_config(&Config::default(), &empty_credentials()).unwrap();

        assert!(registry.configured_sources().is_empty());
        assert!(registry.trakt().unwrap_err().is_not_configured());
        assert!(registry.github().unwrap_err().is_not_configured());
        assert!(registry.trueachievements().unwrap_err().is_not_configured());

        let err = registry.feed_url(Feed::MyAnimeListManga).unwrap_err();
        assert_eq!(err.source_name(), "myanimelist");
        assert!(err.to_string().contains("MAL_MANGA_RSS_URL"));
    }

    #[test]
    fn test_configured_sources() {
        let mut config = Config::default();
        config.github.username = "octo".to_string();
        config.letterboxd.rss_url = "https://letterboxd.com/jane/rss/".to_string();
        config.myanimelist.anime_rss_url = "https://myanimelist.net/rss.php?type=rw&u=jane".to_string();
        config.trueachievements.username = "YOUR_USERNAME".to_string();

        let registry = SourceRegistry::from_config(&config, &empty_credentials()).unwrap();
        assert_eq!(registry.configured_sources(), vec!["github", "letterboxd", "myanimelist"]);
        assert_eq!(
            registry.feed_url(Feed::Letterboxd).unwrap(),
            "https://letterboxd.com/jane/rss/"
        );
        assert!(registry.feed_url(Feed::MyAnimeListManga).is_err());
    }

    #[test]
    fn test_explicit_trakt_token_wins() {
        let mut credentials = empty_credentials();
        credentials.set_trakt_access_token("stored".to_string());

        let mut config = Config::default();
        config.trakt.client_id = "cid".to_string();
        let registry = SourceRegistry::from_config(&config, &credentials).unwrap();
        assert!(registry.trakt().unwrap().is_authenticated());
        assert_eq!(stored_trakt_token(&credentials).as_deref(), Some("stored"));

        config.trakt.access_token = "explicit".to_string();
        let registry = SourceRegistry::from_config(&config, &empty_credentials()).unwrap();
        assert!(registry.trakt().unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_fetch_unconfigured_feed() {
        let registry = SourceRegistry::from_config(&Config::default(), &empty_credentials()).unwrap();
        let err = registry.fetch_feed(Feed::Goodreads).await.unwrap_err();
        assert!(err.is_not_configured());
    }
}
