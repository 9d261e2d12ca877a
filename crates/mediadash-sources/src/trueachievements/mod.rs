pub mod parser;

use mediadash_models::GameEntry;
use tracing::info;

use crate::error::SourceError;
use crate::fetcher::{FeedFetcher, FeedProfile};

pub use parser::{parse_games, parse_ratio};

/// Scrapes the games table of a TrueAchievements gamer profile
#[derive(Clone)]
pub struct TrueAchievementsClient {
    fetcher: FeedFetcher,
    base_url: String,
    username: String,
}

impl std::fmt::Debug for TrueAchievementsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueAchievementsClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl TrueAchievementsClient {
    pub fn new(fetcher: FeedFetcher, username: String, base_url: String) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
        }
    }

    pub fn games_url(&self) -> String {
        format!("{}/gamer/{}/games", self.base_url, urlencoding::encode(&self.username))
    }

    /// Every game on the profile. An unknown gamer (404) has no games.
    pub async fn games(&self) -> Result<Vec<GameEntry>, SourceError> {
        let url = self.games_url();
        let Some(html) = self
            .fetcher
            .fetch_allow_missing(&url, FeedProfile::TrueAchievements)
            .await?
        else {
            info!(source = "trueachievements", url = %url, "Gamer page not found");
            return Ok(Vec::new());
        };

        let games = parse_games(&html, &self.base_url);
        info!(source = "trueachievements", count = games.len(), "Parsed games list");
        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;
    use axum::http::header;
    use axum::routing::get;
    use axum::Router;

    const PAGE: &str = r#"<table><tr>
        <td class="gamethumb"><a href="/game/Halo-3"><img src="/thumbs/halo.jpg" alt="Halo 3"></a></td>
        <td>Halo 3</td><td>49 of 49</td><td>1,500 of 1,500</td><td>1,000 of 1,000</td>
        <td class="date">01 Jan 2024</td>
    </tr></table>"#;

    #[tokio::test]
    async fn test_games() {
        let router = Router::new().route(
            "/gamer/jane/games",
            get(|| async { ([(header::CONTENT_TYPE, "text/html")], PAGE) }),
        );
        let base = spawn_server(router).await;
        let client = TrueAchievementsClient::new(FeedFetcher::new(), "jane".to_string(), base.clone());

        let games = client.games().await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].url, format!("{}/game/Halo-3", base));
        assert_eq!(games[0].completion_pct, 100.0);
    }

    #[tokio::test]
    async fn test_unknown_gamer_has_no_games() {
        let base = spawn_server(Router::new()).await;
        let client = TrueAchievementsClient::new(FeedFetcher::new(), "nobody".to_string(), base);
        assert!(client.games().await.unwrap().is_empty());
    }
}
