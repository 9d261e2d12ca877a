use mediadash_models::{HistoryEntry, WatchedItem, WatchedKind};
use reqwest::Client;
use tracing::{debug, info};

use crate::error::SourceError;
use crate::tmdb::TmdbMediaType;
use crate::traits::ImageLookup;
use crate::trakt::api::{self, HistoryType};
use crate::trakt::auth::{self, DeviceCode, TokenInfo};

const SOURCE: &str = "trakt";

#[derive(Clone)]
pub struct TraktClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: Option<String>,
    access_token: Option<String>,
}

impl std::fmt::Debug for TraktClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraktClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TraktClient {
    pub fn new(
        client_id: String,
        client_secret: Option<String>,
        access_token: Option<String>,
        base_url: String,
    ) -> Self {
        Self {
            client: auth::create_trakt_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
            access_token,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub async fn watched_shows(&self) -> Result<Vec<WatchedItem>, SourceError> {
        api::get_watched_shows(&self.client, &self.base_url, &self.client_id, self.access_token()).await
    }

    pub async fn watched_movies(&self) -> Result<Vec<WatchedItem>, SourceError> {
        api::get_watched_movies(&self.client, &self.base_url, &self.client_id, self.access_token()).await
    }

    pub async fn watched_episodes(&self) -> Result<Vec<WatchedItem>, SourceError> {
        api::get_watched_episodes(&self.client, &self.base_url, &self.client_id, self.access_token()).await
    }

    pub async fn history(
        &self,
        limit: u32,
        history_type: Option<HistoryType>,
    ) -> Result<Vec<HistoryEntry>, SourceError> {
        api::get_watch_history(
            &self.client,
            &self.base_url,
            &self.client_id,
            self.access_token(),
            limit,
            history_type,
        )
        .await
    }

    pub async fn request_device_code(&self) -> Result<DeviceCode, SourceError> {
        auth::request_device_code(&self.client, &self.base_url, &self.client_id).await
    }

    /// Single exchange attempt for a device code shown to the user earlier.
    pub async fn exchange_device_code(&self, device_code: &str) -> Result<TokenInfo, SourceError> {
        let client_secret = self.client_secret.as_deref().ok_or_else(|| {
            SourceError::not_configured(SOURCE, "TRAKT_CLIENT_SECRET is required for authentication")
        })?;
        let token = auth::exchange_device_code(
            &self.client,
            &self.base_url,
            &self.client_id,
            client_secret,
            device_code,
        )
        .await?;
        info!("Authenticated to Trakt");
        Ok(token)
    }
}

/// Attach TMDb artwork to shows and movies, one lookup at a time. Items
/// without artwork are kept as they are.
pub async fn enrich_images(items: Vec<WatchedItem>, images: &dyn ImageLookup) -> Vec<WatchedItem> {
    let mut enriched = Vec::with_capacity(items.len());
    for mut item in items {
        let media_type = match item.kind {
            WatchedKind::Show => Some(TmdbMediaType::Tv),
            WatchedKind::Movie => Some(TmdbMediaType::Movie),
            WatchedKind::Episode => None,
        };
        if let (Some(media_type), Some(tmdb_id)) = (media_type, item.tmdb_id) {
            match images.images(&tmdb_id.to_string(), media_type).await {
                Some(found) => {
                    item.poster_url = found.poster_url;
                    item.backdrop_url = found.backdrop_url;
                }
                None => debug!(source = SOURCE, title = %item.title, "No TMDb images"),
            }
        }
        enriched.push(item);
    }
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;
    use async_trait::async_trait;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use mediadash_models::Images;
    use serde_json::json;
    use std::collections::BTreeSet;

    struct FakeImages;

    #[async_trait]
    impl ImageLookup for FakeImages {
        async fn images(&self, tmdb_id: &str, media_type: TmdbMediaType) -> Option<Images> {
            if tmdb_id == "1" {
                Some(Images {
                    poster_url: Some(format!("poster-{}", media_type.as_str())),
                    backdrop_url: None,
                })
            } else {
                None
            }
        }
    }

    fn item(kind: WatchedKind, tmdb_id: Option<u32>) -> WatchedItem {
        WatchedItem {
            kind,
            title: "x".to_string(),
            year: None,
            overview: String::new(),
            runtime_minutes: 0,
            play_count: 1,
            last_watched_at: None,
            genres: BTreeSet::new(),
            rating: 0.0,
            status: None,
            network: None,
            total_episodes: None,
            tmdb_id,
            poster_url: None,
            backdrop_url: None,
        }
    }

    #[tokio::test]
    async fn test_enrich_images_keeps_items_without_poster() {
        let items = vec![
            item(WatchedKind::Show, Some(1)),
            item(WatchedKind::Movie, Some(2)),
            item(WatchedKind::Show, None),
        ];
        let enriched = enrich_images(items, &FakeImages).await;
        assert_eq!(enriched.len(), 3);
        assert_eq!(enriched[0].poster_url.as_deref(), Some("poster-tv"));
        assert_eq!(enriched[1].poster_url, None);
        assert_eq!(enriched[2].poster_url, None);
    }

    #[tokio::test]
    async fn test_requests_carry_trakt_headers() {
        let router = Router::new().route(
            "/sync/watched/movies",
            get(|headers: HeaderMap| async move {
                assert_eq!(headers["trakt-api-version"], "2");
                assert_eq!(headers["trakt-api-key"], "cid");
                assert_eq!(headers["authorization"], "Bearer token");
                Json(json!([
                    { "plays": 2, "movie": { "title": "Heat", "runtime": 170, "ids": { "tmdb": 949 } } },
                    "not an object"
                ]))
            }),
        );
        let base = spawn_server(router).await;
        let client = TraktClient::new("cid".into(), None, Some("token".into()), base);

        let movies = client.watched_movies().await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].watch_minutes(), 340);
    }

    #[tokio::test]
    async fn test_non_success_is_status_error() {
        let router = Router::new().route(
            "/sync/history",
            get(|| async { (StatusCode::UNAUTHORIZED, "invalid token") }),
        );
        let base = spawn_server(router).await;
        let client = TraktClient::new("cid".into(), None, None, base);

        let err = client.history(20, None).await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_exchange_without_secret_is_not_configured() {
        let client = TraktClient::new("cid".into(), None, None, "http://127.0.0.1:9".into());
        let err = client.exchange_device_code("dev").await.unwrap_err();
        assert!(err.is_not_configured());
    }
}
