use async_trait::async_trait;
use mediadash_models::MediaKind;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::cache::MetadataCache;
use super::rate_limit::RateLimiter;
use crate::error::SourceError;
use crate::fetcher::DEFAULT_TIMEOUT;
use crate::traits::MetadataLookup;

const SOURCE: &str = "jikan";

// === API Response Types ===

#[derive(Debug, Deserialize)]
struct JikanResponse<T> {
    data: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JikanMedia {
    images: Option<JikanImages>,
    synopsis: Option<String>,
    score: Option<f64>,
    genres: Vec<JikanNamed>,
    studios: Vec<JikanNamed>,
    season: Option<String>,
    year: Option<i32>,
    rating: Option<String>,
    duration: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct JikanImages {
    jpg: Option<JikanImageSet>,
}

#[derive(Debug, Default, Deserialize)]
struct JikanImageSet {
    image_url: Option<String>,
    small_image_url: Option<String>,
    large_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JikanNamed {
    name: String,
}

/// Metadata for one anime or manga, reduced to what list entries display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JikanEntry {
    /// Best available cover: large, then regular, then small
    pub image_url: Option<String>,
    pub synopsis: Option<String>,
    pub score: Option<f64>,
    pub genres: Vec<String>,
    pub studios: Vec<String>,
    pub season: Option<String>,
    pub year: Option<i32>,
    pub age_rating: Option<String>,
    pub duration: Option<String>,
    /// Publication state such as "Finished Airing"
    pub status: Option<String>,
}

impl From<JikanMedia> for JikanEntry {
    fn from(media: JikanMedia) -> Self {
        let image_url = media
            .images
            .and_then(|images| images.jpg)
            .and_then(|jpg| {
                [jpg.large_image_url, jpg.image_url, jpg.small_image_url]
                    .into_iter()
                    .flatten()
                    .find(|url| !url.is_empty())
            });

        JikanEntry {
            image_url,
            synopsis: media.synopsis,
            score: media.score,
            genres: media.genres.into_iter().map(|g| g.name).collect(),
            studios: media.studios.into_iter().map(|s| s.name).collect(),
            season: media.season,
            year: media.year,
            age_rating: media.rating,
            duration: media.duration,
            status: media.status,
        }
    }
}

/// Jikan API client with rate limiting and a metadata cache
#[derive(Clone)]
pub struct JikanClient {
    client: Client,
    base_url: String,
    limiter: RateLimiter,
    cache: MetadataCache,
}

impl JikanClient {
    pub fn new(base_url: String, min_interval: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(SourceError::http(SOURCE))?;
        Ok(Self::with_client(client, base_url, min_interval))
    }

    pub fn with_client(client: Client, base_url: String, min_interval: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::new(min_interval),
            cache: MetadataCache::new(),
        }
    }

    /// Replace the cache, e.g. to share one between clients
    pub fn with_cache(mut self, cache: MetadataCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Metadata for an anime or manga. Cached entries are returned without
    /// touching the network; failures are logged and not cached.
    pub async fn get_media_info(&self, kind: MediaKind, mal_id: &str) -> Option<JikanEntry> {
        if let Some(entry) = self.cache.get(kind, mal_id) {
            debug!(source = "jikan", kind = kind.as_str(), id = mal_id, "Using cached metadata");
            return Some(entry);
        }

        self.limiter.acquire().await;

        let url = format!("{}/v4/{}/{}", self.base_url, kind.as_str(), mal_id);
        debug!(source = "jikan", url = %url, "Fetching metadata");

        let response = match self.client.get(&url).timeout(DEFAULT_TIMEOUT).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(source = "jikan", url = %url, error = %e, "Jikan request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(source = "jikan", url = %url, status = response.status().as_u16(), "Jikan API error");
            return None;
        }

        let media: JikanResponse<JikanMedia> = match response.json().await {
            Ok(media) => media,
            Err(e) => {
                warn!(source = "jikan", url = %url, error = %e, "Failed to decode Jikan response");
                return None;
            }
        };

        let entry = JikanEntry::from(media.data);
        self.cache.insert(kind, mal_id, entry.clone());
        Some(entry)
    }
}

#[async_trait]
impl MetadataLookup for JikanClient {
    async fn media_info(&self, kind: MediaKind, mal_id: &str) -> Option<JikanEntry> {
        self.get_media_info(kind, mal_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    async fn jikan_server(hits: Arc<AtomicUsize>) -> String {
        let router = Router::new()
            .route(
                "/v4/:kind/:id",
                get(
                    |State(hits): State<Arc<AtomicUsize>>, Path((kind, id)): Path<(String, String)>| async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        if id == "404" {
                            return Err(StatusCode::NOT_FOUND);
                        }
                        Ok(Json(json!({ "data": {
                            "images": { "jpg": {
                                "image_url": format!("https://cdn/{kind}/{id}.jpg"),
                                "small_image_url": "https://cdn/small.jpg",
                                "large_image_url": null
                            } },
                            "synopsis": "A story",
                            "score": 8.5,
                            "genres": [{ "mal_id": 1, "name": "Action" }],
                            "studios": [{ "mal_id": 2, "name": "Sunrise" }],
                            "season": "spring",
                            "year": 1998,
                            "rating": "R - 17+",
                            "duration": "24 min per ep",
                            "status": "Finished Airing"
                        } })))
                    },
                ),
            )
            .with_state(hits);
        spawn_server(router).await
    }

    #[tokio::test]
    async fn test_constructors() {
        assert!(JikanClient::new("https://api.jikan.moe".to_string(), Duration::from_secs(4)).is_ok());

        let hits = Arc::new(AtomicUsize::new(0));
        let base = jikan_server(hits.clone()).await;
        let client = JikanClient::with_client(Client::new(), format!("{}/", base), Duration::from_millis(10));
        assert!(client.get_media_info(MediaKind::Manga, "2").await.is_some());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_media_info_maps_fields() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = jikan_server(hits).await;
        let client = JikanClient::new(base, Duration::from_millis(10)).unwrap();

        let entry = client.get_media_info(MediaKind::Anime, "1").await.unwrap();
        assert_eq!(entry.image_url.as_deref(), Some("https://cdn/anime/1.jpg"));
        assert_eq!(entry.genres, vec!["Action"]);
        assert_eq!(entry.studios, vec!["Sunrise"]);
        assert_eq!(entry.year, Some(1998));
        assert_eq!(entry.age_rating.as_deref(), Some("R - 17+"));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = jikan_server(hits.clone()).await;
        let client = JikanClient::new(base, Duration::from_secs(30)).unwrap();

        let first = client.get_media_info(MediaKind::Anime, "1").await;
        let start = Instant::now();
        let second = client.get_media_info(MediaKind::Anime, "1").await;

        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        // A cache hit does not wait for the limiter
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = jikan_server(hits.clone()).await;
        let client = JikanClient::new(base, Duration::from_millis(10)).unwrap();

        assert!(client.get_media_info(MediaKind::Manga, "404").await.is_none());
        assert!(client.get_media_info(MediaKind::Manga, "404").await.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(client.cache().is_empty());
    }

    #[tokio::test]
    async fn test_minimum_spacing_between_calls() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = jikan_server(hits.clone()).await;
        let client = JikanClient::new(base, Duration::from_millis(200)).unwrap();

        let start = Instant::now();
        client.get_media_info(MediaKind::Anime, "1").await;
        client.get_media_info(MediaKind::Anime, "2").await;
        client.get_media_info(MediaKind::Manga, "1").await;

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_shared_cache() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = jikan_server(hits.clone()).await;
        let cache = MetadataCache::new();
        let a = JikanClient::new(base.clone(), Duration::from_millis(10)).unwrap().with_cache(cache.clone());
        let b = JikanClient::new(base, Duration::from_millis(10)).unwrap().with_cache(cache);

        a.get_media_info(MediaKind::Anime, "5").await;
        b.get_media_info(MediaKind::Anime, "5").await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
