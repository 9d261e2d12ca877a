use async_trait::async_trait;
use mediadash_models::Images;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::fetcher::{create_http_client, DEFAULT_TIMEOUT};
use crate::traits::ImageLookup;

const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";
const BACKDROP_BASE: &str = "https://image.tmdb.org/t/p/w1280";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TmdbMediaType {
    Tv,
    Movie,
}

impl TmdbMediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TmdbMediaType::Tv => "tv",
            TmdbMediaType::Movie => "movie",
        }
    }
}

#[derive(Debug, Deserialize)]
struct TmdbDetails {
    poster_path: Option<String>,
    backdrop_path: Option<String>,
}

/// Artwork client for The Movie Database
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: Option<String>, base_url: String) -> Self {
        Self::with_client(create_http_client(), api_key, base_url)
    }

    pub fn with_client(client: Client, api_key: Option<String>, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Poster and backdrop URLs for a show or movie. Never fails: a missing
    /// key, an empty id or any upstream problem yields `None`.
    pub async fn get_images(&self, tmdb_id: &str, media_type: TmdbMediaType) -> Option<Images> {
        let api_key = self.api_key.as_deref()?;
        let tmdb_id = tmdb_id.trim();
        if tmdb_id.is_empty() {
            return None;
        }

        let url = format!("{}/{}/{}", self.base_url, media_type.as_str(), tmdb_id);
        let response = match self
            .client
            .get(&url)
            .query(&[("api_key", api_key)])
            .timeout(DEFAULT_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(source = "tmdb", url = %url, error = %e, "TMDb request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(source = "tmdb", status = status.as_u16(), body = %error_text, "TMDb API error");
            return None;
        }

        let details: TmdbDetails = match response.json().await {
            Ok(details) => details,
            Err(e) => {
                warn!(source = "tmdb", error = %e, "Failed to decode TMDb response");
                return None;
            }
        };

        debug!(source = "tmdb", id = tmdb_id, media_type = media_type.as_str(), "Fetched TMDb images");
        Some(images_from_paths(details.poster_path, details.backdrop_path))
    }
}

fn images_from_paths(poster_path: Option<String>, backdrop_path: Option<String>) -> Images {
    let non_empty = |p: Option<String>| p.filter(|p| !p.is_empty());
    Images {
        poster_url: non_empty(poster_path).map(|p| format!("{}{}", POSTER_BASE, p)),
        backdrop_url: non_empty(backdrop_path).map(|p| format!("{}{}", BACKDROP_BASE, p)),
    }
}

#[async_trait]
impl ImageLookup for TmdbClient {
    async fn images(&self, tmdb_id: &str, media_type: TmdbMediaType) -> Option<Images> {
        self.get_images(tmdb_id, media_type).await
    }
}
