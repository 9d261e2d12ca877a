use chrono::{DateTime, Utc};
use mediadash_models::{HistoryEntry, WatchedItem, WatchedKind};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::error::{status_error, SourceError};

const SOURCE: &str = "trakt";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TraktIds {
    pub trakt: Option<u64>,
    pub slug: Option<String>,
    pub imdb: Option<String>,
    pub tmdb: Option<u32>,
    pub tvdb: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TraktShow {
    title: Option<String>,
    year: Option<u32>,
    ids: TraktIds,
    overview: Option<String>,
    runtime: Option<u32>,
    genres: Vec<String>,
    rating: Option<f64>,
    status: Option<String>,
    network: Option<String>,
    aired_episodes: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TraktMovie {
    title: Option<String>,
    year: Option<u32>,
    ids: TraktIds,
    overview: Option<String>,
    runtime: Option<u32>,
    genres: Vec<String>,
    rating: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TraktEpisode {
    title: Option<String>,
    season: Option<u32>,
    number: Option<u32>,
    ids: TraktIds,
    overview: Option<String>,
    runtime: Option<u32>,
    rating: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TraktWatchedShow {
    plays: Option<u32>,
    last_watched_at: Option<String>,
    show: Option<TraktShow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TraktWatchedMovie {
    plays: Option<u32>,
    last_watched_at: Option<String>,
    movie: Option<TraktMovie>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TraktWatchedEpisode {
    last_watched_at: Option<String>,
    episode: Option<TraktEpisode>,
    show: Option<TraktShow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TraktHistoryItem {
    watched_at: Option<String>,
    #[serde(rename = "type")]
    item_type: Option<String>,
    movie: Option<TraktMovie>,
    show: Option<TraktShow>,
    episode: Option<TraktEpisode>,
}

/// Filter for `/sync/history`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryType {
    Movies,
    Shows,
    Episodes,
}

impl HistoryType {
    fn as_str(&self) -> &'static str {
        match self {
            HistoryType::Movies => "movies",
            HistoryType::Shows => "shows",
            HistoryType::Episodes => "episodes",
        }
    }
}

fn trakt_get(client: &Client, url: &str, client_id: &str, access_token: Option<&str>) -> RequestBuilder {
    let request = client
        .get(url)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json")
        .header("trakt-api-version", "2")
        .header("trakt-api-key", client_id);
    match access_token {
        Some(token) => request.header("Authorization", format!("Bearer {}", token)),
        None => request,
    }
}

/// GET a JSON array and decode each element on its own, skipping the ones
/// that do not match `T`.
async fn get_array<T: DeserializeOwned>(
    request: RequestBuilder,
    what: &str,
) -> Result<Vec<T>, SourceError> {
    let response = request.send().await.map_err(SourceError::http(SOURCE))?;

    if !response.status().is_success() {
        let err = status_error(SOURCE, response).await;
        warn!(source = SOURCE, error = %err, "Failed to fetch {}", what);
        return Err(err);
    }

    let values: Vec<serde_json::Value> = response
        .json()
        .await
        .map_err(|e| SourceError::decode(SOURCE, e))?;

    let total = values.len();
    let items: Vec<T> = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(source = SOURCE, error = %e, "Skipping malformed {} element", what);
                None
            }
        })
        .collect();
    debug!(source = SOURCE, total, decoded = items.len(), "Fetched {}", what);
    Ok(items)
}

fn parse_timestamp(text: Option<&str>) -> Option<DateTime<Utc>> {
    text.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn genre_set(genres: Vec<String>) -> BTreeSet<String> {
    genres.into_iter().filter(|g| !g.is_empty()).collect()
}

fn map_show(item: TraktWatchedShow) -> Option<WatchedItem> {
    let show = item.show?;
    Some(WatchedItem {
        kind: WatchedKind::Show,
        title: show.title.unwrap_or_default(),
        year: show.year,
        overview: show.overview.unwrap_or_default(),
        runtime_minutes: show.runtime.unwrap_or(0),
        play_count: item.plays.unwrap_or(0),
        last_watched_at: parse_timestamp(item.last_watched_at.as_deref()),
        genres: genre_set(show.genres),
        rating: show.rating.unwrap_or(0.0),
        status: show.status,
        network: show.network,
        total_episodes: show.aired_episodes,
        tmdb_id: show.ids.tmdb,
        poster_url: None,
        backdrop_url: None,
    })
}

fn map_movie(item: TraktWatchedMovie) -> Option<WatchedItem> {
    let movie = item.movie?;
    Some(WatchedItem {
        kind: WatchedKind::Movie,
        title: movie
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Unknown Title".to_string()),
        year: movie.year,
        overview: movie.overview.unwrap_or_default(),
        runtime_minutes: movie.runtime.unwrap_or(0),
        play_count: item.plays.unwrap_or(1),
        last_watched_at: parse_timestamp(item.last_watched_at.as_deref()),
        genres: genre_set(movie.genres),
        rating: movie.rating.unwrap_or(0.0),
        status: None,
        network: None,
        total_episodes: None,
        tmdb_id: movie.ids.tmdb,
        poster_url: None,
        backdrop_url: None,
    })
}

fn map_episode(item: TraktWatchedEpisode) -> Option<WatchedItem> {
    let episode = item.episode?;
    let show_title = item.show.and_then(|s| s.title);
    Some(WatchedItem {
        kind: WatchedKind::Episode,
        title: episode.title.or(show_title).unwrap_or_default(),
        year: None,
        overview: episode.overview.unwrap_or_default(),
        runtime_minutes: episode.runtime.unwrap_or(0),
        // Each element is one watched episode
        play_count: 1,
        last_watched_at: parse_timestamp(item.last_watched_at.as_deref()),
        genres: BTreeSet::new(),
        rating: episode.rating.unwrap_or(0.0),
        status: None,
        network: None,
        total_episodes: None,
        tmdb_id: episode.ids.tmdb,
        poster_url: None,
        backdrop_url: None,
    })
}

fn map_history(item: TraktHistoryItem) -> Option<HistoryEntry> {
    let watched_at = match parse_timestamp(item.watched_at.as_deref()) {
        Some(watched_at) => watched_at,
        None => {
            warn!(source = SOURCE, watched_at = ?item.watched_at, "Skipping history item with invalid timestamp");
            return None;
        }
    };

    match (item.item_type.as_deref(), item.episode, item.show, item.movie) {
        (Some("episode"), Some(episode), Some(show), _) => Some(HistoryEntry::episode(
            watched_at,
            show.title.unwrap_or_default(),
            episode.title.unwrap_or_default(),
            episode.season,
            episode.number,
            episode.runtime.unwrap_or(0),
        )),
        (_, _, _, Some(movie)) => Some(HistoryEntry::movie(
            watched_at,
            movie.title.unwrap_or_default(),
            movie.year,
            movie.runtime.unwrap_or(0),
        )),
        _ => {
            debug!(source = SOURCE, "Skipping history item without episode or movie");
            None
        }
    }
}

pub async fn get_watched_shows(
    client: &Client,
    base_url: &str,
    client_id: &str,
    access_token: Option<&str>,
) -> Result<Vec<WatchedItem>, SourceError> {
    let url = format!("{}/sync/watched/shows?extended=full", base_url);
    let items: Vec<TraktWatchedShow> =
        get_array(trakt_get(client, &url, client_id, access_token), "watched shows").await?;
    Ok(items.into_iter().filter_map(map_show).collect())
}

pub async fn get_watched_movies(
    client: &Client,
    base_url: &str,
    client_id: &str,
    access_token: Option<&str>,
) -> Result<Vec<WatchedItem>, SourceError> {
    let url = format!("{}/sync/watched/movies?extended=full,metadata", base_url);
    let items: Vec<TraktWatchedMovie> =
        get_array(trakt_get(client, &url, client_id, access_token), "watched movies").await?;
    Ok(items.into_iter().filter_map(map_movie).collect())
}

pub async fn get_watched_episodes(
    client: &Client,
    base_url: &str,
    client_id: &str,
    access_token: Option<&str>,
) -> Result<Vec<WatchedItem>, SourceError> {
    let url = format!("{}/sync/watched/episodes?extended=full,metadata", base_url);
    let items: Vec<TraktWatchedEpisode> =
        get_array(trakt_get(client, &url, client_id, access_token), "watched episodes").await?;
    Ok(items.into_iter().filter_map(map_episode).collect())
}

pub async fn get_watch_history(
    client: &Client,
    base_url: &str,
    client_id: &str,
    access_token: Option<&str>,
    limit: u32,
    history_type: Option<HistoryType>,
) -> Result<Vec<HistoryEntry>, SourceError> {
    let mut url = format!("{}/sync/history?limit={}&extended=full,metadata", base_url, limit);
    if let Some(history_type) = history_type {
        url.push_str("&type=");
        url.push_str(history_type.as_str());
    }
    let items: Vec<TraktHistoryItem> =
        get_array(trakt_get(client, &url, client_id, access_token), "watch history").await?;
    Ok(items.into_iter().filter_map(map_history).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediadash_models::HistoryKind;
    use serde_json::json;

    fn decode<T: DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_map_show() {
        let item = decode(json!({
            "plays": 12,
            "last_watched_at": "2024-03-01T20:00:00.000Z",
            "show": {
                "title": "Severance",
                "year": 2022,
                "ids": { "trakt": 1, "tmdb": 95396 },
                "overview": "Office drama",
                "runtime": 50,
                "genres": ["drama", "mystery"],
                "rating": 8.4,
                "status": "returning series",
                "network": "Apple TV+",
                "aired_episodes": 19
            }
        }));
        let show = map_show(item).unwrap();
        assert_eq!(show.kind, WatchedKind::Show);
        assert_eq!(show.title, "Severance");
        assert_eq!(show.play_count, 12);
        assert_eq!(show.total_episodes, Some(19));
        assert_eq!(show.tmdb_id, Some(95396));
        assert_eq!(show.genres.len(), 2);
        assert_eq!(show.watch_minutes(), 0);
        assert_eq!(
            show.last_watched_at.unwrap().to_rfc3339(),
            "2024-03-01T20:00:00+00:00"
        );
    }

    #[test]
    fn test_map_movie_defaults() {
        let item = decode(json!({ "movie": { "runtime": 120 } }));
        let movie = map_movie(item).unwrap();
        assert_eq!(movie.title, "Unknown Title");
        assert_eq!(movie.play_count, 1);
        assert_eq!(movie.watch_minutes(), 120);

        let missing: TraktWatchedMovie = decode(json!({ "plays": 2 }));
        assert!(map_movie(missing).is_none());
    }

    #[test]
    fn test_map_episode_single_play() {
        let item = decode(json!({
            "plays": 3,
            "episode": { "title": "Pilot", "season": 1, "number": 1, "runtime": 45 },
            "show": { "title": "Lost" }
        }));
        let episode = map_episode(item).unwrap();
        assert_eq!(episode.kind, WatchedKind::Episode);
        assert_eq!(episode.title, "Pilot");
        assert_eq!(episode.play_count, 1);
        assert_eq!(episode.watch_minutes(), 45);
    }

    #[test]
    fn test_map_history() {
        let episode = map_history(decode(json!({
            "watched_at": "2024-02-10T21:30:00.000Z",
            "type": "episode",
            "episode": { "title": "The Hunt", "season": 2, "number": 5, "runtime": 48 },
            "show": { "title": "Severance" }
        })))
        .unwrap();
        assert_eq!(episode.kind, HistoryKind::Episode);
        assert_eq!(episode.full_episode_title.as_deref(), Some("S02E05 - The Hunt"));
        assert_eq!(episode.runtime_minutes, 48);

        let movie = map_history(decode(json!({
            "watched_at": "2024-02-11T21:30:00Z",
            "type": "movie",
            "movie": { "title": "Heat", "year": 1995, "runtime": 170 }
        })))
        .unwrap();
        assert_eq!(movie.kind, HistoryKind::Movie);
        assert_eq!(movie.movie_title.as_deref(), Some("Heat"));
        assert_eq!(movie.year, Some(1995));
    }

    #[test]
    fn test_map_history_skips_invalid() {
        let bad_date = decode(json!({
            "watched_at": "last tuesday",
            "type": "movie",
            "movie": { "title": "Heat" }
        }));
        assert!(map_history(bad_date).is_none());

        let nothing = decode(json!({ "watched_at": "2024-02-11T21:30:00Z", "type": "episode" }));
        assert!(map_history(nothing).is_none());
    }
}
