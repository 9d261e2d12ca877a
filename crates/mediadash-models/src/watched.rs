use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WatchedKind {
    Show,
    Movie,
    Episode,
}

/// A show, movie or episode from the Trakt watched lists, optionally carrying
/// TMDb artwork.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedItem {
    pub kind: WatchedKind,
    pub title: String,
    pub year: Option<u32>,
    #[serde(default)]
    pub overview: String,
    pub runtime_minutes: u32,
    pub play_count: u32,
    pub last_watched_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub genres: BTreeSet<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Aired episode count (shows only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u32>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

impl WatchedItem {
    /// Minutes this record contributes to total watch time.
    ///
    /// Shows contribute nothing here, their time is counted through the
    /// episode list.
    pub fn watch_minutes(&self) -> u64 {
        match self.kind {
            WatchedKind::Show => 0,
            WatchedKind::Movie | WatchedKind::Episode => {
                self.runtime_minutes as u64 * self.play_count as u64
            }
        }
    }
}
