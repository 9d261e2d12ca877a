use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Episode,
    Movie,
}

/// One play from the Trakt history feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub watched_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(rename = "episode", skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<u32>,
    /// "S01E02 - Title"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_episode_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default)]
    pub runtime_minutes: u32,
}

impl HistoryEntry {
    pub fn episode(
        watched_at: DateTime<Utc>,
        show_title: String,
        episode_title: String,
        season: Option<u32>,
        number: Option<u32>,
        runtime_minutes: u32,
    ) -> Self {
        let full_episode_title = format!(
            "S{:02}E{:02} - {}",
            season.unwrap_or(0),
            number.unwrap_or(0),
            episode_title
        );

        Self {
            kind: HistoryKind::Episode,
            watched_at,
            show_title: Some(show_title),
            episode_title: Some(episode_title),
            season,
            episode_number: number,
            full_episode_title: Some(full_episode_title),
            movie_title: None,
            year: None,
            runtime_minutes,
        }
    }

    pub fn movie(
        watched_at: DateTime<Utc>,
        title: String,
        year: Option<u32>,
        runtime_minutes: u32,
    ) -> Self {
        Self {
            kind: HistoryKind::Movie,
            watched_at,
            show_title: None,
            episode_title: None,
            season: None,
            episode_number: None,
            full_episode_title: None,
            movie_title: Some(title),
            year,
            runtime_minutes,
        }
    }
}
