use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MEDIA_PLACEHOLDER_IMAGE: &str = "/api/placeholder/225/319";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Anime,
    Manga,
}

impl MediaKind {
    /// Path segment used by MyAnimeList and Jikan URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Anime => "anime",
            MediaKind::Manga => "manga",
        }
    }
}

/// List status as written in MyAnimeList feeds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaStatus {
    #[serde(rename = "watching")]
    Watching,
    #[serde(rename = "reading")]
    Reading,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "on-hold")]
    OnHold,
    #[serde(rename = "dropped")]
    Dropped,
    #[serde(rename = "plan to watch")]
    PlanToWatch,
    #[serde(rename = "plan to read")]
    PlanToRead,
}

impl MediaStatus {
    /// Parse a status label case-insensitively. Returns `None` for anything
    /// that is not a list status (e.g. Jikan airing states).
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = text.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "watching" => Some(MediaStatus::Watching),
            "reading" => Some(MediaStatus::Reading),
            "completed" => Some(MediaStatus::Completed),
            "on hold" | "onhold" => Some(MediaStatus::OnHold),
            "dropped" => Some(MediaStatus::Dropped),
            "plan to watch" => Some(MediaStatus::PlanToWatch),
            "plan to read" => Some(MediaStatus::PlanToRead),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progress {
    pub current: u32,
    pub total: u32,
}

impl Progress {
    pub fn new(current: u32, total: u32) -> Self {
        Self { current, total }
    }
}

/// An anime or manga list entry, enriched with Jikan metadata when available
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaEntry {
    pub kind: MediaKind,
    pub title: String,
    /// Format label from the feed title, e.g. "TV" or "Manga"
    pub media_type: String,
    pub status: Option<MediaStatus>,
    pub date_updated: Option<DateTime<Utc>>,
    pub link: Option<String>,
    pub mal_id: Option<String>,
    pub image_url: String,
    pub synopsis: Option<String>,
    pub score: Option<f64>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub studios: Vec<String>,
    pub season: Option<String>,
    pub year: Option<i32>,
    pub age_rating: Option<String>,
    pub duration: Option<String>,
    #[serde(default)]
    pub episodes: Progress,
    #[serde(default)]
    pub chapters: Progress,
    #[serde(default)]
    pub volumes: Progress,
}

impl MediaEntry {
    pub fn new(kind: MediaKind, title: String, media_type: String) -> Self {
        Self {
            kind,
            title,
            media_type,
            status: None,
            date_updated: None,
            link: None,
            mal_id: None,
            image_url: MEDIA_PLACEHOLDER_IMAGE.to_string(),
            synopsis: None,
            score: None,
            genres: Vec::new(),
            studios: Vec::new(),
            season: None,
            year: None,
            age_rating: None,
            duration: None,
            episodes: Progress::default(),
            chapters: Progress::default(),
            volumes: Progress::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_variants() {
        assert_eq!(MediaStatus::parse("Watching"), Some(MediaStatus::Watching));
        assert_eq!(MediaStatus::parse("On-Hold"), Some(MediaStatus::OnHold));
        assert_eq!(MediaStatus::parse("on_hold"), Some(MediaStatus::OnHold));
        assert_eq!(MediaStatus::parse("Plan to Watch"), Some(MediaStatus::PlanToWatch));
        assert_eq!(MediaStatus::parse("Finished Airing"), None);
    }

    #[test]
    fn test_status_serializes_lowercase_label() {
        let json = serde_json::to_string(&MediaStatus::PlanToRead).unwrap();
        assert_eq!(json, "\"plan to read\"");
    }
}
