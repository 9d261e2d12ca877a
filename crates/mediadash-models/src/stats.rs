//! Summary types produced by the aggregators.

use serde::{Deserialize, Serialize};

use crate::game::GameEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WatchStats {
    pub total_shows: usize,
    pub total_movies: usize,
    pub total_episodes: usize,
    pub total_minutes: u64,
    pub total_hours: f64,
}

/// One calendar month of watch history
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthlyWatchTime {
    /// `YYYY-MM`
    pub month: String,
    /// `Jan 2024`
    pub label: String,
    pub hours: f64,
    /// Distinct show titles watched in the month
    pub shows: usize,
    pub movies: usize,
    pub episodes: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WatchTimeSummary {
    pub months: Vec<MonthlyWatchTime>,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReadingStats {
    pub total_books: usize,
    pub average_rating: f64,
    pub total_pages: u64,
    pub books_per_month: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadingMonth {
    pub month: String,
    pub books_read: usize,
}

/// Books finished per month, oldest month first
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadingHistory {
    pub months: Vec<ReadingMonth>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilmStats {
    pub total: usize,
    pub rated: usize,
    pub rewatches: usize,
    pub avg_rating: Option<f64>,
}

/// Counts for a single anime or manga list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MediaListStats {
    pub total: usize,
    /// Watching (anime) or reading (manga)
    pub current: usize,
    pub completed: usize,
    pub planned: usize,
    pub avg_score: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CombinedMediaStats {
    pub total_anime: usize,
    pub total_manga: usize,
    pub watching: usize,
    pub reading: usize,
    pub completed_anime: usize,
    pub completed_manga: usize,
    pub planned_anime: usize,
    pub planned_manga: usize,
    pub avg_anime_score: Option<f64>,
    pub avg_manga_score: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameStats {
    pub total_games: usize,
    pub total_gamerscore: u64,
    pub average_completion: f64,
    pub completed_games: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AchievementChart {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GamesOverview {
    pub games: Vec<GameEntry>,
    pub stats: GameStats,
    pub chart: AchievementChart,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubStats {
    pub total_commits: u64,
    pub total_repos: usize,
    pub total_prs: u64,
    pub total_issues: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityDay {
    /// `YYYY-MM-DD`
    pub day: String,
    pub count: usize,
}
