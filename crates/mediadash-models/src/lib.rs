pub mod watched;
pub mod history;
pub mod images;
pub mod book;
pub mod film;
pub mod anime;
pub mod game;
pub mod github;
pub mod stats;

pub use watched::{WatchedItem, WatchedKind};
pub use history::{HistoryEntry, HistoryKind};
pub use images::Images;
pub use book::Book;
pub use film::LoggedMovie;
pub use anime::{MediaEntry, MediaKind, MediaStatus, Progress};
pub use game::{GameEntry, Ratio};
pub use github::{ActivityDetail, Commit, CommitRef, GitHubActivity, IssueRef, Repo};
pub use stats::{
    AchievementChart, ActivityDay, CombinedMediaStats, FilmStats, GameStats, GamesOverview,
    GitHubStats, MediaListStats, MonthlyWatchTime, ReadingHistory, ReadingMonth, ReadingStats, WatchStats,
    WatchTimeSummary,
};
