use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An "<n> of <m>" pair from the TrueAchievements games table
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ratio {
    pub current: u64,
    pub total: u64,
}

impl Ratio {
    pub fn new(current: u64, total: u64) -> Self {
        Self { current, total }
    }

    /// current / total as a percentage, 0 when total is 0
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameEntry {
    pub title: String,
    pub image_url: String,
    pub url: String,
    pub achievements: Ratio,
    pub gamerscore: Ratio,
    pub ta_points: Ratio,
    pub completion_pct: f64,
    pub last_played: Option<NaiveDate>,
}
