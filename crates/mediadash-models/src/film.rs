use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A diary entry from a Letterboxd RSS feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggedMovie {
    pub title: String,
    /// Whole stars, 1..=5. `None` when the entry carries no rating.
    pub rating: Option<u8>,
    pub watched_date: Option<NaiveDate>,
    pub rewatch: bool,
    pub year: Option<u16>,
    pub link: Option<String>,
    pub tmdb_id: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}
