use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const BOOK_PLACEHOLDER_IMAGE: &str = "/api/placeholder/200/300";

/// A book from the Goodreads shelf feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub title: String,
    pub author: String,
    /// Community average rating scraped from the book page
    pub rating: Option<f64>,
    pub pages: Option<u32>,
    pub date_read: Option<DateTime<Utc>>,
    pub link: Option<String>,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
}

impl Book {
    pub fn new(title: String) -> Self {
        Self {
            title,
            author: UNKNOWN_AUTHOR.to_string(),
            rating: None,
            pages: None,
            date_read: None,
            link: None,
            image_url: BOOK_PLACEHOLDER_IMAGE.to_string(),
            book_id: None,
        }
    }
}
