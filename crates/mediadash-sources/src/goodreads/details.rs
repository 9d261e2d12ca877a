//! Book page scrape for fields the shelf feed does not carry.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};
use tracing::{debug, warn};

use crate::fetcher::{create_http_client, SCRAPE_TIMEOUT};
use crate::traits::BookDetailsLookup;

const SOURCE: &str = "goodreads";
const PAGE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

static RATING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.RatingStatistics__rating").expect("valid selector"));
static COVER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img.ResponsiveImage").expect("valid selector"));
static AUTHOR: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["span.ContributorLink__name", "a.ContributorLink", "a.authorName"]
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .collect()
});
static TEXT_BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div, span, p").expect("valid selector"));

// "Paperback, 320 pages", "Kindle Edition, 12 pages" and friends all end in
// "<n> pages", so one pattern covers every edition format.
static PAGE_COUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*pages").expect("valid regex"));
static SIZE_Y: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_SY\d+_").expect("valid regex"));
static SIZE_X: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_SX\d+_").expect("valid regex"));

/// Fields scraped from a book page. Each one is independently optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDetails {
    pub rating: Option<f64>,
    pub pages: Option<u32>,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

fn element_text(element: scraper::ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Scrape a book page.
pub fn parse_book_page(html: &str) -> BookDetails {
    let document = Html::parse_document(html);

    let rating = document
        .select(&RATING)
        .next()
        .and_then(|el| element_text(el).parse::<f64>().ok());

    let image_url = document
        .select(&COVER)
        .next()
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(|src| {
            let src = SIZE_Y.replace_all(src, "_SY1000_");
            SIZE_X.replace_all(&src, "_SX1000_").into_owned()
        });

    let author = AUTHOR
        .iter()
        .find_map(|selector| document.select(selector).next())
        .map(element_text)
        .filter(|name| !name.is_empty());

    let pages = document.select(&TEXT_BLOCKS).find_map(|el| {
        let text: String = el.text().collect();
        PAGE_COUNT
            .captures(&text)
            .and_then(|caps| caps[1].parse::<u32>().ok())
    });

    BookDetails {
        rating,
        pages,
        author,
        image_url,
    }
}

/// Scraped book details by book id
#[derive(Debug, Clone, Default)]
pub struct BookDetailsCache {
    entries: Arc<RwLock<HashMap<String, BookDetails>>>,
}

impl BookDetailsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, book_id: &str) -> Option<BookDetails> {
        self.entries.read().ok()?.get(book_id).cloned()
    }

    pub fn insert(&self, book_id: &str, details: BookDetails) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(book_id.to_string(), details);
        }
    }
}

/// Fetches Goodreads book pages
#[derive(Clone)]
pub struct GoodreadsClient {
    client: Client,
    base_url: String,
    cache: BookDetailsCache,
}

impl GoodreadsClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: create_http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: BookDetailsCache::new(),
        }
    }

    pub fn with_cache(mut self, cache: BookDetailsCache) -> Self {
        self.cache = cache;
        self
    }

    /// Scrape `/book/show/{id}`. Fetched pages are memoized; a failed fetch
    /// yields `None` and is retried next time.
    pub async fn get_book_details(&self, book_id: &str) -> Option<BookDetails> {
        if let Some(details) = self.cache.get(book_id) {
            return Some(details);
        }

        let url = format!("{}/book/show/{}", self.base_url, book_id);
        debug!(source = SOURCE, url = %url, "Fetching book details");

        let response = match self
            .client
            .get(&url)
            .header("User-Agent", PAGE_USER_AGENT)
            .timeout(SCRAPE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(source = SOURCE, url = %url, error = %e, "Book page request failed");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!(source = SOURCE, url = %url, status = response.status().as_u16(), "Book page returned an error");
            return None;
        }
        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                warn!(source = SOURCE, url = %url, error = %e, "Failed to read book page");
                return None;
            }
        };

        let details = parse_book_page(&html);
        if details.pages.is_none() {
            debug!(source = SOURCE, item = book_id, "Page count not found");
        }
        self.cache.insert(book_id, details.clone());
        Some(details)
    }
}

#[async_trait]
impl BookDetailsLookup for GoodreadsClient {
    async fn book_details(&self, book_id: &str) -> Option<BookDetails> {
        self.get_book_details(book_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::Html as HtmlResponse;
    use axum::routing::get;
    use axum::Router;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PAGE: &str = r#"<html><body>
        <div class="BookPageMetadataSection">
          <span class="ContributorLink__name"> Frank Herbert </span>
          <div class="RatingStatistics__rating">4.27</div>
          <img class="ResponsiveImage" src="https://images.gr-assets.com/books/1555447414i/44767458._SY475_.jpg">
          <p data-testid="pagesFormat">Paperback, 658 pages</p>
        </div>
    </body></html>"#;

    #[test]
    fn test_parse_book_page() {
        let details = parse_book_page(PAGE);
        assert_eq!(details.rating, Some(4.27));
        assert_eq!(details.pages, Some(658));
        assert_eq!(details.author.as_deref(), Some("Frank Herbert"));
        assert_eq!(
            details.image_url.as_deref(),
            Some("https://images.gr-assets.com/books/1555447414i/44767458._SY1000_.jpg")
        );
    }

    #[test]
    fn test_parse_book_page_author_fallback() {
        let html = r#"<a class="authorName">Ursula K. Le Guin</a><span>Kindle Edition, 12 Pages</span>"#;
        let details = parse_book_page(html);
        assert_eq!(details.author.as_deref(), Some("Ursula K. Le Guin"));
        assert_eq!(details.pages, Some(12));
        assert_eq!(details.rating, None);
        assert_eq!(details.image_url, None);
    }

    #[test]
    fn test_parse_book_page_unparsable_rating() {
        let details = parse_book_page(r#"<div class="RatingStatistics__rating">n/a</div>"#);
        assert_eq!(details, BookDetails::default());
    }

    #[tokio::test]
    async fn test_get_book_details_memoizes() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/book/show/:id",
                get(
                    |State(hits): State<Arc<AtomicUsize>>, Path(id): Path<String>, headers: HeaderMap| async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        assert_eq!(headers["user-agent"], PAGE_USER_AGENT);
                        if id == "0" {
                            Err(StatusCode::NOT_FOUND)
                        } else {
                            Ok(HtmlResponse(PAGE))
                        }
                    },
                ),
            )
            .with_state(hits.clone());
        let base = spawn_server(router).await;
        let client = GoodreadsClient::new(base);

        assert_eq!(client.get_book_details("234225").await.unwrap().pages, Some(658));
        assert!(client.get_book_details("234225").await.is_some());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(client.get_book_details("0").await.is_none());
        assert!(client.get_book_details("0").await.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }
}
