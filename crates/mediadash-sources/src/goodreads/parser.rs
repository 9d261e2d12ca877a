use mediadash_models::Book;
use regex::Regex;
use roxmltree::Node;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::traits::BookDetailsLookup;
use crate::xml::{child_text, items, parse_document, parse_pub_date};

const SOURCE: &str = "goodreads";

static DESCRIPTION_BOOK_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="(?:https://www\.goodreads\.com)?/book/show/(\d+)"#).expect("valid regex")
});
static LINK_BOOK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/book/show/(\d+)").expect("valid regex"));

/// "Jane gave 4 stars to Dune by Frank Herbert" -> "Dune"
fn book_title(title: &str) -> String {
    title
        .split_once(" stars to ")
        .and_then(|(_, rest)| rest.trim().split_once(" by "))
        .map(|(book, _)| book.trim().to_string())
        .unwrap_or_else(|| title.to_string())
}

fn book_id(description: &str, link: Option<&str>) -> Option<String> {
    DESCRIPTION_BOOK_ID
        .captures(description)
        .or_else(|| link.and_then(|l| LINK_BOOK_ID.captures(l)))
        .map(|caps| caps[1].to_string())
}

fn parse_item(item: Node) -> Option<Book> {
    let title = child_text(item, "title").filter(|t| !t.is_empty())?;
    let description = child_text(item, "description").filter(|d| !d.is_empty())?;

    let mut book = Book::new(book_title(&title));
    book.link = child_text(item, "link").filter(|l| !l.is_empty());
    book.book_id = book_id(&description, book.link.as_deref());

    if let Some(pub_date) = child_text(item, "pubDate") {
        book.date_read = parse_pub_date(&pub_date);
        if book.date_read.is_none() {
            debug!(source = SOURCE, item = %book.title, date = %pub_date, "Unparsable pubDate");
        }
    }

    Some(book)
}

/// Document pass over a shelf feed: no network access, book pages are not
/// consulted yet.
pub fn parse_feed(xml: &str) -> Vec<Book> {
    let Some(doc) = parse_document(xml, SOURCE) else {
        return Vec::new();
    };

    items(&doc)
        .filter_map(|item| {
            let book = parse_item(item);
            if book.is_none() {
                debug!(source = SOURCE, "Skipping item without title or description");
            }
            book
        })
        .collect()
}

/// Fill rating, pages, author and cover from the book pages, one book at a
/// time. Books without an id or whose lookup fails keep their defaults.
pub async fn enrich_books(books: Vec<Book>, lookup: &dyn BookDetailsLookup) -> Vec<Book> {
    let mut enriched = Vec::with_capacity(books.len());
    for mut book in books {
        if let Some(id) = book.book_id.clone() {
            if let Some(details) = lookup.book_details(&id).await {
                book.rating = details.rating;
                book.pages = details.pages;
                if let Some(author) = details.author.filter(|a| !a.is_empty()) {
                    book.author = author;
                }
                if let Some(image_url) = details.image_url.filter(|u| !u.is_empty()) {
                    book.image_url = image_url;
                }
            }
        }
        enriched.push(book);
    }
    enriched
}

pub async fn parse_goodreads_rss(xml: &str, lookup: &dyn BookDetailsLookup) -> Vec<Book> {
    let books = enrich_books(parse_feed(xml), lookup).await;
    info!(source = SOURCE, count = books.len(), "Parsed Goodreads feed");
    books
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goodreads::BookDetails;
    use crate::traits::NoEnrichment;
    use async_trait::async_trait;
    use mediadash_models::book::{BOOK_PLACEHOLDER_IMAGE, UNKNOWN_AUTHOR};

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Jane's bookshelf: read</title>
    <item>
      <title>Jane gave 5 stars to Dune (Dune, #1) by Frank Herbert</title>
      <link>https://www.goodreads.com/review/show/111</link>
      <description><![CDATA[<a href="/book/show/44767458-dune"><img src="x.jpg"></a> gave 5 stars]]></description>
      <pubDate>Tue, 05 Mar 2024 10:00:00 -0800</pubDate>
    </item>
    <item>
      <title>The Left Hand of Darkness</title>
      <link>https://www.goodreads.com/book/show/18423.The_Left_Hand_of_Darkness</link>
      <description><![CDATA[<p>no link here</p>]]></description>
      <pubDate>not a date</pubDate>
    </item>
    <item>
      <title>Missing description</title>
      <description></description>
    </item>
    <item>
      <description>Missing title</description>
    </item>
  </channel>
</rss>"#;

    struct FakeLookup;

    #[async_trait]
    impl BookDetailsLookup for FakeLookup {
        async fn book_details(&self, book_id: &str) -> Option<BookDetails> {
            match book_id {
                "44767458" => Some(BookDetails {
                    rating: Some(4.27),
                    pages: Some(658),
                    author: Some("Frank Herbert".to_string()),
                    image_url: Some("https://images/dune.jpg".to_string()),
                }),
                _ => None,
            }
        }
    }

    #[test]
    fn test_book_title() {
        assert_eq!(book_title("Jane gave 4 stars to Dune by Frank Herbert"), "Dune");
        assert_eq!(book_title("Dune"), "Dune");
        assert_eq!(book_title("Jane gave 4 stars to Dune"), "Jane gave 4 stars to Dune");
    }

    #[test]
    fn test_book_id_sources() {
        assert_eq!(book_id(r#"<a href="/book/show/123-x">"#, None).as_deref(), Some("123"));
        assert_eq!(
            book_id(r#"<a href="https://www.goodreads.com/book/show/456.y">"#, None).as_deref(),
            Some("456")
        );
        assert_eq!(
            book_id("plain", Some("https://www.goodreads.com/book/show/789")).as_deref(),
            Some("789")
        );
        assert_eq!(book_id("plain", None), None);
    }

    #[test]
    fn test_parse_feed() {
        let books = parse_feed(FEED);
        assert_eq!(books.len(), 2);

        assert_eq!(books[0].title, "Dune (Dune, #1)");
        assert_eq!(books[0].book_id.as_deref(), Some("44767458"));
        assert_eq!(
            books[0].date_read.map(|d| d.to_rfc3339()).as_deref(),
            Some("2024-03-05T18:00:00+00:00")
        );
        assert_eq!(books[0].author, UNKNOWN_AUTHOR);

        assert_eq!(books[1].book_id.as_deref(), Some("18423"));
        assert_eq!(books[1].date_read, None);
        assert_eq!(books[1].image_url, BOOK_PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_parse_feed_empty_and_malformed() {
        assert!(parse_feed("").is_empty());
        assert!(parse_feed("<rss><channel><item>").is_empty());
    }

    #[tokio::test]
    async fn test_enrichment() {
        let books = parse_goodreads_rss(FEED, &FakeLookup).await;
        assert_eq!(books[0].rating, Some(4.27));
        assert_eq!(books[0].pages, Some(658));
        assert_eq!(books[0].author, "Frank Herbert");
        assert_eq!(books[0].image_url, "https://images/dune.jpg");

        assert_eq!(books[1].rating, None);
        assert_eq!(books[1].author, UNKNOWN_AUTHOR);
    }

    #[tokio::test]
    async fn test_no_enrichment_keeps_defaults() {
        let books = parse_goodreads_rss(FEED, &NoEnrichment).await;
        assert!(books.iter().all(|b| b.rating.is_none() && b.pages.is_none()));
    }
}
