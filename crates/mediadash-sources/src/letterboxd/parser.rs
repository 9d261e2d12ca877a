use chrono::NaiveDate;
use mediadash_models::LoggedMovie;
use regex::Regex;
use roxmltree::Node;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::tmdb::TmdbMediaType;
use crate::traits::ImageLookup;
use crate::xml::{child_text, descendant_text, items, parse_document};

const SOURCE: &str = "letterboxd";
const LETTERBOXD_NS: &str = "https://letterboxd.com";
const RATING_SEPARATOR: &str = " - ★";

/// Namespaces probed for the TMDb id, in order. `None` is the bare element.
const TMDB_NAMESPACES: [Option<&str>; 3] = [
    Some("https://themoviedb.org"),
    None,
    Some("http://themoviedb.org"),
];

static EMBEDDED_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src="([^"]+)""#).expect("valid regex"));

/// Split `"<Name> - ★★★"` into the name and a star count. Half-star glyphs
/// do not count; a title without the separator has no rating.
pub fn split_rating(title: &str) -> (String, Option<u8>) {
    let mut parts = title.split(RATING_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(stars), None) => {
            let count = 1 + stars.trim().chars().filter(|c| *c == '★').count();
            (name.trim().to_string(), Some(count.min(5) as u8))
        }
        _ => (title.to_string(), None),
    }
}

fn tmdb_id(item: Node) -> Option<String> {
    TMDB_NAMESPACES
        .iter()
        .find_map(|ns| descendant_text(item, *ns, "movieId"))
        .filter(|id| !id.is_empty())
}

fn parse_item(item: Node) -> Option<LoggedMovie> {
    let title = child_text(item, "title").filter(|t| !t.is_empty())?;
    let (name, rating) = split_rating(&title);

    let watched_date = descendant_text(item, Some(LETTERBOXD_NS), "watchedDate")
        .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok());
    let rewatch = descendant_text(item, Some(LETTERBOXD_NS), "rewatch").as_deref() == Some("Yes");
    let year = descendant_text(item, Some(LETTERBOXD_NS), "filmYear").and_then(|y| y.parse().ok());

    // The description image stands in until a TMDb poster replaces it
    let poster_url = child_text(item, "description")
        .and_then(|d| EMBEDDED_IMAGE.captures(&d).map(|caps| caps[1].to_string()));

    Some(LoggedMovie {
        title: name,
        rating,
        watched_date,
        rewatch,
        year,
        link: child_text(item, "link").filter(|l| !l.is_empty()),
        tmdb_id: tmdb_id(item),
        poster_url,
        backdrop_url: None,
    })
}

/// Document pass over a diary feed, no network access.
pub fn parse_feed(xml: &str) -> Vec<LoggedMovie> {
    let Some(doc) = parse_document(xml, SOURCE) else {
        return Vec::new();
    };
    items(&doc).filter_map(parse_item).collect()
}

/// Replace artwork with TMDb images for entries that carry a TMDb id. A
/// lookup without a poster keeps the poster found in the description.
pub async fn enrich_images(movies: Vec<LoggedMovie>, images: &dyn ImageLookup) -> Vec<LoggedMovie> {
    let mut enriched = Vec::with_capacity(movies.len());
    for mut movie in movies {
        if let Some(id) = movie.tmdb_id.clone() {
            match images.images(&id, TmdbMediaType::Movie).await {
                Some(found) => {
                    if found.poster_url.is_some() {
                        movie.poster_url = found.poster_url;
                    }
                    movie.backdrop_url = found.backdrop_url;
                }
                None => debug!(source = SOURCE, item = %movie.title, "No TMDb images"),
            }
        }
        enriched.push(movie);
    }
    enriched
}

pub async fn parse_letterboxd_rss(xml: &str, images: &dyn ImageLookup) -> Vec<LoggedMovie> {
    let movies = enrich_images(parse_feed(xml), images).await;
    info!(source = SOURCE, count = movies.len(), "Parsed Letterboxd feed");
    movies
}
