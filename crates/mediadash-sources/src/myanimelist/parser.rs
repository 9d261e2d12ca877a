use mediadash_models::{MediaEntry, MediaKind, MediaStatus, Progress};
use roxmltree::Node;
use tracing::{debug, info};

use crate::jikan::JikanEntry;
use crate::traits::MetadataLookup;
use crate::xml::{child_text, items, parse_document, parse_pub_date};

const SOURCE: &str = "myanimelist";

/// `"Cowboy Bebop - TV"` -> ("Cowboy Bebop", "TV"), split at the last dash
fn split_title(full_title: &str) -> (String, String) {
    match full_title.rsplit_once(" - ") {
        Some((title, media_type)) => (title.to_string(), media_type.to_string()),
        None => (full_title.to_string(), "Unknown".to_string()),
    }
}

fn mal_id(link: &str, kind: MediaKind) -> Option<String> {
    let mut segments = link.split('/');
    segments.find(|segment| *segment == kind.as_str())?;
    segments.next().filter(|id| !id.is_empty()).map(str::to_string)
}

/// Apply `"<status> - <n> of <m> <unit>"` to an entry. Progress counts go to
/// episodes for anime and to volumes or chapters for manga, depending on the
/// unit.
fn apply_description(entry: &mut MediaEntry, description: &str) {
    let mut parts = description.split(" - ");
    let (Some(status), Some(progress), None) = (parts.next(), parts.next(), parts.next()) else {
        return;
    };
    entry.status = MediaStatus::parse(status);

    let Some((current, rest)) = progress.split_once(" of ") else {
        return;
    };
    if rest.contains(" of ") {
        return;
    }
    let total = rest.split(' ').next().unwrap_or_default();
    let (Ok(current), Ok(total)) = (current.trim().parse::<u32>(), total.trim().parse::<u32>()) else {
        debug!(source = SOURCE, item = %entry.title, progress = %progress, "Unparsable progress");
        return;
    };

    let counts = Progress::new(current, total);
    match entry.kind {
        MediaKind::Anime => entry.episodes = counts,
        MediaKind::Manga if rest.to_lowercase().contains("vol") => entry.volumes = counts,
        MediaKind::Manga => entry.chapters = counts,
    }
}

fn parse_item(item: Node, kind: MediaKind) -> Option<MediaEntry> {
    let full_title = child_text(item, "title").filter(|t| !t.is_empty())?;
    let (title, media_type) = split_title(&full_title);
    let mut entry = MediaEntry::new(kind, title, media_type);

    if let Some(link) = child_text(item, "link").filter(|l| !l.is_empty()) {
        entry.mal_id = mal_id(&link, kind);
        entry.link = Some(link);
    }
    if let Some(description) = child_text(item, "description").filter(|d| !d.is_empty()) {
        apply_description(&mut entry, &description);
    }
    entry.date_updated = child_text(item, "pubDate").and_then(|d| parse_pub_date(&d));

    Some(entry)
}

/// Document pass over an anime or manga list feed, no network access.
pub fn parse_feed(xml: &str, kind: MediaKind) -> Vec<MediaEntry> {
    let Some(doc) = parse_document(xml, SOURCE) else {
        return Vec::new();
    };
    items(&doc).filter_map(|item| parse_item(item, kind)).collect()
}

fn apply_metadata(entry: &mut MediaEntry, meta: JikanEntry) {
    if let Some(image_url) = meta.image_url {
        entry.image_url = image_url;
    }
    entry.synopsis = meta.synopsis;
    entry.score = meta.score;
    entry.genres = meta.genres;
    entry.season = meta.season;
    entry.year = meta.year;
    entry.age_rating = meta.age_rating;
    if entry.kind == MediaKind::Anime {
        entry.studios = meta.studios;
        entry.duration = meta.duration;
    }
    if entry.status.is_none() {
        entry.status = meta.status.as_deref().and_then(MediaStatus::parse);
    }
}

/// Look up Jikan metadata for every entry with a numeric id, one at a time.
pub async fn enrich_entries(entries: Vec<MediaEntry>, metadata: &dyn MetadataLookup) -> Vec<MediaEntry> {
    let mut enriched = Vec::with_capacity(entries.len());
    for mut entry in entries {
        let numeric_id = entry
            .mal_id
            .clone()
            .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()));
        if let Some(id) = numeric_id {
            match metadata.media_info(entry.kind, &id).await {
                Some(meta) => apply_metadata(&mut entry, meta),
                None => debug!(source = SOURCE, item = %entry.title, "No Jikan metadata"),
            }
        }
        enriched.push(entry);
    }
    enriched
}

pub async fn parse_mal_rss(xml: &str, kind: MediaKind, metadata: &dyn MetadataLookup) -> Vec<MediaEntry> {
    let entries = enrich_entries(parse_feed(xml, kind), metadata).await;
    info!(source = SOURCE, kind = kind.as_str(), count = entries.len(), "Parsed MyAnimeList feed");
    entries
}
