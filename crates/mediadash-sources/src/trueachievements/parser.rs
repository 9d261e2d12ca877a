use chrono::NaiveDate;
use mediadash_models::{GameEntry, Ratio};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

const SOURCE: &str = "trueachievements";
pub const GAME_PLACEHOLDER_IMAGE: &str = "/api/placeholder/300/200";
const DATE_FORMAT: &str = "%d %b %Y";

static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static THUMB_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.gamethumb a").expect("valid selector"));
static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("valid selector"));
static DATE_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.date").expect("valid selector"));

fn parse_number(text: &str) -> Option<u64> {
    text.replace([',', '(', ')'], "").trim().parse().ok()
}

/// `"1,234 of 2,000"` -> (1234, 2000). Anything else is (0, 0).
pub fn parse_ratio(text: &str) -> Ratio {
    let mut parts = text.trim().split(" of ");
    match (parts.next(), parts.next(), parts.next()) {
        (Some(current), Some(total), None) => Ratio::new(
            parse_number(current).unwrap_or(0),
            parse_number(total).unwrap_or(0),
        ),
        _ => Ratio::default(),
    }
}

fn absolute(url: &str, base_url: &str) -> String {
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{}{}", base_url, url)
    }
}

/// Larger artwork for a thumbnail URL
fn hq_image_url(thumb_url: &str) -> String {
    if thumb_url.is_empty() || thumb_url.contains("/api/placeholder/") {
        GAME_PLACEHOLDER_IMAGE.to_string()
    } else {
        thumb_url.replace("/thumbs/", "/xl/")
    }
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn parse_row(row: ElementRef, base_url: &str) -> Option<GameEntry> {
    let cells: Vec<ElementRef> = row.select(&CELL).collect();
    if cells.len() < 5 {
        return None;
    }

    let link = row.select(&THUMB_LINK).next()?;
    let img = link.select(&IMG).next()?;

    let url = absolute(link.value().attr("href").unwrap_or_default(), base_url);
    let image_url = hq_image_url(&absolute(img.value().attr("src").unwrap_or_default(), base_url));

    let achievements = parse_ratio(&cell_text(&cells[2]));
    let ta_points = parse_ratio(&cell_text(&cells[3]));
    let gamerscore = parse_ratio(&cell_text(&cells[4]));

    let last_played = row.select(&DATE_CELL).next().and_then(|cell| {
        let text = cell_text(&cell);
        let parsed = NaiveDate::parse_from_str(&text, DATE_FORMAT).ok();
        if parsed.is_none() && !text.is_empty() {
            debug!(source = SOURCE, date = %text, "Unparsable last-played date");
        }
        parsed
    });

    Some(GameEntry {
        title: img.value().attr("alt").unwrap_or_default().trim().to_string(),
        image_url,
        url,
        achievements,
        gamerscore,
        completion_pct: ta_points.percent(),
        ta_points,
        last_played,
    })
}

/// Parse the games table of a gamer page. Rows without a thumbnail link or
/// with fewer than five cells are skipped.
pub fn parse_games(html: &str, base_url: &str) -> Vec<GameEntry> {
    let document = Html::parse_document(html);
    document
        .select(&ROW)
        .filter_map(|row| parse_row(row, base_url))
        .collect()
}
