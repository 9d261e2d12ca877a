//! Trakt watch statistics.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use mediadash_models::{HistoryEntry, HistoryKind, MonthlyWatchTime, WatchStats, WatchTimeSummary, WatchedItem};
use std::collections::{BTreeSet, HashMap};

use crate::{newest_first, round_to};

/// Number of calendar months covered by the watch-time histogram
pub const WATCH_TIME_MONTHS: u32 = 6;

/// Totals over the watched lists. Time counts every episode once and every
/// movie once per play; shows add nothing beyond their episodes.
pub fn watch_stats(shows: &[WatchedItem], movies: &[WatchedItem], episodes: &[WatchedItem]) -> WatchStats {
    let total_minutes: u64 = episodes
        .iter()
        .chain(movies.iter())
        .map(WatchedItem::watch_minutes)
        .sum();

    WatchStats {
        total_shows: shows.len(),
        total_movies: movies.len(),
        total_episodes: episodes.len(),
        total_minutes,
        total_hours: round_to(total_minutes as f64 / 60.0, 1),
    }
}

#[derive(Default)]
struct MonthBucket<'a> {
    minutes: u64,
    shows: BTreeSet<&'a str>,
    movies: usize,
    episodes: usize,
}

fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Hours watched per calendar month for the current month and the five
/// before it, oldest first. Months without history are zero-filled.
pub fn monthly_watch_time(history: &[HistoryEntry], now: DateTime<Utc>) -> WatchTimeSummary {
    let mut buckets: HashMap<String, MonthBucket> = HashMap::new();
    for entry in history {
        let bucket = buckets.entry(month_key(entry.watched_at.date_naive())).or_default();
        bucket.minutes += entry.runtime_minutes as u64;
        match entry.kind {
            HistoryKind::Episode => {
                bucket.episodes += 1;
                if let Some(show) = entry.show_title.as_deref() {
                    bucket.shows.insert(show);
                }
            }
            HistoryKind::Movie => bucket.movies += 1,
        }
    }

    let first_of_month = now.date_naive().with_day(1).unwrap_or(now.date_naive());
    let months: Vec<MonthlyWatchTime> = (0..WATCH_TIME_MONTHS)
        .rev()
        .filter_map(|back| first_of_month.checked_sub_months(Months::new(back)))
        .map(|date| {
            let key = month_key(date);
            let bucket = buckets.remove(&key).unwrap_or_default();
            MonthlyWatchTime {
                label: date.format("%b %Y").to_string(),
                month: key,
                hours: round_to(bucket.minutes as f64 / 60.0, 1),
                shows: bucket.shows.len(),
                movies: bucket.movies,
                episodes: bucket.episodes,
            }
        })
        .collect();

    let total_hours = round_to(months.iter().map(|m| m.hours).sum(), 1);
    WatchTimeSummary { months, total_hours }
}

/// History entries, most recent play first
pub fn sort_history(entries: &mut [HistoryEntry]) {
    entries.sort_by(|a, b| b.watched_at.cmp(&a.watched_at));
}

/// Watched shows, most recently watched first
pub fn sort_shows(shows: &mut [WatchedItem]) {
    newest_first(shows, |s| s.last_watched_at);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mediadash_models::WatchedKind;

    fn item(kind: WatchedKind, runtime: u32, plays: u32) -> WatchedItem {
        WatchedItem {
            kind,
            title: "Item".to_string(),
            year: None,
            overview: String::new(),
            runtime_minutes: runtime,
            play_count: plays,
            last_watched_at: None,
            genres: Default::default(),
            rating: 0.0,
            status: None,
            network: None,
            total_episodes: None,
            tmdb_id: None,
            poster_url: None,
            backdrop_url: None,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 20, 0, 0).unwrap()
    }

    #[test]
    fn test_watch_stats_formula() {
        let shows = vec![item(WatchedKind::Show, 45, 30)];
        let movies = vec![item(WatchedKind::Movie, 120, 2), item(WatchedKind::Movie, 90, 1)];
        let episodes = vec![item(WatchedKind::Episode, 45, 1), item(WatchedKind::Episode, 50, 1)];

        let stats = watch_stats(&shows, &movies, &episodes);
        assert_eq!(stats.total_shows, 1);
        assert_eq!(stats.total_movies, 2);
        assert_eq!(stats.total_episodes, 2);
        // 45 + 50 + 120 * 2 + 90
        assert_eq!(stats.total_minutes, 425);
        assert_eq!(stats.total_hours, 7.1);
    }

    #[test]
    fn test_watch_stats_empty() {
        let stats = watch_stats(&[], &[], &[]);
        assert_eq!(stats, WatchStats::default());
    }

    #[test]
    fn test_monthly_watch_time_empty_history() {
        let summary = monthly_watch_time(&[], at(2024, 3, 15));

        assert_eq!(summary.months.len(), 6);
        let keys: Vec<_> = summary.months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(keys, vec!["2023-10", "2023-11", "2023-12", "2024-01", "2024-02", "2024-03"]);
        assert_eq!(summary.months[5].label, "Mar 2024");
        assert!(summary.months.iter().all(|m| m.hours == 0.0 && m.episodes == 0));
        assert_eq!(summary.total_hours, 0.0);
    }

    #[test]
    fn test_monthly_watch_time_buckets() {
        let history = vec![
            HistoryEntry::episode(at(2024, 3, 1), "Severance".into(), "Pilot".into(), Some(1), Some(1), 60),
            HistoryEntry::episode(at(2024, 3, 2), "Severance".into(), "Half Loop".into(), Some(1), Some(2), 30),
            HistoryEntry::episode(at(2024, 3, 3), "Andor".into(), "Kassa".into(), Some(1), Some(1), 40),
            HistoryEntry::movie(at(2024, 1, 31), "Heat".into(), Some(1995), 170),
            HistoryEntry::movie(at(2023, 1, 10), "Too old".into(), None, 100),
        ];

        let summary = monthly_watch_time(&history, at(2024, 3, 31));
        let march = &summary.months[5];
        assert_eq!(march.episodes, 3);
        assert_eq!(march.shows, 2);
        assert_eq!(march.hours, 2.2);

        let january = &summary.months[3];
        assert_eq!(january.month, "2024-01");
        assert_eq!(january.movies, 1);
        assert_eq!(january.hours, 2.8);

        assert_eq!(summary.total_hours, 5.0);
    }

    #[test]
    fn test_monthly_watch_time_crosses_year_boundary_on_month_end() {
        // Calendar months, not 30-day steps: no month is skipped or repeated
        let summary = monthly_watch_time(&[], at(2024, 7, 31));
        let keys: Vec<_> = summary.months.iter().map(|m| m.month.clone()).collect();
        assert_eq!(keys, vec!["2024-02", "2024-03", "2024-04", "2024-05", "2024-06", "2024-07"]);
    }

    #[test]
    fn test_sort_history() {
        let mut history = vec![
            HistoryEntry::movie(at(2024, 1, 1), "A".into(), None, 0),
            HistoryEntry::movie(at(2024, 3, 1), "B".into(), None, 0),
        ];
        sort_history(&mut history);
        assert_eq!(history[0].movie_title.as_deref(), Some("B"));
    }

    #[test]
    fn test_sort_shows_undated_last() {
        let mut old = item(WatchedKind::Show, 0, 0);
        old.title = "Old".into();
        old.last_watched_at = Some(at(2020, 1, 1));
        let mut new = item(WatchedKind::Show, 0, 0);
        new.title = "New".into();
        new.last_watched_at = Some(at(2024, 1, 1));
        let undated = item(WatchedKind::Show, 0, 0);

        let mut shows = vec![undated, old, new];
        sort_shows(&mut shows);
        assert_eq!(shows[0].title, "New");
        assert_eq!(shows[1].title, "Old");
        assert_eq!(shows[2].title, "Item");
    }
}
