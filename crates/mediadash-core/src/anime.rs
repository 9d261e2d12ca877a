use mediadash_models::{CombinedMediaStats, MediaEntry, MediaKind, MediaListStats, MediaStatus};

use crate::newest_first;

/// Counts for one list. "Current" means watching for anime and reading for
/// manga; the average covers scored entries only.
pub fn media_list_stats(entries: &[MediaEntry], kind: MediaKind) -> MediaListStats {
    let (current_status, planned_status) = match kind {
        MediaKind::Anime => (MediaStatus::Watching, MediaStatus::PlanToWatch),
        MediaKind::Manga => (MediaStatus::Reading, MediaStatus::PlanToRead),
    };
    let with_status = |status: MediaStatus| entries.iter().filter(|e| e.status == Some(status)).count();

    let scores: Vec<f64> = entries.iter().filter_map(|e| e.score).filter(|s| *s > 0.0).collect();
    let avg_score = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    MediaListStats {
        total: entries.len(),
        current: with_status(current_status),
        completed: with_status(MediaStatus::Completed),
        planned: with_status(planned_status),
        avg_score,
    }
}

pub fn combine(anime: &MediaListStats, manga: &MediaListStats) -> CombinedMediaStats {
    CombinedMediaStats {
        total_anime: anime.total,
        total_manga: manga.total,
        watching: anime.current,
        reading: manga.current,
        completed_anime: anime.completed,
        completed_manga: manga.completed,
        planned_anime: anime.planned,
        planned_manga: manga.planned,
        avg_anime_score: anime.avg_score,
        avg_manga_score: manga.avg_score,
    }
}

pub fn sort_entries(entries: &mut [MediaEntry]) {
    newest_first(entries, |e| e.date_updated);
}
