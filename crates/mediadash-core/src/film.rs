use mediadash_models::{FilmStats, LoggedMovie};

use crate::newest_first;

pub fn film_stats(movies: &[LoggedMovie]) -> FilmStats {
    let ratings: Vec<u8> = movies.iter().filter_map(|m| m.rating).collect();
    let avg_rating = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().map(|r| *r as f64).sum::<f64>() / ratings.len() as f64)
    };

    FilmStats {
        total: movies.len(),
        rated: ratings.len(),
        rewatches: movies.iter().filter(|m| m.rewatch).count(),
        avg_rating,
    }
}

pub fn sort_films(movies: &mut [LoggedMovie]) {
    newest_first(movies, |m| m.watched_date);
}
