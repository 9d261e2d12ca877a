use mediadash_models::{Book, ReadingHistory, ReadingMonth, ReadingStats};
use std::collections::BTreeMap;

use crate::{newest_first, round_to};

const AVERAGE_DAYS_PER_MONTH: f64 = 30.44;

pub fn reading_stats(books: &[Book]) -> ReadingStats {
    if books.is_empty() {
        return ReadingStats::default();
    }

    let total_books = books.len();
    let ratings: Vec<f64> = books.iter().filter_map(|b| b.rating).filter(|r| *r > 0.0).collect();
    let average_rating = if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().sum::<f64>() / ratings.len() as f64
    };
    let total_pages = books.iter().filter_map(|b| b.pages).map(u64::from).sum();

    let dates: Vec<_> = books.iter().filter_map(|b| b.date_read).collect();
    let books_per_month = match (dates.iter().min(), dates.iter().max()) {
        (Some(first), Some(last)) => {
            let months = (*last - *first).num_days() as f64 / AVERAGE_DAYS_PER_MONTH;
            if months > 0.0 {
                total_books as f64 / months
            } else {
                total_books as f64
            }
        }
        _ => 0.0,
    };

    ReadingStats {
        total_books,
        average_rating: round_to(average_rating, 2),
        total_pages,
        books_per_month: round_to(books_per_month, 1),
    }
}

/// Books finished per `YYYY-MM`, oldest month first. Undated books are not
/// counted.
pub fn monthly_reading(books: &[Book]) -> ReadingHistory {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for date in books.iter().filter_map(|b| b.date_read) {
        *counts.entry(date.format("%Y-%m").to_string()).or_default() += 1;
    }

    ReadingHistory {
        months: counts
            .into_iter()
            .map(|(month, books_read)| ReadingMonth { month, books_read })
            .collect(),
    }
}

pub fn sort_books(books: &mut [Book]) {
    newest_first(books, |b| b.date_read);
}
