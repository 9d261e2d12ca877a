pub mod watch;
pub mod reading;
pub mod film;
pub mod anime;
pub mod games;
pub mod github;
pub mod dashboard;

pub use dashboard::{Dashboard, View};

/// Round half away from zero to `places` decimals.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Newest first, records without a date last.
pub(crate) fn newest_first<T, K: Ord>(items: &mut [T], key: impl Fn(&T) -> Option<K>) {
    items.sort_by(|a, b| match (key(a), key(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.345, 1), 2.3);
        assert_eq!(round_to(2.35, 1), 2.4);
        assert_eq!(round_to(1.0 / 3.0, 2), 0.33);
    }

    #[test]
    fn test_newest_first_puts_undated_last() {
        let mut items = vec![(1, None), (2, Some(5)), (3, Some(9)), (4, None)];
        newest_first(&mut items, |(_, k)| *k);
        assert_eq!(items.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![3, 2, 1, 4]);
    }
}
