use mediadash_models::{ActivityDay, GitHubActivity};
use std::collections::BTreeMap;

/// Event counts per `YYYY-MM-DD`, oldest day first.
pub fn activity_by_day(events: &[GitHubActivity]) -> Vec<ActivityDay> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for event in events {
        *counts.entry(event.date.format("%Y-%m-%d").to_string()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(day, count)| ActivityDay { day, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mediadash_models::ActivityDetail;

    fn event(day: u32, hour: u32) -> GitHubActivity {
        GitHubActivity {
            event_type: "WatchEvent".to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap(),
            repo: "octo/dash".to_string(),
            url: "https://github.com/octo/dash".to_string(),
            detail: ActivityDetail::Watch { action: Some("started".to_string()) },
        }
    }

    #[test]
    fn test_activity_by_day() {
        let events = vec![event(3, 10), event(1, 23), event(3, 1), event(2, 0)];
        let days = activity_by_day(&events);
        assert_eq!(
            days,
            vec![
                ActivityDay { day: "2024-05-01".into(), count: 1 },
                ActivityDay { day: "2024-05-02".into(), count: 1 },
                ActivityDay { day: "2024-05-03".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_no_events() {
        assert!(activity_by_day(&[]).is_empty());
    }
}
