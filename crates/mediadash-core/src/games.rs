use chrono::Datelike;
use mediadash_models::{AchievementChart, GameEntry, GameStats};

use crate::newest_first;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Totals over a games list. Average completion only counts started games.
pub fn game_stats(games: &[GameEntry]) -> GameStats {
    let started: Vec<f64> = games
        .iter()
        .map(|g| g.completion_pct)
        .filter(|pct| *pct > 0.0)
        .collect();
    let average_completion = if started.is_empty() {
        0.0
    } else {
        started.iter().sum::<f64>() / started.len() as f64
    };

    GameStats {
        total_games: games.len(),
        total_gamerscore: games.iter().map(|g| g.gamerscore.current).sum(),
        average_completion,
        completed_games: games.iter().filter(|g| g.completion_pct >= 100.0).count(),
    }
}

/// Achievements earned, summed by the month (of any year) each game was last
/// played. Games without a date are left out.
pub fn achievement_chart(games: &[GameEntry]) -> AchievementChart {
    let mut data = [0u64; 12];
    for game in games {
        if let Some(date) = game.last_played {
            data[date.month0() as usize] += game.achievements.current;
        }
    }

    AchievementChart {
        labels: MONTH_LABELS.iter().map(|m| m.to_string()).collect(),
        data: data.to_vec(),
    }
}

pub fn sort_by_last_played(games: &mut [GameEntry]) {
    newest_first(games, |g| g.last_played);
}
