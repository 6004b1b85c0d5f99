use serde::{Deserialize, Serialize};

use super::state::{GameState, PAIR_COUNT};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub attempts: u32,
    pub matches: u32,
    pub accuracy: String,
    pub time_formatted: String,
    pub time_in_seconds: u32,
    pub is_complete: bool,
}

pub fn format_m_ss(total_secs: u32) -> String {
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{}:{:02}", mins, secs)
}

pub fn format_accuracy(matches: u32, attempts: u32) -> String {
    if attempts == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", matches as f64 / attempts as f64 * 100.0)
}

/// Whole seconds between the start of the game and its end, or `now_ms` while
/// the game is still running.
pub fn elapsed_seconds(state: &GameState, now_ms: i64) -> u32 {
    let Some(start) = state.score.start_time else {
        return 0;
    };
    let end = state.score.end_time.unwrap_or(now_ms);
    let millis = end.saturating_sub(start).max(0);
    u32::try_from(millis / 1000).unwrap_or(u32::MAX)
}

pub fn get_game_stats(state: &GameState, now_ms: i64) -> GameStats {
    let score = &state.score;
    let time_in_seconds = elapsed_seconds(state, now_ms);
    GameStats {
        attempts: score.attempts,
        matches: score.matches,
        accuracy: format_accuracy(score.matches, score.attempts),
        time_formatted: format_m_ss(time_in_seconds),
        time_in_seconds,
        is_complete: score.matches as usize == PAIR_COUNT,
    }
}
