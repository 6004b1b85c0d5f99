use log::warn;
use serde::{Deserialize, Serialize};

use super::config::GAME_STATS_KEY;
use super::stats::GameStats;
use super::store::SessionStore;

/// One finished game, as kept in the history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub attempts: u32,
    pub matches: u32,
    pub accuracy: String,
    pub time_formatted: String,
    pub time_in_seconds: u32,
    pub is_complete: bool,
    pub timestamp: i64,
}

impl StatsRecord {
    pub fn from_stats(stats: GameStats, timestamp: i64) -> Self {
        StatsRecord {
            attempts: stats.attempts,
            matches: stats.matches,
            accuracy: stats.accuracy,
            time_formatted: stats.time_formatted,
            time_in_seconds: stats.time_in_seconds,
            is_complete: stats.is_complete,
            timestamp,
        }
    }
}

/// Appends `record` and evicts the oldest entries beyond `limit`.
pub fn push_bounded(history: &mut Vec<StatsRecord>, record: StatsRecord, limit: usize) {
    history.push(record);
    let overflow = history.len().saturating_sub(limit);
    if overflow > 0 {
        history.drain(0..overflow);
    }
}

pub fn recent_records(history: &[StatsRecord], limit: usize) -> Vec<StatsRecord> {
    history.iter().rev().take(limit).cloned().collect()
}

/// Fewest attempts first, then fastest, then most recent.
pub fn top_records(history: &[StatsRecord], limit: usize) -> Vec<StatsRecord> {
    let mut entries = history.to_vec();
    entries.sort_by(|a, b| {
        a.attempts
            .cmp(&b.attempts)
            .then_with(|| a.time_in_seconds.cmp(&b.time_in_seconds))
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
    entries.truncate(limit);
    entries
}

pub fn parse_history(raw: &str, limit: usize) -> Vec<StatsRecord> {
    match serde_json::from_str::<Vec<StatsRecord>>(raw) {
        Ok(mut history) => {
            let overflow = history.len().saturating_sub(limit);
            history.drain(0..overflow);
            history
        }
        Err(err) => {
            warn!("discarding unreadable stats history: {}", err);
            Vec::new()
        }
    }
}

pub fn load_history<S: SessionStore + ?Sized>(store: &S, limit: usize) -> Vec<StatsRecord> {
    match store.get(GAME_STATS_KEY) {
        Ok(Some(raw)) => parse_history(&raw, limit),
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!("could not read stats history: {}", err);
            Vec::new()
        }
    }
}

pub fn save_history<S: SessionStore + ?Sized>(store: &S, history: &[StatsRecord]) {
    let raw = match serde_json::to_string(history) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("could not encode stats history: {}", err);
            return;
        }
    };
    if let Err(err) = store.set(GAME_STATS_KEY, &raw) {
        warn!("could not save stats history: {}", err);
    }
}

pub fn clear_history<S: SessionStore + ?Sized>(store: &S) {
    if let Err(err) = store.remove(GAME_STATS_KEY) {
        warn!("could not clear stats history: {}", err);
    }
}
