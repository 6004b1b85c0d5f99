use std::str::FromStr;
use std::time::Duration;

use log::warn;

pub const GAME_STATE_KEY: &str = "memoryGameState";
pub const GAME_STATS_KEY: &str = "memoryGameStats";

const HIDE_DELAY_MS: u64 = 1500;
const HIGHLIGHT_DELAY_MS: u64 = 1000;
const HISTORY_LIMIT: usize = 10;

const ENV_HIDE_DELAY: &str = "RECALL_MATCH_HIDE_DELAY_MS";
const ENV_HIGHLIGHT_DELAY: &str = "RECALL_MATCH_HIGHLIGHT_DELAY_MS";
const ENV_SEED: &str = "RECALL_MATCH_SEED";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long a missed pair stays face up.
    pub hide_delay: Duration,
    /// How long a freshly matched pair stays highlighted.
    pub highlight_delay: Duration,
    pub history_limit: usize,
    pub shuffle_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            hide_delay: Duration::from_millis(HIDE_DELAY_MS),
            highlight_delay: Duration::from_millis(HIGHLIGHT_DELAY_MS),
            history_limit: HISTORY_LIMIT,
            shuffle_seed: None,
        }
    }
}

fn parse_override<T: FromStr>(name: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring {}={:?}: not a valid number", name, raw);
            None
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup` on top of the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(ms) = parse_override::<u64>(ENV_HIDE_DELAY, lookup(ENV_HIDE_DELAY)) {
            config.hide_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_override::<u64>(ENV_HIGHLIGHT_DELAY, lookup(ENV_HIGHLIGHT_DELAY)) {
            config.highlight_delay = Duration::from_millis(ms);
        }
        if let Some(seed) = parse_override::<u64>(ENV_SEED, lookup(ENV_SEED)) {
            config.shuffle_seed = Some(seed);
        }
        config
    }
}
