use log::{debug, warn};

use super::config::GAME_STATE_KEY;
use super::state::GameState;
use super::store::SessionStore;

pub fn serialize_game_state(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// Parses a persisted state, rejecting anything the engine could not safely
/// continue from.
pub fn parse_game_state(raw: &str) -> Option<GameState> {
    let state: GameState = match serde_json::from_str(raw) {
        Ok(state) => state,
        Err(err) => {
            warn!("discarding unreadable saved game: {}", err);
            return None;
        }
    };
    if !state.is_well_formed() {
        warn!("discarding saved game that violates board invariants");
        return None;
    }
    Some(state)
}

pub fn load_game_state<S: SessionStore + ?Sized>(store: &S) -> Option<GameState> {
    let raw = match store.get(GAME_STATE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!("could not read saved game: {}", err);
            return None;
        }
    };
    parse_game_state(&raw)
}

pub fn has_saved_game<S: SessionStore + ?Sized>(store: &S) -> bool {
    load_game_state(store).is_some()
}

pub fn save_game_state<S: SessionStore + ?Sized>(store: &S, state: &GameState) {
    let raw = match serialize_game_state(state) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("could not encode game state: {}", err);
            return;
        }
    };
    match store.set(GAME_STATE_KEY, &raw) {
        Ok(()) => debug!("saved game state ({} bytes)", raw.len()),
        Err(err) => warn!("could not save game state: {}", err),
    }
}

pub fn clear_saved_game<S: SessionStore + ?Sized>(store: &S) {
    if let Err(err) = store.remove(GAME_STATE_KEY) {
        warn!("could not clear saved game: {}", err);
    }
}
