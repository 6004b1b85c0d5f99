use log::debug;
use rand::Rng;

use super::board::initialize_board;
use super::state::{GameState, GameStatus, MAX_REVEALED, PAIR_COUNT, Score};
use super::stats::{GameStats, get_game_stats as derive_stats};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    Match,
    Miss,
}

pub fn create_initial_state() -> GameState {
    GameState::default()
}

/// Deals a new board and starts the clock. Valid from any status.
pub fn start_game<R: Rng + ?Sized>(rng: &mut R, now_ms: i64) -> GameState {
    GameState {
        cards: initialize_board(rng),
        score: Score {
            attempts: 0,
            matches: 0,
            start_time: Some(now_ms),
            end_time: None,
        },
        game_status: GameStatus::Playing,
        revealed_cards: Vec::new(),
        is_evaluating: false,
    }
}

pub fn can_flip_card(state: &GameState, card_id: usize) -> bool {
    if state.game_status != GameStatus::Playing
        || state.is_evaluating
        || state.revealed_cards.len() >= MAX_REVEALED
    {
        return false;
    }
    match state.card(card_id) {
        Some(card) => !card.is_revealed && !card.is_matched,
        None => false,
    }
}

pub fn flip_card(state: &GameState, card_id: usize, now_ms: i64) -> GameState {
    if !can_flip_card(state, card_id) {
        return state.clone();
    }

    let mut next = state.clone();
    if let Some(card) = next.cards.iter_mut().find(|card| card.id == card_id) {
        card.is_revealed = true;
    }
    next.revealed_cards.push(card_id);

    if next.revealed_cards.len() == MAX_REVEALED {
        return evaluate_match(&next, now_ms);
    }
    next
}

fn compare_revealed(state: &GameState) -> Option<MatchOutcome> {
    let [first, second] = state.revealed_cards.as_slice() else {
        return None;
    };
    let first = state.card(*first)?;
    let second = state.card(*second)?;
    if first.pair_id == second.pair_id {
        Some(MatchOutcome::Match)
    } else {
        Some(MatchOutcome::Miss)
    }
}

pub fn evaluate_match(state: &GameState, now_ms: i64) -> GameState {
    let Some(outcome) = compare_revealed(state) else {
        return state.clone();
    };

    let mut next = state.clone();
    next.score.attempts = next.score.attempts.saturating_add(1);

    match outcome {
        MatchOutcome::Match => {
            for card in next.cards.iter_mut() {
                if state.revealed_cards.contains(&card.id) {
                    card.is_matched = true;
                    card.is_highlighted = true;
                }
            }
            next.score.matches = next.score.matches.saturating_add(1);
            if next.score.matches as usize == PAIR_COUNT {
                next.game_status = GameStatus::Won;
                next.score.end_time = Some(now_ms);
            }
            next.revealed_cards.clear();
            next.is_evaluating = false;
        }
        MatchOutcome::Miss => {
            next.is_evaluating = true;
        }
    }

    debug!(
        "evaluated {:?} as {:?} (attempts={}, matches={})",
        state.revealed_cards, outcome, next.score.attempts, next.score.matches
    );
    next
}

pub fn hide_non_matching_cards(state: &GameState) -> GameState {
    let mut next = state.clone();
    for card in next.cards.iter_mut() {
        if state.revealed_cards.contains(&card.id) && !card.is_matched {
            card.is_revealed = false;
        }
    }
    next.revealed_cards.clear();
    next.is_evaluating = false;
    next
}

pub fn remove_highlight(state: &GameState) -> GameState {
    let mut next = state.clone();
    for card in next.cards.iter_mut() {
        card.is_highlighted = false;
    }
    next
}

pub fn is_game_over(state: &GameState) -> bool {
    state.score.matches as usize == PAIR_COUNT
}

pub fn reset_game() -> GameState {
    create_initial_state()
}

pub fn get_game_stats(state: &GameState, now_ms: i64) -> GameStats {
    derive_stats(state, now_ms)
}
