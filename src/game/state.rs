use serde::{Deserialize, Serialize};

pub const PAIR_COUNT: usize = 8;
pub const CARD_COUNT: usize = PAIR_COUNT * 2;

/// Maximum number of face-up cards awaiting evaluation.
pub const MAX_REVEALED: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: usize,
    pub emoji: String,
    pub pair_id: String,
    pub is_revealed: bool,
    pub is_matched: bool,
    pub is_highlighted: bool,
}

impl Card {
    pub fn new(id: usize, symbol: &str) -> Self {
        Card {
            id,
            emoji: symbol.to_string(),
            pair_id: symbol.to_string(),
            is_revealed: false,
            is_matched: false,
            is_highlighted: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Idle,
    Playing,
    Won,
}

impl GameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Idle => "idle",
            GameStatus::Playing => "playing",
            GameStatus::Won => "won",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub attempts: u32,
    pub matches: u32,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub cards: Vec<Card>,
    pub score: Score,
    pub game_status: GameStatus,
    pub revealed_cards: Vec<usize>,
    pub is_evaluating: bool,
}

impl GameState {
    pub fn card(&self, id: usize) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn has_highlight(&self) -> bool {
        self.cards.iter().any(|card| card.is_highlighted)
    }

    pub fn highlighted_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_highlighted).count()
    }

    /// Checks the structural invariants a restored state must satisfy before
    /// the engine is allowed to operate on it.
    pub fn is_well_formed(&self) -> bool {
        match self.game_status {
            GameStatus::Idle => {
                if !self.cards.is_empty() || !self.revealed_cards.is_empty() || self.is_evaluating {
                    return false;
                }
            }
            GameStatus::Playing | GameStatus::Won => {
                if self.cards.len() != CARD_COUNT {
                    return false;
                }
            }
        }

        if self.cards.iter().enumerate().any(|(idx, card)| card.id != idx) {
            return false;
        }
        if self.cards.iter().any(|card| card.is_matched && !card.is_revealed) {
            return false;
        }
        for card in &self.cards {
            let mates = self
                .cards
                .iter()
                .filter(|other| other.pair_id == card.pair_id)
                .count();
            if mates != 2 {
                return false;
            }
        }

        if self.revealed_cards.len() > MAX_REVEALED {
            return false;
        }
        for (pos, id) in self.revealed_cards.iter().enumerate() {
            if self.revealed_cards[..pos].contains(id) {
                return false;
            }
            match self.card(*id) {
                Some(card) if card.is_revealed && !card.is_matched => {}
                _ => return false,
            }
        }
        let face_up = self
            .cards
            .iter()
            .filter(|card| card.is_revealed && !card.is_matched)
            .count();
        if face_up != self.revealed_cards.len() {
            return false;
        }
        if self.is_evaluating != (self.revealed_cards.len() == MAX_REVEALED) {
            return false;
        }

        let matched_cards = self.cards.iter().filter(|card| card.is_matched).count() as u32;
        if self.score.matches as usize > PAIR_COUNT || matched_cards != self.score.matches * 2 {
            return false;
        }
        if self.score.matches > self.score.attempts {
            return false;
        }
        let won = self.score.matches as usize == PAIR_COUNT;
        if won != (self.game_status == GameStatus::Won) {
            return false;
        }
        won == self.score.end_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_board() -> Vec<Card> {
        (0..CARD_COUNT)
            .map(|idx| Card::new(idx, &format!("s{}", idx / 2)))
            .collect()
    }

    #[test]
    fn default_state_is_idle_and_well_formed() {
        let state = GameState::default();
        assert_eq!(state.game_status, GameStatus::Idle);
        assert!(state.cards.is_empty());
        assert!(state.is_well_formed());
    }

    #[test]
    fn idle_state_with_cards_is_rejected() {
        let state = GameState {
            cards: sample_board(),
            ..GameState::default()
        };
        assert!(!state.is_well_formed());
    }

    #[test]
    fn matched_card_must_be_revealed() {
        let mut state = GameState {
            cards: sample_board(),
            game_status: GameStatus::Playing,
            ..GameState::default()
        };
        assert!(state.is_well_formed());
        state.cards[0].is_matched = true;
        state.cards[1].is_matched = true;
        state.score.matches = 1;
        state.score.attempts = 1;
        assert!(!state.is_well_formed());
        state.cards[0].is_revealed = true;
        state.cards[1].is_revealed = true;
        assert!(state.is_well_formed());
    }

    #[test]
    fn face_up_card_must_be_tracked_as_revealed() {
        let mut state = GameState {
            cards: sample_board(),
            game_status: GameStatus::Playing,
            ..GameState::default()
        };
        state.cards[0].is_revealed = true;
        assert!(!state.is_well_formed());
        state.revealed_cards = vec![0];
        assert!(state.is_well_formed());
    }

    #[test]
    fn full_reveal_list_requires_evaluation() {
        let mut state = GameState {
            cards: sample_board(),
            game_status: GameStatus::Playing,
            ..GameState::default()
        };
        state.cards[0].is_revealed = true;
        state.cards[2].is_revealed = true;
        state.revealed_cards = vec![0, 2];
        assert!(!state.is_well_formed());
        state.is_evaluating = true;
        state.score.attempts = 1;
        assert!(state.is_well_formed());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let state = GameState {
            cards: vec![Card::new(0, "🐶")],
            game_status: GameStatus::Playing,
            ..GameState::default()
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["gameStatus"], "playing");
        assert_eq!(json["revealedCards"], serde_json::json!([]));
        assert_eq!(json["isEvaluating"], false);
        assert_eq!(json["score"]["startTime"], serde_json::Value::Null);
        assert_eq!(json["cards"][0]["pairId"], "🐶");
        assert_eq!(json["cards"][0]["isHighlighted"], false);
    }
}
