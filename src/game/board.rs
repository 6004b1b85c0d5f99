use rand::Rng;
use rand::seq::SliceRandom;

use super::state::{CARD_COUNT, Card, PAIR_COUNT};

pub const SYMBOLS: [&str; 24] = [
    // Animals
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐮",
    // Fruits
    "🍎", "🍐", "🍊", "🍋", "🍌", "🍉", "🍇", "🍓", "🍒", "🍑", "🥝", "🥥",
];

/// Deals a fresh 4x4 board: eight distinct symbols, each twice, in random
/// positions. Card ids are the final positions.
pub fn initialize_board<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut symbol_pool = SYMBOLS.to_vec();
    symbol_pool.shuffle(rng);

    let mut values = Vec::with_capacity(CARD_COUNT);
    for symbol in symbol_pool.into_iter().take(PAIR_COUNT) {
        values.push(symbol);
        values.push(symbol);
    }

    values.shuffle(rng);

    values
        .into_iter()
        .enumerate()
        .map(|(idx, symbol)| Card::new(idx, symbol))
        .collect()
}
