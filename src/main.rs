use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use log::info;
use recall_match::{
    FileStore, GameSession, GameState, GameStatus, GlibScheduler, SessionConfig, SystemClock,
};

const BOT_STEP_MS: u64 = 250;

static GLIB_LOGGER: glib::GlibLogger = glib::GlibLogger::new(
    glib::GlibLoggerFormat::Plain,
    glib::GlibLoggerDomain::CrateTarget,
);

/// Remembers every face it has seen, like a player with perfect recall.
#[derive(Default)]
struct Bot {
    seen: HashMap<usize, String>,
}

impl Bot {
    fn observe(&mut self, state: &GameState) {
        for card in state.cards.iter().filter(|card| card.is_revealed) {
            self.seen.insert(card.id, card.pair_id.clone());
        }
    }

    fn known_mate(&self, state: &GameState, id: usize) -> Option<usize> {
        let pair_id = self.seen.get(&id)?;
        state
            .cards
            .iter()
            .filter(|card| card.id != id && !card.is_revealed)
            .find(|card| self.seen.get(&card.id) == Some(pair_id))
            .map(|card| card.id)
    }

    fn known_pair(&self, state: &GameState) -> Option<usize> {
        state
            .cards
            .iter()
            .filter(|card| !card.is_revealed)
            .find(|card| self.known_mate(state, card.id).is_some())
            .map(|card| card.id)
    }

    fn unseen(&self, state: &GameState) -> Option<usize> {
        state
            .cards
            .iter()
            .find(|card| !card.is_revealed && !self.seen.contains_key(&card.id))
            .map(|card| card.id)
    }

    fn any_hidden(state: &GameState) -> Option<usize> {
        state
            .cards
            .iter()
            .find(|card| !card.is_revealed)
            .map(|card| card.id)
    }

    fn choose(&mut self, state: &GameState) -> Option<usize> {
        self.observe(state);
        match state.revealed_cards.as_slice() {
            [first] => self
                .known_mate(state, *first)
                .or_else(|| self.unseen(state))
                .or_else(|| Self::any_hidden(state)),
            [] => self
                .known_pair(state)
                .or_else(|| self.unseen(state))
                .or_else(|| Self::any_hidden(state)),
            _ => None,
        }
    }
}

fn main() {
    if log::set_logger(&GLIB_LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let store = FileStore::default_location();
    info!("saving to {}", store.dir().display());
    let session = Rc::new(GameSession::new(
        store,
        GlibScheduler,
        SystemClock,
        SessionConfig::from_env(),
    ));
    if session.game_status() != GameStatus::Playing {
        session.new_game();
    }

    let main_loop = glib::MainLoop::new(None, false);
    let mut bot = Bot::default();

    glib::timeout_add_local(Duration::from_millis(BOT_STEP_MS), {
        let session = session.clone();
        let main_loop = main_loop.clone();
        move || {
            let state = session.state();
            if state.game_status == GameStatus::Won {
                main_loop.quit();
                return glib::ControlFlow::Break;
            }
            bot.observe(&state);
            if state.is_evaluating {
                return glib::ControlFlow::Continue;
            }
            if let Some(id) = bot.choose(&state)
                && session.can_flip_card(id)
            {
                session.flip_card(id);
            }
            glib::ControlFlow::Continue
        }
    });

    main_loop.run();

    let stats = session.get_stats();
    println!(
        "won: {} matches in {} attempts, accuracy {}, time {}",
        stats.matches, stats.attempts, stats.accuracy, stats.time_formatted
    );
    if let Some(best) = session.top_records(1).first() {
        println!("best: {} attempts in {}", best.attempts, best.time_formatted);
    }
    session.shutdown();
}
