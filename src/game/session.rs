use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::clock::Clock;
use super::config::SessionConfig;
use super::engine;
use super::records::{self, StatsRecord};
use super::scheduler::Scheduler;
use super::session_save::{clear_saved_game, load_game_state, save_game_state};
use super::state::{GameState, GameStatus};
use super::stats::GameStats;
use super::store::SessionStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerKind {
    Hide,
    Unhighlight,
}

struct SessionInner<S, T, C>
where
    S: SessionStore,
    T: Scheduler,
    C: Clock,
{
    state: GameState,
    history: Vec<StatsRecord>,
    store: S,
    scheduler: T,
    clock: C,
    config: SessionConfig,
    rng: StdRng,
    game_id: u64,
    hide_handle: Option<T::Handle>,
    highlight_handle: Option<T::Handle>,
}

type SharedInner<S, T, C> = Rc<RefCell<SessionInner<S, T, C>>>;
type WeakInner<S, T, C> = Weak<RefCell<SessionInner<S, T, C>>>;

impl<S, T, C> SessionInner<S, T, C>
where
    S: SessionStore,
    T: Scheduler,
    C: Clock,
{
    fn slot(&mut self, kind: TimerKind) -> &mut Option<T::Handle> {
        match kind {
            TimerKind::Hide => &mut self.hide_handle,
            TimerKind::Unhighlight => &mut self.highlight_handle,
        }
    }

    fn cancel(&mut self, kind: TimerKind) {
        if let Some(handle) = self.slot(kind).take() {
            self.scheduler.cancel(handle);
            debug!("cancelled pending {:?} timer", kind);
        }
    }

    fn cancel_timers(&mut self) {
        self.cancel(TimerKind::Hide);
        self.cancel(TimerKind::Unhighlight);
    }

    /// Drops the current deal: pending timers are cancelled and any task
    /// already queued for it is ignored.
    fn retire_deal(&mut self) {
        self.cancel_timers();
        self.game_id = self.game_id.wrapping_add(1);
    }

    fn record_win(&mut self) {
        let now = self.clock.now_ms();
        let stats = engine::get_game_stats(&self.state, now);
        info!(
            "game won in {} with {} attempts ({})",
            stats.time_formatted, stats.attempts, stats.accuracy
        );
        let limit = self.config.history_limit;
        records::push_bounded(&mut self.history, StatsRecord::from_stats(stats, now), limit);
        records::save_history(&self.store, &self.history);
    }
}

impl<S, T, C> SessionInner<S, T, C>
where
    S: SessionStore + 'static,
    T: Scheduler + 'static,
    C: Clock + 'static,
{
    fn schedule(&mut self, kind: TimerKind, weak: &WeakInner<S, T, C>) {
        self.cancel(kind);
        let delay = match kind {
            TimerKind::Hide => self.config.hide_delay,
            TimerKind::Unhighlight => self.config.highlight_delay,
        };
        let game_id = self.game_id;
        let weak = weak.clone();
        let handle = self
            .scheduler
            .schedule(delay, Box::new(move || fire(&weak, kind, game_id)));
        *self.slot(kind) = Some(handle);
        debug!("armed {:?} timer for {:?}", kind, delay);
    }

    /// Schedules whatever follow-up a restored state still owes.
    fn rearm(&mut self, weak: &WeakInner<S, T, C>) {
        if self.state.is_evaluating {
            self.schedule(TimerKind::Hide, weak);
        }
        if self.state.has_highlight() {
            self.schedule(TimerKind::Unhighlight, weak);
        }
    }

    /// Installs `next`, arms timers the transition calls for, records a win
    /// and persists. Unchanged states are ignored.
    fn commit(&mut self, next: GameState, weak: &WeakInner<S, T, C>) {
        if next == self.state {
            return;
        }
        let previous = std::mem::replace(&mut self.state, next);

        if self.state.is_evaluating && !previous.is_evaluating {
            self.schedule(TimerKind::Hide, weak);
        }
        if self.state.highlighted_count() > previous.highlighted_count() {
            self.schedule(TimerKind::Unhighlight, weak);
        }
        if self.state.game_status == GameStatus::Won && previous.game_status != GameStatus::Won {
            self.record_win();
        }

        save_game_state(&self.store, &self.state);
    }
}

fn fire<S, T, C>(weak: &WeakInner<S, T, C>, kind: TimerKind, game_id: u64)
where
    S: SessionStore + 'static,
    T: Scheduler + 'static,
    C: Clock + 'static,
{
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let mut session = inner.borrow_mut();
    if session.game_id != game_id {
        debug!("dropping stale {:?} timer", kind);
        return;
    }
    // The handle has fired; forget it so it is never cancelled.
    session.slot(kind).take();

    let next = match kind {
        TimerKind::Hide => engine::hide_non_matching_cards(&session.state),
        TimerKind::Unhighlight => engine::remove_highlight(&session.state),
    };
    session.commit(next, weak);
}

/// A single player's memory game, resumable across restarts.
pub struct GameSession<S, T, C>
where
    S: SessionStore,
    T: Scheduler,
    C: Clock,
{
    inner: SharedInner<S, T, C>,
}

impl<S, T, C> GameSession<S, T, C>
where
    S: SessionStore + 'static,
    T: Scheduler + 'static,
    C: Clock + 'static,
{
    /// Restores the saved game from `store` when there is a usable one,
    /// otherwise starts idle.
    pub fn new(store: S, scheduler: T, clock: C, config: SessionConfig) -> Self {
        let state = match load_game_state(&store) {
            Some(state) => {
                info!("resuming saved game ({})", state.game_status.as_str());
                state
            }
            None => engine::create_initial_state(),
        };
        let history = records::load_history(&store, config.history_limit);
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let inner = Rc::new(RefCell::new(SessionInner {
            state,
            history,
            store,
            scheduler,
            clock,
            config,
            rng,
            game_id: 0,
            hide_handle: None,
            highlight_handle: None,
        }));
        inner.borrow_mut().rearm(&Rc::downgrade(&inner));

        GameSession { inner }
    }

    pub fn state(&self) -> GameState {
        self.inner.borrow().state.clone()
    }

    pub fn game_status(&self) -> GameStatus {
        self.inner.borrow().state.game_status
    }

    pub fn is_game_over(&self) -> bool {
        engine::is_game_over(&self.inner.borrow().state)
    }

    /// Deals a new board, discarding whatever game was in progress.
    pub fn start_game(&self) {
        let weak = Rc::downgrade(&self.inner);
        let mut guard = self.inner.borrow_mut();
        let session = &mut *guard;
        session.retire_deal();
        let now = session.clock.now_ms();
        let next = engine::start_game(&mut session.rng, now);
        info!("dealt new board");
        session.commit(next, &weak);
    }

    /// Redeals from any status, including `Won`, without passing through idle.
    pub fn new_game(&self) {
        self.start_game();
    }

    pub fn flip_card(&self, card_id: usize) {
        let weak = Rc::downgrade(&self.inner);
        let mut session = self.inner.borrow_mut();
        let now = session.clock.now_ms();
        let next = engine::flip_card(&session.state, card_id, now);
        if next != session.state {
            debug!("flipped card {}", card_id);
        }
        session.commit(next, &weak);
    }

    pub fn can_flip_card(&self, card_id: usize) -> bool {
        engine::can_flip_card(&self.inner.borrow().state, card_id)
    }

    /// Returns to idle and removes the saved game.
    pub fn reset_game(&self) {
        let mut session = self.inner.borrow_mut();
        session.retire_deal();
        session.state = engine::reset_game();
        clear_saved_game(&session.store);
        info!("game reset");
    }

    pub fn get_stats(&self) -> GameStats {
        let session = self.inner.borrow();
        engine::get_game_stats(&session.state, session.clock.now_ms())
    }

    /// Finished games, oldest first.
    pub fn history(&self) -> Vec<StatsRecord> {
        self.inner.borrow().history.clone()
    }

    pub fn recent_history(&self, limit: usize) -> Vec<StatsRecord> {
        records::recent_records(&self.inner.borrow().history, limit)
    }

    pub fn top_records(&self, limit: usize) -> Vec<StatsRecord> {
        records::top_records(&self.inner.borrow().history, limit)
    }

    pub fn clear_history(&self) {
        let mut session = self.inner.borrow_mut();
        session.history.clear();
        records::clear_history(&session.store);
    }
}

impl<S, T, C> GameSession<S, T, C>
where
    S: SessionStore,
    T: Scheduler,
    C: Clock,
{
    /// Cancels outstanding timers. The game state itself stays saved.
    pub fn shutdown(&self) {
        self.inner.borrow_mut().retire_deal();
    }
}

impl<S, T, C> Drop for GameSession<S, T, C>
where
    S: SessionStore,
    T: Scheduler,
    C: Clock,
{
    fn drop(&mut self) {
        if let Ok(mut session) = self.inner.try_borrow_mut() {
            session.retire_deal();
        }
    }
}
