pub mod game;

pub use game::clock::{Clock, ManualClock, SystemClock};
pub use game::config::{GAME_STATE_KEY, GAME_STATS_KEY, SessionConfig};
pub use game::records::StatsRecord;
pub use game::scheduler::{GlibScheduler, ManualScheduler, Scheduler};
pub use game::session::GameSession;
pub use game::state::{CARD_COUNT, Card, GameState, GameStatus, PAIR_COUNT, Score};
pub use game::stats::GameStats;
pub use game::store::{FileStore, MemoryStore, SessionStore, StoreError};
