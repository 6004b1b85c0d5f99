pub mod board;
pub mod clock;
pub mod config;
pub mod engine;
pub mod records;
pub mod scheduler;
pub mod session;
pub mod session_save;
pub mod state;
pub mod stats;
pub mod store;
