//! Timer Deck - A state-managed HTTP server running countdown timers
//!
//! This library provides the timer model, the reducer-driven store that owns
//! the timer collection, a scheduler that ticks every running timer once per
//! second, and the persistence bridge that keeps the collection on disk.

pub mod api;
pub mod config;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::{AppState, TimerStore};
pub use tasks::CountdownScheduler;
pub use utils::signals::shutdown_signal;
