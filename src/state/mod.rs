//! State management module
//!
//! This module contains the timer entity, the actions and reducer that change
//! the collection, the store that owns it, and the server state built on top.

pub mod action;
pub mod app_state;
pub mod store;
pub mod timer;

// Re-export main types
pub use action::{reduce, TimerAction};
pub use app_state::AppState;
pub use store::{Snapshot, TimerEvent, TimerStore};
pub use timer::{NewTimer, Timer, TimerId, TimerUpdate};
