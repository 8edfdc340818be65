//! Background tasks module
//!
//! This module contains the tasks that run alongside the HTTP server: the
//! countdown scheduler and the persistence bridge.

pub mod countdown;
pub mod persistence;

// Re-export main types and functions
pub use countdown::{CountdownScheduler, TickOutcome, TICK_PERIOD};
pub use persistence::{autosave_task, load_timers, restore_timers, save_timers};
