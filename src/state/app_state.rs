//! Server state shared with the HTTP handlers

use std::{sync::Arc, time::Instant};

use super::TimerStore;

/// Everything a request handler needs: the timer store plus server metadata
#[derive(Debug)]
pub struct AppState {
    /// Single owner of the timer collection
    pub timers: Arc<TimerStore>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Where timers are persisted, for status reporting
    pub storage: String,
}

impl AppState {
    pub fn new(timers: Arc<TimerStore>, port: u16, host: String, storage: String) -> Self {
        Self {
            timers,
            start_time: Instant::now(),
            port,
            host,
            storage,
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let seconds = self.start_time.elapsed().as_secs();
        let (hours, minutes, seconds) = crate::utils::split_seconds(seconds);

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
