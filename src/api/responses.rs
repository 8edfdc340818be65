//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{state::Timer, utils::format_time};

/// A timer as shown to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: Timer,
    /// Remaining time as `HH:MM:SS`
    pub display: String,
    pub complete: bool,
}

impl From<&Timer> for TimerView {
    fn from(timer: &Timer) -> Self {
        Self {
            timer: timer.clone(),
            display: format_time(timer.remaining_time()),
            complete: timer.is_complete(),
        }
    }
}

/// Render a whole collection
pub fn views(timers: &[Timer]) -> Vec<TimerView> {
    timers.iter().map(TimerView::from).collect()
}

/// API response structure for collection-changing endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timers: Vec<TimerView>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timers: &[Timer]) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timers: views(timers),
        }
    }

    /// The collection changed
    pub fn applied(message: String, timers: &[Timer]) -> Self {
        Self::new("applied".to_string(), message, timers)
    }

    /// Nothing changed
    pub fn ignored(message: String, timers: &[Timer]) -> Self {
        Self::new("ignored".to_string(), message, timers)
    }
}

/// Error body for 4xx answers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Server and collection overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer_count: usize,
    pub running_count: usize,
    pub completed_count: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub storage: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
