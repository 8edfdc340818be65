//! Timer entity and its invariants

use std::{fmt, str::FromStr};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque timer identifier, generated once at creation and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(Uuid);

impl TimerId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TimerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TimerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Longest duration a timer can hold, so that any remaining time fits a
/// signed update
pub const MAX_DURATION: u64 = i64::MAX as u64;

/// Fields of a timer minus its identifier, as supplied to an Add action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimer {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub duration: u64,
    /// Defaults to `duration` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_time: Option<u64>,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default = "Utc::now", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl NewTimer {
    /// A fresh, idle timer with its full duration remaining
    pub fn new(title: impl Into<String>, description: impl Into<String>, duration: u64) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            duration,
            remaining_time: None,
            is_running: false,
            created_at: Utc::now(),
        }
    }
}

/// Partial update applied by an Edit action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

/// A single countdown timer.
///
/// Fields are private so that every mutation goes through a clamping method:
/// `remaining_time` always lies in `[0, duration]`, `duration` is at least one
/// second, and a timer with nothing left is never running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    id: TimerId,
    title: String,
    #[serde(default)]
    description: String,
    duration: u64,
    remaining_time: u64,
    is_running: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
}

impl Timer {
    /// Build a timer from Add fields, clamping them into a valid state
    pub fn create(id: TimerId, fields: NewTimer) -> Self {
        let duration = clamp_duration(fields.duration);
        let remaining_time = fields.remaining_time.unwrap_or(duration).min(duration);
        Self {
            id,
            title: fields.title,
            description: fields.description,
            duration,
            remaining_time,
            is_running: fields.is_running && remaining_time > 0,
            // Persisted with millisecond precision
            created_at: fields.created_at.trunc_subsecs(3),
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Configured length in seconds
    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn remaining_time(&self) -> u64 {
        self.remaining_time
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Nothing left to count down
    pub fn is_complete(&self) -> bool {
        self.remaining_time == 0
    }

    /// Remaining time equals the configured duration
    pub fn is_at_full_duration(&self) -> bool {
        self.remaining_time == self.duration
    }

    /// Merge a partial update. A shorter duration pulls remaining time down
    /// with it; a longer one leaves remaining time untouched.
    pub fn apply(&mut self, update: TimerUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(duration) = update.duration {
            self.duration = clamp_duration(duration);
            self.set_remaining(to_signed(self.remaining_time));
        }
    }

    /// Overwrite remaining time, clamped to `[0, duration]`
    pub fn set_remaining(&mut self, seconds: i64) {
        self.remaining_time = seconds.clamp(0, to_signed(self.duration)) as u64;
        if self.remaining_time == 0 {
            self.is_running = false;
        }
    }

    /// Mark as running; a complete timer stays idle
    pub fn start(&mut self) {
        if !self.is_complete() {
            self.is_running = true;
        }
    }

    pub fn pause(&mut self) {
        self.is_running = false;
    }

    /// Repair a record that came from outside (e.g. persisted state)
    pub fn normalized(mut self) -> Self {
        self.duration = clamp_duration(self.duration);
        self.set_remaining(to_signed(self.remaining_time));
        self
    }
}

fn clamp_duration(seconds: u64) -> u64 {
    seconds.clamp(1, MAX_DURATION)
}

pub(crate) fn to_signed(seconds: u64) -> i64 {
    i64::try_from(seconds).unwrap_or(i64::MAX)
}
