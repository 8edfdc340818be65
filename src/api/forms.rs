//! Request bodies and their validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    state::{NewTimer, TimerUpdate},
    utils::join_seconds,
};

/// Longest accepted title, in characters
pub const MAX_TITLE_LEN: usize = 50;

/// Add/edit form as submitted by a client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hours: u64,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

/// Body of `PUT /timers/:id/remaining`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingTimeRequest {
    pub remaining_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("Title must be at most {0} characters")]
    TitleTooLong(usize),
    #[error("Hours must be between 0 and 23")]
    HoursOutOfRange,
    #[error("Minutes must be between 0 and 59")]
    MinutesOutOfRange,
    #[error("Seconds must be between 0 and 59")]
    SecondsOutOfRange,
    #[error("Please enter a duration greater than 0")]
    ZeroDuration,
}

/// A form that passed validation, with trimmed text and the total duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTimer {
    pub title: String,
    pub description: String,
    pub duration: u64,
}

impl TimerForm {
    pub fn validate(&self) -> Result<ValidTimer, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TitleTooLong(MAX_TITLE_LEN));
        }
        if self.hours > 23 {
            return Err(ValidationError::HoursOutOfRange);
        }
        if self.minutes > 59 {
            return Err(ValidationError::MinutesOutOfRange);
        }
        if self.seconds > 59 {
            return Err(ValidationError::SecondsOutOfRange);
        }

        let duration = join_seconds(self.hours, self.minutes, self.seconds);
        if duration == 0 {
            return Err(ValidationError::ZeroDuration);
        }

        Ok(ValidTimer {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            duration,
        })
    }
}

impl ValidTimer {
    /// Fields for an Add: full duration remaining, not running
    pub fn into_new_timer(self) -> NewTimer {
        NewTimer::new(self.title, self.description, self.duration)
    }

    /// Fields for an Edit
    pub fn into_update(self) -> TimerUpdate {
        TimerUpdate {
            title: Some(self.title),
            description: Some(self.description),
            duration: Some(self.duration),
        }
    }
}
