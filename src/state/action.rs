//! Timer actions and the reducer that applies them

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::timer::{NewTimer, Timer, TimerId, TimerUpdate};

/// Every mutation of the timer collection is one of these actions.
///
/// On the wire an action is `{"type": "...", "payload": ...}`. A `type` the
/// server does not know deserializes to [`TimerAction::Unknown`] and is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum TimerAction {
    #[serde(rename = "ADD_TIMER")]
    Add(NewTimer),
    #[serde(rename = "EDIT_TIMER")]
    Edit { id: TimerId, updates: TimerUpdate },
    #[serde(rename = "DELETE_TIMER")]
    Delete(TimerId),
    #[serde(rename = "START_TIMER")]
    Start(TimerId),
    #[serde(rename = "PAUSE_TIMER")]
    Pause(TimerId),
    #[serde(rename = "UPDATE_REMAINING_TIME", rename_all = "camelCase")]
    UpdateRemainingTime { id: TimerId, remaining_time: i64 },
    #[serde(rename = "LOAD_TIMERS")]
    LoadAll(Vec<Timer>),
    #[serde(other)]
    Unknown,
}

impl TimerAction {
    /// Short label used for logging and last-action tracking
    pub fn kind(&self) -> &'static str {
        match self {
            TimerAction::Add(_) => "add",
            TimerAction::Edit { .. } => "edit",
            TimerAction::Delete(_) => "delete",
            TimerAction::Start(_) => "start",
            TimerAction::Pause(_) => "pause",
            TimerAction::UpdateRemainingTime { .. } => "update-remaining-time",
            TimerAction::LoadAll(_) => "load-all",
            TimerAction::Unknown => "unknown",
        }
    }
}

/// Pure transition function: current collection + action → new collection.
///
/// The input is never modified. Actions naming an identifier that is not in
/// the collection leave it unchanged.
pub fn reduce(timers: &[Timer], action: TimerAction) -> Vec<Timer> {
    reduce_with_ids(timers, action, TimerId::new)
}

/// [`reduce`] with a caller-supplied identifier source for Add.
///
/// `next_id` is called until it yields an identifier not already present.
pub fn reduce_with_ids<G>(timers: &[Timer], action: TimerAction, mut next_id: G) -> Vec<Timer>
where
    G: FnMut() -> TimerId,
{
    match action {
        TimerAction::Add(fields) => {
            let mut id = next_id();
            while timers.iter().any(|t| t.id() == id) {
                id = next_id();
            }
            let mut next = timers.to_vec();
            next.push(Timer::create(id, fields));
            next
        }
        TimerAction::Edit { id, updates } => update(timers, id, |t| t.apply(updates)),
        TimerAction::Delete(id) => timers.iter().filter(|t| t.id() != id).cloned().collect(),
        TimerAction::Start(id) => update(timers, id, Timer::start),
        TimerAction::Pause(id) => update(timers, id, Timer::pause),
        TimerAction::UpdateRemainingTime { id, remaining_time } => {
            update(timers, id, |t| t.set_remaining(remaining_time))
        }
        TimerAction::LoadAll(loaded) => {
            let mut seen = HashSet::new();
            loaded
                .into_iter()
                .filter(|t| seen.insert(t.id()))
                .map(Timer::normalized)
                .collect()
        }
        TimerAction::Unknown => timers.to_vec(),
    }
}

fn update<F>(timers: &[Timer], id: TimerId, f: F) -> Vec<Timer>
where
    F: FnOnce(&mut Timer),
{
    let mut next = timers.to_vec();
    if let Some(timer) = next.iter_mut().find(|t| t.id() == id) {
        f(timer);
    }
    next
}
