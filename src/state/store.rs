//! Timer store: the single owner of the timer collection

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use super::{
    action::{reduce, reduce_with_ids, TimerAction},
    timer::{to_signed, NewTimer, Timer, TimerId, TimerUpdate},
};

/// Immutable view of the whole collection. A new `Arc` is published only when
/// a dispatch actually changed something.
pub type Snapshot = Arc<Vec<Timer>>;

/// Transitions observers may want to react to beyond the snapshot itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A running timer counted down to zero and was paused
    Completed {
        id: TimerId,
        title: String,
        at: DateTime<Utc>,
    },
}

/// Owns the timer collection and applies every mutation through the reducer.
///
/// Dispatches are serialized by the watch channel's modify hook, so callers on
/// any task can share the store behind an `Arc`.
#[derive(Debug)]
pub struct TimerStore {
    /// Current collection; receivers are the snapshot observers
    timers_tx: watch::Sender<Snapshot>,
    /// Completion notifications
    events_tx: broadcast::Sender<TimerEvent>,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl TimerStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (timers_tx, _) = watch::channel(Arc::new(Vec::new()));
        let (events_tx, _) = broadcast::channel(100);

        Self {
            timers_tx,
            events_tx,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Apply one action
    pub fn dispatch(&self, action: TimerAction) -> Snapshot {
        let label = action.kind();
        self.dispatch_with(label, move |_| vec![action])
    }

    /// Derive a batch of actions from the current collection and apply them
    /// as one step. Nothing else can change the collection between the read
    /// and the write. `derive` runs under the store's lock and must not call
    /// back into the store.
    pub fn dispatch_with<F>(&self, label: &str, derive: F) -> Snapshot
    where
        F: FnOnce(&[Timer]) -> Vec<TimerAction>,
    {
        self.commit(label, |current| {
            derive(current)
                .into_iter()
                .fold(current.to_vec(), |timers, action| reduce(&timers, action))
        })
    }

    /// Replace the collection with `transition(current)` and notify observers
    /// when the result differs
    fn commit<F>(&self, label: &str, transition: F) -> Snapshot
    where
        F: FnOnce(&[Timer]) -> Vec<Timer>,
    {
        let mut snapshot = None;
        let changed = self.timers_tx.send_if_modified(|current| {
            let next = transition(current.as_slice());
            let changed = next != **current;
            if changed {
                *current = Arc::new(next);
            }
            snapshot = Some(Arc::clone(current));
            changed
        });

        if changed {
            debug!("Dispatched {}", label);
            if let Ok(mut last_action) = self.last_action.lock() {
                *last_action = Some(label.to_string());
            }
            if let Ok(mut last_time) = self.last_action_time.lock() {
                *last_time = Some(Utc::now());
            }
        }

        snapshot.unwrap_or_else(|| self.snapshot())
    }

    /// Append a new timer and return its identifier
    pub fn add(&self, fields: NewTimer) -> TimerId {
        info!("Adding timer '{}' ({}s)", fields.title, fields.duration);
        let mut assigned = TimerId::new();
        self.commit("add", |current| {
            reduce_with_ids(current, TimerAction::Add(fields), || {
                assigned = TimerId::new();
                assigned
            })
        });
        assigned
    }

    pub fn edit(&self, id: TimerId, updates: TimerUpdate) -> Snapshot {
        info!("Editing timer {}", id);
        self.dispatch(TimerAction::Edit { id, updates })
    }

    pub fn delete(&self, id: TimerId) -> Snapshot {
        info!("Deleting timer {}", id);
        self.dispatch(TimerAction::Delete(id))
    }

    pub fn start(&self, id: TimerId) -> Snapshot {
        info!("Starting timer {}", id);
        self.dispatch(TimerAction::Start(id))
    }

    pub fn pause(&self, id: TimerId) -> Snapshot {
        info!("Pausing timer {}", id);
        self.dispatch(TimerAction::Pause(id))
    }

    /// Overwrite remaining time; the value is clamped to `[0, duration]`
    pub fn set_remaining(&self, id: TimerId, remaining_time: i64) -> Snapshot {
        self.dispatch(TimerAction::UpdateRemainingTime { id, remaining_time })
    }

    /// Restore a timer to its full duration and leave it paused.
    ///
    /// Returns `false` without dispatching anything when the timer is absent
    /// or already at full duration.
    pub fn reset(&self, id: TimerId) -> bool {
        let mut needed = false;
        self.dispatch_with("reset", |timers| match timers.iter().find(|t| t.id() == id) {
            Some(timer) if !timer.is_at_full_duration() => {
                needed = true;
                vec![
                    TimerAction::UpdateRemainingTime {
                        id,
                        remaining_time: to_signed(timer.duration()),
                    },
                    TimerAction::Pause(id),
                ]
            }
            _ => Vec::new(),
        });

        if needed {
            info!("Reset timer {}", id);
        } else {
            debug!("Reset of timer {} skipped, nothing to restore", id);
        }
        needed
    }

    /// Replace the whole collection, used once at startup
    pub fn load_all(&self, timers: Vec<Timer>) -> Snapshot {
        info!("Loading {} timers", timers.len());
        self.dispatch(TimerAction::LoadAll(timers))
    }

    /// Current collection
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.timers_tx.borrow())
    }

    /// Copy of a single timer
    pub fn get(&self, id: TimerId) -> Option<Timer> {
        self.timers_tx.borrow().iter().find(|t| t.id() == id).cloned()
    }

    /// Watch the collection; the current value counts as already seen
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.timers_tx.subscribe()
    }

    /// Receive completion events
    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.events_tx.subscribe()
    }

    /// Announce that a timer reached zero
    pub fn notify_completed(&self, timer: &Timer) {
        let event = TimerEvent::Completed {
            id: timer.id(),
            title: timer.title().to_string(),
            at: Utc::now(),
        };
        // No subscribers is the normal case for a headless server
        if self.events_tx.send(event).is_err() {
            debug!("No listeners for completion of timer {}", timer.id());
        }
    }

    /// Get last action information
    pub fn last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

impl Default for TimerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::timer::MAX_DURATION;

    fn store_with(duration: u64) -> (TimerStore, TimerId) {
        let store = TimerStore::new();
        let id = store.add(NewTimer::new("Tea", "", duration));
        (store, id)
    }

    #[test]
    fn test_add_returns_id_of_new_timer() {
        let (store, id) = store_with(180);
        let timer = store.get(id).unwrap();
        assert_eq!(timer.remaining_time(), 180);
        assert!(!timer.is_running());
        assert_eq!(store.last_action().0.as_deref(), Some("add"));
    }

    #[test]
    fn test_unchanged_dispatch_keeps_snapshot_reference() {
        let (store, id) = store_with(60);
        let before = store.snapshot();
        let mut rx = store.subscribe();

        let after = store.pause(id);
        assert!(Arc::ptr_eq(&before, &after));
        assert!(!rx.has_changed().unwrap());

        let after = store.start(id);
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update()[0].is_running());
    }

    #[test]
    fn test_reset_at_full_duration_dispatches_nothing() {
        let (store, id) = store_with(60);
        store.start(id);
        let rx = store.subscribe();
        let before = store.last_action();

        assert!(!store.reset(id));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.last_action(), before);
        assert!(store.get(id).unwrap().is_running());
    }

    #[test]
    fn test_reset_restores_duration_and_pauses() {
        let (store, id) = store_with(60);
        store.start(id);
        store.set_remaining(id, 17);

        assert!(store.reset(id));
        let timer = store.get(id).unwrap();
        assert_eq!(timer.remaining_time(), 60);
        assert!(!timer.is_running());
        assert_eq!(timer.duration(), 60);
    }

    #[test]
    fn test_reset_restores_largest_duration() {
        let (store, id) = store_with(1 << 63);
        store.start(id);
        store.set_remaining(id, 5);

        assert!(store.reset(id));
        let timer = store.get(id).unwrap();
        assert_eq!(timer.duration(), MAX_DURATION);
        assert_eq!(timer.remaining_time(), MAX_DURATION);
        assert!(timer.is_at_full_duration());
        assert!(!timer.is_running());
    }

    #[test]
    fn test_reset_unknown_timer() {
        let store = TimerStore::new();
        assert!(!store.reset(TimerId::new()));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_dispatch_with_sees_current_state() {
        let (store, id) = store_with(10);
        store.set_remaining(id, 4);
        store.dispatch_with("halve", |timers| {
            let t = timers.iter().find(|t| t.id() == id).unwrap();
            vec![TimerAction::UpdateRemainingTime {
                id,
                remaining_time: t.remaining_time() as i64 / 2,
            }]
        });
        assert_eq!(store.get(id).unwrap().remaining_time(), 2);
    }

    #[test]
    fn test_completion_event_reaches_subscribers() {
        let (store, id) = store_with(10);
        let mut events = store.subscribe_events();
        let timer = store.get(id).unwrap();
        store.notify_completed(&timer);
        match events.try_recv().unwrap() {
            TimerEvent::Completed { id: done, title, .. } => {
                assert_eq!(done, id);
                assert_eq!(title, "Tea");
            }
        }
    }
}
