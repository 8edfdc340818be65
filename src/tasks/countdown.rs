//! Countdown scheduler: one tick task per running timer

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info, trace};

use crate::state::{Timer, TimerAction, TimerId, TimerStore};

/// Interval between two decrements of a running timer
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Result of one tick for one timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Decremented to the given remaining time, still running
    Counting(u64),
    /// Reached zero and was paused
    Completed,
    /// Timer exists but is not running; nothing dispatched
    Idle,
    /// Timer deleted; nothing dispatched
    Gone,
}

/// Work out the actions for one tick of `id` from the current collection
pub fn tick_actions(timers: &[Timer], id: TimerId) -> (Vec<TimerAction>, TickOutcome) {
    let timer = match timers.iter().find(|t| t.id() == id) {
        Some(timer) if timer.is_running() => timer,
        Some(_) => return (Vec::new(), TickOutcome::Idle),
        None => return (Vec::new(), TickOutcome::Gone),
    };

    if timer.remaining_time() == 0 {
        return (vec![TimerAction::Pause(id)], TickOutcome::Completed);
    }

    let remaining = timer.remaining_time() - 1;
    let update = TimerAction::UpdateRemainingTime {
        id,
        remaining_time: i64::try_from(remaining).unwrap_or(i64::MAX),
    };
    if remaining == 0 {
        (vec![update, TimerAction::Pause(id)], TickOutcome::Completed)
    } else {
        (vec![update], TickOutcome::Counting(remaining))
    }
}

/// Handle to a running tick task. Dropping it aborts the task.
#[derive(Debug)]
struct TickHandle(JoinHandle<()>);

impl TickHandle {
    fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Keeps exactly one tick task alive for every running timer and none for
/// the others.
///
/// The table is reconciled against each new snapshot: stale handles are
/// removed (and aborted) before any missing handle is spawned.
#[derive(Debug)]
pub struct CountdownScheduler {
    store: Arc<TimerStore>,
    period: Duration,
    ticks: HashMap<TimerId, TickHandle>,
}

impl CountdownScheduler {
    pub fn new(store: Arc<TimerStore>) -> Self {
        Self {
            store,
            period: TICK_PERIOD,
            ticks: HashMap::new(),
        }
    }

    /// Bring the tick table in line with `timers`
    pub fn reconcile(&mut self, timers: &[Timer]) {
        self.ticks.retain(|id, handle| {
            let running = timers.iter().any(|t| t.id() == *id && t.is_running());
            let keep = running && !handle.is_finished();
            if !keep {
                debug!("Stopping tick task for timer {}", id);
            }
            keep
        });

        for timer in timers.iter().filter(|t| t.is_running()) {
            if self.ticks.contains_key(&timer.id()) {
                continue;
            }
            debug!("Starting tick task for timer {} ({}s left)", timer.id(), timer.remaining_time());
            let task = tokio::spawn(tick_task(Arc::clone(&self.store), timer.id(), self.period));
            self.ticks.insert(timer.id(), TickHandle(task));
        }
    }

    /// Number of live tick tasks
    pub fn active_ticks(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_ticking(&self, id: TimerId) -> bool {
        self.ticks.contains_key(&id)
    }

    /// Follow store changes until the task is aborted
    pub async fn run(mut self) {
        info!("Starting countdown scheduler");

        let mut timers_rx = self.store.subscribe();
        loop {
            let snapshot = Arc::clone(&timers_rx.borrow_and_update());
            self.reconcile(&snapshot);

            if timers_rx.changed().await.is_err() {
                break;
            }
        }

        info!("Timer store closed, stopping {} tick tasks", self.ticks.len());
    }
}

/// Decrement one timer once per period.
///
/// A paused or finished timer keeps its task parked, so only the scheduler's
/// abort ends it while the timer exists. The task exits by itself only once
/// the timer is gone, since ids are never reused.
async fn tick_task(store: Arc<TimerStore>, id: TimerId, period: Duration) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let mut outcome = TickOutcome::Gone;
        let snapshot = store.dispatch_with("tick", |timers| {
            let (actions, result) = tick_actions(timers, id);
            outcome = result;
            actions
        });

        match outcome {
            TickOutcome::Counting(remaining) => {
                trace!("Timer {} at {}s", id, remaining);
            }
            TickOutcome::Completed => {
                if let Some(timer) = snapshot.iter().find(|t| t.id() == id) {
                    info!("Timer '{}' ({}) reached zero", timer.title(), id);
                    store.notify_completed(timer);
                }
            }
            TickOutcome::Idle => {
                trace!("Timer {} idle, waiting for the scheduler", id);
            }
            TickOutcome::Gone => {
                debug!("Timer {} deleted, tick task exiting", id);
                break;
            }
        }
    }
}
