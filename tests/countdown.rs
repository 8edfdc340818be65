//! Countdown scenarios driven by tokio's paused clock

use std::{sync::Arc, time::Duration};

use timer_deck::{
    state::{NewTimer, TimerEvent, TimerId, TimerStore},
    CountdownScheduler,
};
use tokio::time::sleep;

fn spawn_scheduler() -> Arc<TimerStore> {
    let store = Arc::new(TimerStore::new());
    tokio::spawn(CountdownScheduler::new(Arc::clone(&store)).run());
    store
}

fn remaining(store: &TimerStore, id: TimerId) -> u64 {
    store.get(id).unwrap().remaining_time()
}

#[tokio::test(start_paused = true)]
async fn tea_timer_stops_at_zero() {
    let store = spawn_scheduler();
    let id = store.add(NewTimer::new("Tea", "", 180));
    store.start(id);

    sleep(Duration::from_secs(181)).await;

    let tea = store.get(id).unwrap();
    assert_eq!(tea.remaining_time(), 0);
    assert!(!tea.is_running());
    assert_eq!(tea.duration(), 180);
}

#[tokio::test(start_paused = true)]
async fn timers_count_down_independently() {
    let store = spawn_scheduler();
    let a = store.add(NewTimer::new("A", "", 10));
    let b = store.add(NewTimer::new("B", "", 20));
    store.start(a);
    store.start(b);

    sleep(Duration::from_millis(10_500)).await;

    let timer_a = store.get(a).unwrap();
    let timer_b = store.get(b).unwrap();
    assert_eq!(timer_a.remaining_time(), 0);
    assert!(!timer_a.is_running());
    assert_eq!(timer_b.remaining_time(), 10);
    assert!(timer_b.is_running());
}

#[tokio::test(start_paused = true)]
async fn restart_does_not_double_tick() {
    let store = spawn_scheduler();
    let id = store.add(NewTimer::new("Eggs", "", 60));
    store.start(id);

    sleep(Duration::from_millis(3_500)).await;
    assert_eq!(remaining(&store, id), 57);

    store.pause(id);
    sleep(Duration::from_secs(1)).await;
    assert_eq!(remaining(&store, id), 57);

    store.start(id);
    store.start(id);
    sleep(Duration::from_millis(3_200)).await;

    let eggs = store.get(id).unwrap();
    assert!(eggs.is_running());
    assert_eq!(eggs.remaining_time(), 54);
}

#[tokio::test(start_paused = true)]
async fn quick_pause_and_start_keeps_one_decrement_per_second() {
    let store = spawn_scheduler();
    let id = store.add(NewTimer::new("Pasta", "", 600));
    store.start(id);

    sleep(Duration::from_millis(2_500)).await;
    store.pause(id);
    store.start(id);
    sleep(Duration::from_secs(5)).await;

    assert_eq!(remaining(&store, id), 593);
    assert!(store.get(id).unwrap().is_running());
}

#[tokio::test(start_paused = true)]
async fn reset_while_running_restores_and_pauses() {
    let store = spawn_scheduler();
    let id = store.add(NewTimer::new("Bread", "", 30));
    store.start(id);

    sleep(Duration::from_millis(4_500)).await;
    assert!(store.reset(id));

    let bread = store.get(id).unwrap();
    assert_eq!(bread.remaining_time(), 30);
    assert!(!bread.is_running());

    sleep(Duration::from_secs(3)).await;
    assert_eq!(remaining(&store, id), 30);
    assert!(!store.reset(id));
}

#[tokio::test(start_paused = true)]
async fn delete_stops_further_updates() {
    let store = spawn_scheduler();
    let keep = store.add(NewTimer::new("Keep", "", 100));
    let gone = store.add(NewTimer::new("Gone", "", 100));
    store.start(keep);
    store.start(gone);

    sleep(Duration::from_millis(2_500)).await;
    store.delete(gone);

    sleep(Duration::from_secs(5)).await;
    assert!(store.get(gone).is_none());
    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(remaining(&store, keep), 93);
}

#[tokio::test(start_paused = true)]
async fn completion_is_announced_once() {
    let store = spawn_scheduler();
    let mut events = store.subscribe_events();
    let id = store.add(NewTimer::new("Laundry", "", 2));
    store.start(id);

    sleep(Duration::from_secs(10)).await;

    match events.try_recv() {
        Ok(TimerEvent::Completed { id: done, title, .. }) => {
            assert_eq!(done, id);
            assert_eq!(title, "Laundry");
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn start_on_finished_timer_stays_idle() {
    let store = spawn_scheduler();
    let id = store.add(NewTimer::new("Short", "", 1));
    store.start(id);
    sleep(Duration::from_secs(2)).await;

    store.start(id);
    sleep(Duration::from_secs(2)).await;

    let short = store.get(id).unwrap();
    assert_eq!(short.remaining_time(), 0);
    assert!(!short.is_running());
}
