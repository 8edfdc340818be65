//! Persistence bridge: restore timers at startup, save them after every change

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::{
    state::{Timer, TimerStore},
    storage::BlobStore,
};

/// Parse a persisted blob. `None` when it is not a well-formed timer array.
pub fn decode_timers(blob: &str) -> Option<Vec<Timer>> {
    match serde_json::from_str::<Vec<Timer>>(blob) {
        Ok(timers) => Some(timers),
        Err(e) => {
            warn!(error = %e, "Stored timers are malformed, ignoring them");
            None
        }
    }
}

/// Serialize the whole collection
pub fn encode_timers(timers: &[Timer]) -> Result<String> {
    serde_json::to_string(timers).context("Failed to serialize timers")
}

/// Read the persisted collection. Anything missing, unreadable or malformed
/// loads as an empty collection.
pub fn load_timers(blobs: &dyn BlobStore) -> Vec<Timer> {
    match blobs.read() {
        Ok(Some(blob)) => decode_timers(&blob).unwrap_or_default(),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Failed to read stored timers: {:#}", e);
            Vec::new()
        }
    }
}

/// Overwrite the persisted collection
pub fn save_timers(blobs: &dyn BlobStore, timers: &[Timer]) -> Result<()> {
    let blob = encode_timers(timers)?;
    blobs.write(&blob)
}

/// Load persisted timers into the store. Must run before anything else
/// dispatches. Returns how many timers were restored.
pub fn restore_timers(store: &TimerStore, blobs: &dyn BlobStore) -> usize {
    let timers = load_timers(blobs);
    if timers.is_empty() {
        info!("No stored timers to restore");
        return 0;
    }

    let snapshot = store.load_all(timers);
    let running = snapshot.iter().filter(|t| t.is_running()).count();
    info!("Restored {} timers ({} running)", snapshot.len(), running);
    snapshot.len()
}

/// Background task that writes the collection out after every change
pub async fn autosave_task(store: Arc<TimerStore>, blobs: Arc<dyn BlobStore>) {
    info!("Starting autosave task");

    let mut timers_rx = store.subscribe();
    while timers_rx.changed().await.is_ok() {
        let snapshot = Arc::clone(&timers_rx.borrow_and_update());
        let blobs = Arc::clone(&blobs);

        match tokio::task::spawn_blocking(move || save_timers(blobs.as_ref(), &snapshot)).await {
            Ok(Ok(())) => debug!("Saved timers"),
            Ok(Err(e)) => error!("Failed to save timers: {:#}", e),
            Err(e) => error!("Save task panicked: {}", e),
        }
    }

    info!("Timer store closed, autosave task stopping");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::NewTimer, storage::MemoryBlobStore};

    #[test]
    fn test_empty_and_garbage_blobs_load_as_empty() {
        assert!(load_timers(&MemoryBlobStore::new()).is_empty());
        assert!(load_timers(&MemoryBlobStore::with_blob("{not json")).is_empty());
        assert!(load_timers(&MemoryBlobStore::with_blob(r#"{"timers":[]}"#)).is_empty());
    }

    #[test]
    fn test_restore_into_store() {
        let source = TimerStore::new();
        let a = source.add(NewTimer::new("A", "first", 10));
        source.add(NewTimer::new("B", "", 20));
        source.start(a);

        let blobs = MemoryBlobStore::new();
        save_timers(&blobs, &source.snapshot()).unwrap();

        let target = TimerStore::new();
        assert_eq!(restore_timers(&target, &blobs), 2);
        assert_eq!(*target.snapshot(), *source.snapshot());
    }

    #[test]
    fn test_restore_nothing_leaves_store_untouched() {
        let store = TimerStore::new();
        let rx = store.subscribe();
        assert_eq!(restore_timers(&store, &MemoryBlobStore::with_blob("]")), 0);
        assert!(!rx.has_changed().unwrap());
    }
}
