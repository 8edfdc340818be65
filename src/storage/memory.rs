//! In-process blob storage, lost on exit

use std::sync::Mutex;

use anyhow::{anyhow, Result};

use super::BlobStore;

/// Keeps the blob in memory; used for `--in-memory` runs and tests
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blob: Mutex<Option<String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `blob`
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    /// Current contents
    pub fn contents(&self) -> Option<String> {
        self.blob.lock().ok().and_then(|b| b.clone())
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self) -> Result<Option<String>> {
        self.blob
            .lock()
            .map(|b| b.clone())
            .map_err(|e| anyhow!("Failed to lock memory store: {}", e))
    }

    fn write(&self, blob: &str) -> Result<()> {
        let mut stored = self.blob
            .lock()
            .map_err(|e| anyhow!("Failed to lock memory store: {}", e))?;
        *stored = Some(blob.to_string());
        Ok(())
    }
}
