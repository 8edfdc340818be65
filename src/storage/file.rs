//! JSON file on local disk

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::debug;

use super::BlobStore;

/// Directory under the user's data dir holding the timers file
pub const APP_DIR: &str = "timer-deck";
/// Name of the timers file
pub const FILENAME: &str = "timers.json";

/// Stores the blob in a single file, overwritten in full on every write
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    path: PathBuf,
}

impl FileBlobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/timer-deck/timers.json`, falling back to the working directory
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(FILENAME);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No timers file yet");
                Ok(None)
            }
            Err(e) => Err(e).context(format!("Failed to read timers file {}", self.path.display())),
        }
    }

    fn write(&self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create data directory: {}", parent.display()))?;
        }
        fs::write(&self.path, blob)
            .context(format!("Failed to write timers file to {}", self.path.display()))?;
        Ok(())
    }
}
