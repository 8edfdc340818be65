//! Configuration and CLI argument handling

use std::{path::PathBuf, sync::Arc};

use clap::Parser;

use crate::storage::{BlobStore, FileBlobStore, MemoryBlobStore};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "timer-deck")]
#[command(about = "A state-managed HTTP server running independent, persistent countdown timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// File the timers are saved to [default: <data dir>/timer-deck/timers.json]
    #[arg(short, long)]
    pub data_file: Option<PathBuf>,

    /// Keep timers in memory only; nothing survives a restart
    #[arg(long, conflicts_with = "data_file")]
    pub in_memory: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Path of the timers file
    pub fn data_path(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(FileBlobStore::default_path)
    }

    /// Human readable storage location
    pub fn storage_label(&self) -> String {
        if self.in_memory {
            "memory".to_string()
        } else {
            self.data_path().display().to_string()
        }
    }

    /// Build the blob store selected by the flags
    pub fn blob_store(&self) -> Arc<dyn BlobStore> {
        if self.in_memory {
            Arc::new(MemoryBlobStore::new())
        } else {
            Arc::new(FileBlobStore::new(self.data_path()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["timer-deck"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.data_path(), FileBlobStore::default_path());
    }

    #[test]
    fn test_explicit_data_file() {
        let config = Config::try_parse_from(["timer-deck", "-d", "/tmp/t.json", "-v"]).unwrap();
        assert_eq!(config.storage_label(), "/tmp/t.json");
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_in_memory_conflicts_with_data_file() {
        assert!(Config::try_parse_from(["timer-deck", "--in-memory", "-d", "x.json"]).is_err());
        let config = Config::try_parse_from(["timer-deck", "--in-memory"]).unwrap();
        assert_eq!(config.storage_label(), "memory");
    }
}
