//! Durable storage for the serialized timer collection
//!
//! The persistence layer only needs to read and overwrite one blob; this module
//! provides that contract and the stores that implement it.

pub mod file;
pub mod memory;

// Re-export main types
pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;

/// Whole-blob storage: read everything, overwrite everything
pub trait BlobStore: Send + Sync {
    /// Read the stored blob, `Ok(None)` when nothing has been written yet
    fn read(&self) -> anyhow::Result<Option<String>>;

    /// Replace the stored blob
    fn write(&self, blob: &str) -> anyhow::Result<()>;
}
