//! # Storage Backend Trait

use chrono::{DateTime, Utc};

use super::errors::StorageResult;

/// Live metadata for a single entry
#[derive(Debug, Clone)]
pub struct EntryStat {
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Backend trait for a flat file namespace
///
/// Every `name` is a single path component that has already passed
/// [`validate_name`](super::naming::validate_name).
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Create the namespace if it does not exist yet
    fn ensure_root(&self) -> StorageResult<()>;

    /// Atomically replace the content of `name`
    fn write(&self, name: &str, data: &[u8]) -> StorageResult<()>;

    /// Read the content of `name`
    fn read(&self, name: &str) -> StorageResult<Vec<u8>>;

    /// Read size and timestamps of `name`
    fn stat(&self, name: &str) -> StorageResult<EntryStat>;

    /// Check if `name` exists, whatever its kind
    fn exists(&self, name: &str) -> StorageResult<bool>;

    /// Check if `name` is a regular file
    fn is_file(&self, name: &str) -> StorageResult<bool>;

    /// List the names of all entries
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Move `from` to `to` without touching content
    fn rename(&self, from: &str, to: &str) -> StorageResult<()>;

    /// Display path of `name`, as reported to clients
    fn display_path(&self, name: &str) -> String;
}
