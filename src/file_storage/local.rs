//! # Local Filesystem Backend

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::backend::{EntryStat, StorageBackend};
use super::errors::{StorageError, StorageResult};
use super::naming::STAGING_PREFIX;

/// The single flat directory holding all stored files
#[derive(Debug, Clone)]
pub struct StorageRoot {
    root: PathBuf,
}

impl StorageRoot {
    /// Create a storage root; nothing is touched on disk until first use
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn staging_path(&self) -> PathBuf {
        self.root
            .join(format!("{}{}", STAGING_PREFIX, Uuid::new_v4().simple()))
    }
}

fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

impl StorageBackend for StorageRoot {
    fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| StorageError::Io(e.to_string()))
    }

    fn write(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        let staging = self.staging_path();

        // Stage the full payload, then swap it in with one rename
        let result = fs::write(&staging, data)
            .and_then(|_| fs::rename(&staging, self.full_path(name)));

        result.map_err(|e| {
            let _ = fs::remove_file(&staging);
            StorageError::Io(e.to_string())
        })
    }

    fn read(&self, name: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(name);
        if full_path.is_dir() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        fs::read(&full_path).map_err(|e| StorageError::from_io(name, e))
    }

    fn stat(&self, name: &str) -> StorageResult<EntryStat> {
        let meta = fs::metadata(self.full_path(name)).map_err(|e| StorageError::from_io(name, e))?;
        let modified = meta.modified().map_err(|e| StorageError::Io(e.to_string()))?;

        // Not every platform records a birth time
        let created = meta.created().unwrap_or(modified);

        Ok(EntryStat {
            size: meta.len(),
            created_at: to_utc(created),
            modified_at: to_utc(modified),
        })
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        self.full_path(name)
            .try_exists()
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    fn is_file(&self, name: &str) -> StorageResult<bool> {
        match fs::metadata(self.full_path(name)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let mut results = Vec::new();

        for entry in fs::read_dir(&self.root).map_err(|e| StorageError::Io(e.to_string()))? {
            let entry = entry.map_err(|e| StorageError::Io(e.to_string()))?;

            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with(STAGING_PREFIX) {
                    results.push(name.to_string());
                }
            }
        }

        Ok(results)
    }

    fn rename(&self, from: &str, to: &str) -> StorageResult<()> {
        fs::rename(self.full_path(from), self.full_path(to)).map_err(|e| StorageError::from_io(from, e))
    }

    fn display_path(&self, name: &str) -> String {
        self.full_path(name).display().to_string()
    }
}
