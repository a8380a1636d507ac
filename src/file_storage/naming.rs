//! # Name Policy
//!
//! How an upload's on-disk name is chosen, and which caller-supplied names
//! are allowed to touch the storage root.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use super::errors::{StorageError, StorageResult};

/// Prefix reserved for in-flight writes. Entries carrying it are never
/// listed and cannot be addressed by clients.
pub const STAGING_PREFIX: &str = ".filedrop-staging-";

/// Map every character outside `[a-zA-Z0-9.-]` to `_` and lower-case.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Extension of `original`, dot included.
///
/// Only the last path component is considered. A leading dot alone is not
/// an extension (`.bashrc` has none).
pub fn extension_of(original: &str) -> &str {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    match base.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &base[idx..],
    }
}

/// Reject anything that is not a single plain entry of the storage root.
pub fn validate_name(name: &str) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::Validation("File name is required".to_string()));
    }
    if name == "." || name == ".." {
        return Err(StorageError::Validation(format!("Invalid file name: {}", name)));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(StorageError::Validation(format!(
            "File name must not contain path separators: {}",
            name
        )));
    }
    if name.starts_with(STAGING_PREFIX) {
        return Err(StorageError::Validation(format!("Reserved file name: {}", name)));
    }
    Ok(())
}

/// Generates base names for uploads without a custom name.
///
/// Tokens are UTC nanosecond timestamps, bumped when needed so that each
/// token is strictly greater than the previous one.
#[derive(Debug, Default)]
pub struct NameGenerator {
    last: AtomicI64,
}

impl NameGenerator {
    /// Create a new generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Next distinguishing token
    pub fn next_token(&self) -> String {
        let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX - 1);
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = if now > prev { now } else { prev + 1 };
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return candidate.to_string(),
                Err(actual) => prev = actual,
            }
        }
    }

    /// Final on-disk name for an upload
    ///
    /// An empty suggestion counts as no suggestion. The original extension
    /// is appended as-is.
    pub fn final_name(&self, original_name: &str, suggested: Option<&str>) -> StorageResult<String> {
        let base = match suggested.filter(|s| !s.is_empty()) {
            Some(s) => sanitize_name(s),
            None => self.next_token(),
        };
        let name = format!("{}{}", base, extension_of(original_name));
        validate_name(&name)?;
        Ok(name)
    }
}
