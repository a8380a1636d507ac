//! # File Storage Errors

use std::io;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// File storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    // Input errors
    #[error("{0}")]
    Validation(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("A file with that name already exists: {0}")]
    Conflict(String),

    // Admission
    #[error("File too large: {0} bytes (max: {1})")]
    PayloadTooLarge(u64, u64),

    #[error("Requested file is not an image: {0}")]
    UnsupportedMediaType(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl StorageError {
    /// Get HTTP status code
    ///
    /// Conflicts and non-image fetches answer 400 to stay compatible with
    /// existing clients of the upload service.
    pub fn status_code(&self) -> u16 {
        match self {
            StorageError::Validation(_) => 400,
            StorageError::NotFound(_) => 404,
            StorageError::Conflict(_) => 400,
            StorageError::PayloadTooLarge(_, _) => 413,
            StorageError::UnsupportedMediaType(_) => 400,
            StorageError::Io(_) => 500,
        }
    }

    /// Translate a raw filesystem error for the entry `name`
    pub fn from_io(name: &str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound(name.to_string())
        } else {
            StorageError::Io(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StorageError::Validation("x".into()).status_code(), 400);
        assert_eq!(StorageError::NotFound("a.txt".into()).status_code(), 404);
        assert_eq!(StorageError::Conflict("a.txt".into()).status_code(), 400);
        assert_eq!(StorageError::PayloadTooLarge(100, 50).status_code(), 413);
        assert_eq!(StorageError::UnsupportedMediaType("a.txt".into()).status_code(), 400);
        assert_eq!(StorageError::Io("disk".into()).status_code(), 500);
    }

    #[test]
    fn test_from_io_maps_not_found() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(StorageError::from_io("a.txt", err), StorageError::NotFound(n) if n == "a.txt"));

        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(StorageError::from_io("a.txt", err), StorageError::Io(_)));
    }
}
