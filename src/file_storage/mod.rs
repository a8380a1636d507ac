//! # filedrop File Storage Module
//!
//! Flat-directory file storage: store, list, retrieve and rename entries of
//! a single storage root. The directory is the only source of truth.

pub mod errors;
pub mod file;
pub mod backend;
pub mod local;
pub mod naming;

pub use errors::{StorageError, StorageResult};
pub use file::{
    content_type_for, FileService, RenameOutcome, RetrievedFile, StoredFile, UploadItem,
    UploadedFile, DEFAULT_MAX_UPLOAD_BYTES,
};
pub use backend::{EntryStat, StorageBackend};
pub use local::StorageRoot;
pub use naming::{extension_of, sanitize_name, validate_name, NameGenerator};
