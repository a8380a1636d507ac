//! filedrop - A minimal flat-directory file storage service
//!
//! Clients upload files, list them, download or fetch them as images, and
//! rename them. A single storage directory is the only state.

pub mod cli;
pub mod file_storage;
pub mod http_server;
pub mod observability;
