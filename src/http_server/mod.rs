//! # filedrop HTTP Server Module
//!
//! Axum server exposing the storage operations.
//!
//! # Endpoints
//!
//! - `POST /upload` - Multipart upload (`files`, optional `customNames`)
//! - `GET /files` - List stored files
//! - `GET /files/image/:filename` - Fetch an image inline
//! - `GET /files/:filename` - Download as attachment
//! - `PUT /files/rename` - Rename a stored file
//! - `/health` - Health check

pub mod config;
pub mod server;
pub mod storage_routes;
pub mod observability_routes;

pub use config::ServerConfig;
pub use server::HttpServer;
pub use storage_routes::StorageState;
