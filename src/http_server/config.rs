//! HTTP Server Configuration
//!
//! Bind address, storage root, upload limits and CORS settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::file_storage::DEFAULT_MAX_UPLOAD_BYTES;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Storage root, relative to the working directory (default: "uploads")
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,

    /// Per-file admission ceiling (default: 10 MiB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    /// Whole-request body limit for uploads (default: 64 MiB)
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: u64,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_max_request_bytes() -> u64 {
    64 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            storage_root: default_storage_root(),
            max_upload_bytes: default_max_upload_bytes(),
            max_request_bytes: default_max_request_bytes(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string; IPv6 hosts are bracketed
    pub fn socket_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Host with IPv6 brackets removed, as accepted by the resolver
    pub fn bind_host(&self) -> &str {
        self.host.trim_start_matches('[').trim_end_matches(']')
    }

    /// Check limits and paths
    pub fn validate(&self) -> Result<(), String> {
        if self.storage_root.as_os_str().is_empty() {
            return Err("storage_root must not be empty".to_string());
        }
        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be > 0".to_string());
        }
        if self.max_request_bytes < self.max_upload_bytes {
            return Err(format!(
                "max_request_bytes ({}) must be >= max_upload_bytes ({})",
                self.max_request_bytes, self.max_upload_bytes
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.storage_root, PathBuf::from("uploads"));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_socket_addr_ipv6_and_names() {
        let mut config = ServerConfig::with_port(5000);

        config.host = "::".to_string();
        assert_eq!(config.socket_addr(), "[::]:5000");
        assert_eq!(config.bind_host(), "::");

        config.host = "[::1]".to_string();
        assert_eq!(config.socket_addr(), "[::1]:5000");
        assert_eq!(config.bind_host(), "::1");

        config.host = "localhost".to_string();
        assert_eq!(config.socket_addr(), "localhost:5000");
        assert_eq!(config.bind_host(), "localhost");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ServerConfig =
            serde_json::from_str(r#"{"port": 9000, "storage_root": "/srv/files"}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.storage_root, PathBuf::from("/srv/files"));
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_limits() {
        let mut config = ServerConfig::default();
        config.max_upload_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.max_request_bytes = config.max_upload_bytes - 1;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.storage_root = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
