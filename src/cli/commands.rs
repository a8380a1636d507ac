//! CLI command implementations

use std::fs;
use std::path::{Path, PathBuf};

use crate::file_storage::{FileService, StorageRoot};
use crate::http_server::{HttpServer, ServerConfig};
use crate::observability::{log_event, Event};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Load configuration from a JSON file, or defaults when no file is given
pub fn load_config(path: Option<&Path>) -> CliResult<ServerConfig> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| {
                CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
            })?;

            serde_json::from_str(&content)
                .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?
        }
        None => ServerConfig::default(),
    };

    config.validate().map_err(CliError::config_error)?;
    Ok(config)
}

/// Apply command-line overrides, then re-validate
fn apply_overrides(
    mut config: ServerConfig,
    port: Option<u16>,
    storage_root: Option<PathBuf>,
    max_upload_bytes: Option<u64>,
) -> CliResult<ServerConfig> {
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(storage_root) = storage_root {
        config.storage_root = storage_root;
    }
    if let Some(max_upload_bytes) = max_upload_bytes {
        config.max_upload_bytes = max_upload_bytes;
        config.max_request_bytes = config.max_request_bytes.max(max_upload_bytes);
    }

    config.validate().map_err(CliError::config_error)?;
    Ok(config)
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            port,
            storage_root,
            max_upload_bytes,
        } => {
            let config = load_config(config.as_deref())?;
            serve(apply_overrides(config, port, storage_root, max_upload_bytes)?)
        }
        Command::List {
            config,
            storage_root,
            pretty,
        } => {
            let config = load_config(config.as_deref())?;
            list(&apply_overrides(config, None, storage_root, None)?, pretty)
        }
    }
}

/// Start the HTTP server and block until it stops
pub fn serve(config: ServerConfig) -> CliResult<()> {
    let root = config.storage_root.display().to_string();
    let port = config.port.to_string();
    let max_upload = config.max_upload_bytes.to_string();
    log_event(
        Event::ConfigLoaded,
        &[
            ("max_upload_bytes", max_upload.as_str()),
            ("port", port.as_str()),
            ("storage_root", root.as_str()),
        ],
    );

    let server = HttpServer::with_config(config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print every stored file as a JSON array
pub fn list(config: &ServerConfig, pretty: bool) -> CliResult<()> {
    let service = FileService::with_max_upload_bytes(
        StorageRoot::new(config.storage_root.clone()),
        config.max_upload_bytes,
    );

    let files = service.list()?;
    write_json(&files, pretty)
}
