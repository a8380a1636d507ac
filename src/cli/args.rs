//! CLI argument definitions using clap
//!
//! Commands:
//! - filedrop serve [--config <path>] [--port <n>] [--storage-root <dir>] [--max-upload-bytes <n>]
//! - filedrop list [--config <path>] [--storage-root <dir>] [--pretty]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// filedrop - A minimal flat-directory file storage service
#[derive(Parser, Debug)]
#[command(name = "filedrop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,

        /// Storage root directory (overrides the config file)
        #[arg(long)]
        storage_root: Option<PathBuf>,

        /// Per-file upload ceiling in bytes (overrides the config file)
        #[arg(long)]
        max_upload_bytes: Option<u64>,
    },

    /// Print the stored files as JSON and exit
    List {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Storage root directory (overrides the config file)
        #[arg(long)]
        storage_root: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
