//! CLI module for filedrop
//!
//! Provides command-line interface for:
//! - serve: Run the HTTP storage server
//! - list: Print the stored files

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{list, load_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_json;
