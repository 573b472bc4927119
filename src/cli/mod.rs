//! CLI module for formcraft
//!
//! Provides command-line interface for:
//! - serve: Run the HTTP API
//! - init: Write a default configuration file
//! - check: Structural checks on a schema file
//! - preview: Render a schema with optional values

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, init, preview, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, write_response};
