//! CLI argument definitions using clap
//!
//! Commands:
//! - formcraft serve [--config <path>] [--port <port>]
//! - formcraft init [--config <path>] [--force]
//! - formcraft check --schema <path>
//! - formcraft preview --schema <path> [--values <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// formcraft - form builder service with shared schema validation
#[derive(Parser, Debug)]
#[command(name = "formcraft")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API server
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override `server.port` from the configuration
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a configuration file with default values
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./formcraft.json")]
        config: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Run the editor-structural checks on a schema file
    Check {
        /// Path to a form schema JSON file
        #[arg(long)]
        schema: PathBuf,
    },

    /// Render a schema (and optional values) as the respondent would see it
    Preview {
        /// Path to a form schema JSON file
        #[arg(long)]
        schema: PathBuf,

        /// Path to a JSON object of field id to value
        #[arg(long)]
        values: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
