//! CLI command implementations
//!
//! `check` and `preview` run the same validator the server and client use, so a schema
//! that passes here passes the server's structural pass too.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde_json::json;

use crate::config::AppConfig;
use crate::forms::{render_preview, FormSchema, FormValidator, FormValue};
use crate::http_server::{AppState, HttpServer};
use crate::observability::init_tracing;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, write_response};

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
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Init { config, force } => init(&config, force),
        Command::Check { schema } => check(&schema),
        Command::Preview { schema, values } => preview(&schema, values.as_deref()),
    }
}

/// Write a default configuration file
pub fn init(config_path: &Path, force: bool) -> CliResult<()> {
    if config_path.exists() && !force {
        return Err(CliError::already_initialized(config_path));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CliError::config_error(format!("Failed to create directory {}: {}", parent.display(), e))
        })?;
    }

    let config = AppConfig::default();
    fs::write(config_path, config.to_json_pretty()?)?;

    write_response(json!({
        "initialized": true,
        "config": config_path.display().to_string(),
    }))
}

/// Run the editor-structural pass on a schema file
///
/// Prints the error map either way; fails when it is non-empty.
pub fn check(schema_path: &Path) -> CliResult<()> {
    let schema: FormSchema = read_json_file(schema_path)?;
    let errors = FormValidator::new().check_schema(&schema);

    write_response(json!({
        "valid": errors.is_empty(),
        "errors": errors,
    }))?;

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CliError::invalid_schema(errors.len()))
    }
}

/// Render a schema with optional values
pub fn preview(schema_path: &Path, values_path: Option<&Path>) -> CliResult<()> {
    let schema: FormSchema = read_json_file(schema_path)?;
    let values: FormValue = match values_path {
        Some(path) => read_json_file(path)?,
        None => FormValue::new(),
    };

    let preview = render_preview(&schema.normalized(), &values);
    write_response(serde_json::to_value(preview)?)
}

/// Load configuration and run the HTTP server until ctrl-c
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = AppConfig::load_or_default(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    init_tracing(&config.log_filter);
    tracing::info!(
        config = %config_path.map(|p| p.display().to_string()).unwrap_or_else(|| "<defaults>".into()),
        data_file = ?config.storage.data_file,
        "starting formcraft"
    );

    let state = AppState::from_config(&config)?;
    let server = HttpServer::new(config.server.clone(), state)
        .with_prune_interval(Duration::from_secs(config.auth.prune_interval_secs));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}
