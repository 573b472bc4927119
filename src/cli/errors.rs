//! CLI-specific error types
//!
//! Every CLI error is fatal: main prints it to stderr and exits non-zero.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::forms::FormError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Config file exists and `--force` was not given
    AlreadyInitialized,
    /// Schema failed the editor-structural pass
    InvalidSchema,
    /// Server failed to start or stopped with an error
    BootFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FORM_CLI_CONFIG_ERROR",
            Self::IoError => "FORM_CLI_IO_ERROR",
            Self::AlreadyInitialized => "FORM_CLI_ALREADY_INITIALIZED",
            Self::InvalidSchema => "FORM_CLI_INVALID_SCHEMA",
            Self::BootFailed => "FORM_CLI_BOOT_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Already initialized
    pub fn already_initialized(path: &std::path::Path) -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            format!("{} already exists. Pass --force to overwrite it.", path.display()),
        )
    }

    /// Invalid schema
    pub fn invalid_schema(error_count: usize) -> Self {
        Self::new(
            CliErrorCode::InvalidSchema,
            format!("Schema has {} structural error(s)", error_count),
        )
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<FormError> for CliError {
    fn from(e: FormError) -> Self {
        Self::boot_failed(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::invalid_schema(2);
        assert_eq!(err.to_string(), "FORM_CLI_INVALID_SCHEMA: Schema has 2 structural error(s)");
        assert_eq!(err.code(), &CliErrorCode::InvalidSchema);
    }

    #[test]
    fn test_config_error_conversion() {
        let err = CliError::from(ConfigError::Invalid("per_page must be > 0".into()));
        assert_eq!(err.code_str(), "FORM_CLI_CONFIG_ERROR");
        assert!(err.message().contains("per_page"));
    }
}
