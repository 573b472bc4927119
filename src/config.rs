//! Application configuration
//!
//! One JSON file, every key optional:
//!
//! ```json
//! {
//!   "server": { "host": "127.0.0.1", "port": 8000, "cors_origins": [] },
//!   "auth": { "token_ttl_hours": 24, "password_min_length": 8, "prune_interval_secs": 300 },
//!   "storage": { "data_file": "./forms.json" },
//!   "per_page": 10,
//!   "log_filter": "formcraft=info,tower_http=info"
//! }
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Configuration load failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Listener and browser-origin settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// IP address to bind
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API from a browser; empty allows any
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    // The editor's dev server
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl ServerConfig {
    /// `host` and `port` as an address to bind
    pub fn bind_addr(&self) -> ConfigResult<SocketAddr> {
        let ip = self
            .host
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("server.host {:?} is not an IP address", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Upper bound for `auth.token_ttl_hours` (ten years)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

/// Session and password settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token lifetime
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,

    /// How often expired sessions are pruned
    #[serde(default = "default_prune_interval_secs")]
    pub prune_interval_secs: u64,
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_password_min_length() -> usize {
    8
}

fn default_prune_interval_secs() -> u64 {
    300
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: default_token_ttl_hours(),
            password_min_length: default_password_min_length(),
            prune_interval_secs: default_prune_interval_secs(),
        }
    }
}

/// Form storage settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON snapshot file; forms are kept in memory only when unset
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Page size for form listings
    #[serde(default = "default_per_page")]
    pub per_page: usize,

    /// `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_per_page() -> usize {
    10
}

fn default_log_filter() -> String {
    "formcraft=info,tower_http=info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            per_page: default_per_page(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Load `path` when given, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.per_page == 0 {
            return Err(ConfigError::Invalid("per_page must be > 0".into()));
        }

        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.auth.token_ttl_hours) {
            return Err(ConfigError::Invalid(format!(
                "auth.token_ttl_hours must be between 1 and {}",
                MAX_TOKEN_TTL_HOURS
            )));
        }

        if self.auth.password_min_length == 0 {
            return Err(ConfigError::Invalid("auth.password_min_length must be > 0".into()));
        }

        if self.auth.prune_interval_secs == 0 {
            return Err(ConfigError::Invalid("auth.prune_interval_secs must be > 0".into()));
        }

        self.server.bind_addr()?;

        Ok(())
    }

    /// Pretty JSON, as written by `init`
    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
