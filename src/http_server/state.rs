//! Shared handler state

use std::sync::Arc;

use chrono::Duration;

use crate::auth::{
    AuthService, InMemorySessionRepository, InMemoryUserRepository, PasswordPolicy, SessionConfig,
};
use crate::config::AppConfig;
use crate::forms::{FileFormRepository, FormRepository, FormResult, InMemoryFormRepository};

/// The auth service as wired into the server
pub type AppAuthService = AuthService<InMemoryUserRepository, InMemorySessionRepository>;

/// State cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AppAuthService>,
    pub forms: Arc<dyn FormRepository>,
    pub per_page: usize,
}

impl AppState {
    pub fn new(auth: AppAuthService, forms: Arc<dyn FormRepository>, per_page: usize) -> Self {
        Self {
            auth: Arc::new(auth),
            forms,
            per_page,
        }
    }

    /// State with in-memory form storage regardless of `storage.data_file`
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::new(
            auth_service(config),
            Arc::new(InMemoryFormRepository::new()),
            config.per_page,
        )
    }

    /// State backed by the configured storage
    pub fn from_config(config: &AppConfig) -> FormResult<Self> {
        let forms: Arc<dyn FormRepository> = match &config.storage.data_file {
            Some(path) => Arc::new(FileFormRepository::open(path)?),
            None => Arc::new(InMemoryFormRepository::new()),
        };

        Ok(Self::new(auth_service(config), forms, config.per_page))
    }
}

fn auth_service(config: &AppConfig) -> AppAuthService {
    AuthService::new(
        InMemoryUserRepository::new(),
        InMemorySessionRepository::new(),
        SessionConfig {
            token_ttl: Duration::hours(config.auth.token_ttl_hours),
        },
        PasswordPolicy::new(config.auth.password_min_length),
    )
}
