//! # Auth Service
//!
//! Registration, login, bearer-token authentication and logout.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::crypto::PasswordPolicy;
use super::errors::{AuthError, AuthResult};
use super::session::{Session, SessionConfig, SessionManager, SessionRepository};
use super::user::{LoginRequest, RegisterRequest, User, UserRepository};
use crate::rules::{messages, ErrorBag};

/// Auth service combining all auth components
pub struct AuthService<U: UserRepository, S: SessionRepository> {
    user_repo: U,
    session_manager: SessionManager<S>,
    password_policy: PasswordPolicy,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    pub fn new(
        user_repo: U,
        session_repo: S,
        session_config: SessionConfig,
        password_policy: PasswordPolicy,
    ) -> Self {
        Self {
            user_repo,
            session_manager: SessionManager::new(session_config, session_repo),
            password_policy,
        }
    }

    /// Register a new user from a raw request body and open a session for them.
    pub fn register(&self, body: &Value) -> AuthResult<(User, String)> {
        let mut bag = ErrorBag::new();
        let request = RegisterRequest::from_body(body, &self.password_policy, &mut bag);

        if !bag.has("email") && self.user_repo.email_exists(&request.email)? {
            bag.add("email", messages::taken("email"));
        }
        bag.into_result().map_err(AuthError::Validation)?;

        let user = User::new(request.name, request.email, &request.password)?;
        self.user_repo.create(&user)?;

        let (session, token) = self.session_manager.create_session(user.id)?;
        tracing::info!(user_id = %user.id, session_id = %session.id, "user registered");

        Ok((user, token))
    }

    /// Authenticate a user from a raw request body
    pub fn login(&self, body: &Value) -> AuthResult<(User, String)> {
        let mut bag = ErrorBag::new();
        let request = LoginRequest::from_body(body, &mut bag);
        bag.into_result().map_err(AuthError::Validation)?;

        let user = self
            .user_repo
            .find_by_email(&request.email)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.verify_password(&request.password)? {
            tracing::warn!(user_id = %user.id, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let (session, token) = self.session_manager.create_session(user.id)?;
        tracing::info!(user_id = %user.id, session_id = %session.id, "user logged in");

        Ok((user, token))
    }

    /// Resolve a bearer token to its user and session
    pub fn authenticate(&self, token: &str) -> AuthResult<(User, Session)> {
        let session = self.session_manager.validate(token)?;
        let user = self
            .user_repo
            .find_by_id(session.user_id)?
            .ok_or(AuthError::SessionInvalid)?;
        Ok((user, session))
    }

    /// Logout (revoke the presenting session)
    pub fn logout(&self, session_id: Uuid) -> AuthResult<()> {
        self.session_manager.revoke_session(session_id)?;
        tracing::info!(session_id = %session_id, "session revoked");
        Ok(())
    }

    /// Remove expired and revoked sessions
    pub fn prune_sessions(&self) -> AuthResult<usize> {
        self.session_manager.prune()
    }
}

// ==================
// HTTP Response Types
// ==================

/// Body of a successful register/login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}
