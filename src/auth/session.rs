//! # Session Management
//!
//! Bearer-token sessions. The raw token is handed to the client once; only its
//! SHA-256 hash is kept.
//!
//! ## Invariants
//! - Sessions expire at the stated time
//! - Logout invalidates immediately

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::crypto::{constant_time_str_eq, generate_token, hash_token};
use super::errors::{AuthError, AuthResult};

/// Session model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub id: Uuid,

    /// User this session belongs to
    pub user_id: Uuid,

    /// Hashed bearer token (raw token given to client)
    #[serde(skip_serializing, default)]
    pub token_hash: String,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session expires
    pub expires_at: DateTime<Utc>,

    /// Whether the session has been revoked
    pub revoked: bool,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Session manager configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Bearer token lifetime
    pub token_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_ttl: Duration::hours(24),
        }
    }
}

/// Session manager handles session creation and validation
pub struct SessionManager<R: SessionRepository> {
    config: SessionConfig,
    repository: R,
}

impl<R: SessionRepository> SessionManager<R> {
    pub fn new(config: SessionConfig, repository: R) -> Self {
        Self { config, repository }
    }

    /// Create a new session for a user
    ///
    /// Returns the raw bearer token (not hashed) to give to the client.
    pub fn create_session(&self, user_id: Uuid) -> AuthResult<(Session, String)> {
        let token = generate_token();
        let token_hash = hash_token(&token);

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            created_at: now,
            expires_at: now
                .checked_add_signed(self.config.token_ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            revoked: false,
        };

        self.repository.create(&session)?;

        Ok((session, token))
    }

    /// Validate a bearer token and return the associated session
    pub fn validate(&self, token: &str) -> AuthResult<Session> {
        let token_hash = hash_token(token);

        let session = self
            .repository
            .find_by_token_hash(&token_hash)?
            .ok_or(AuthError::SessionInvalid)?;

        if session.revoked {
            return Err(AuthError::SessionRevoked);
        }

        if session.is_expired(Utc::now()) {
            return Err(AuthError::SessionInvalid);
        }

        Ok(session)
    }

    /// Revoke a session (logout)
    pub fn revoke_session(&self, session_id: Uuid) -> AuthResult<()> {
        self.repository.revoke(session_id)
    }

    /// Drop expired and revoked sessions
    pub fn prune(&self) -> AuthResult<usize> {
        self.repository.delete_stale(Utc::now())
    }
}

/// Session repository trait
pub trait SessionRepository: Send + Sync {
    /// Create a new session
    fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find session by token hash
    fn find_by_token_hash(&self, hash: &str) -> AuthResult<Option<Session>>;

    /// Revoke a session
    fn revoke(&self, id: Uuid) -> AuthResult<()>;

    /// Delete sessions that expired before `now` or were revoked
    fn delete_stale(&self, now: DateTime<Utc>) -> AuthResult<usize>;
}

/// In-memory session repository
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: std::sync::RwLock<Vec<Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn create(&self, session: &Session) -> AuthResult<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))?;
        sessions.push(session.clone());
        Ok(())
    }

    fn find_by_token_hash(&self, hash: &str) -> AuthResult<Option<Session>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))?;
        Ok(sessions
            .iter()
            .find(|s| constant_time_str_eq(&s.token_hash, hash))
            .cloned())
    }

    fn revoke(&self, id: Uuid) -> AuthResult<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))?;

        if let Some(session) = sessions.iter_mut().find(|s| s.id == id) {
            session.revoked = true;
            Ok(())
        } else {
            Err(AuthError::SessionInvalid)
        }
    }

    fn delete_stale(&self, now: DateTime<Utc>) -> AuthResult<usize> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))?;

        let len_before = sessions.len();
        sessions.retain(|s| !s.revoked && !s.is_expired(now));
        Ok(len_before - sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_manager() -> SessionManager<InMemorySessionRepository> {
        SessionManager::new(SessionConfig::default(), InMemorySessionRepository::new())
    }

    #[test]
    fn test_session_creation() {
        let manager = create_manager();
        let user_id = Uuid::new_v4();

        let (session, token) = manager.create_session(user_id).unwrap();

        assert_eq!(session.user_id, user_id);
        assert!(!session.revoked);
        assert!(!token.is_empty());
        assert_ne!(session.token_hash, token);
        assert_eq!(session.expires_at - session.created_at, Duration::hours(24));
    }

    #[test]
    fn test_token_validation() {
        let manager = create_manager();
        let user_id = Uuid::new_v4();

        let (_, token) = manager.create_session(user_id).unwrap();

        let session = manager.validate(&token).unwrap();
        assert_eq!(session.user_id, user_id);

        let result = manager.validate("invalid_token");
        assert!(matches!(result, Err(AuthError::SessionInvalid)));
    }

    #[test]
    fn test_session_revocation() {
        let manager = create_manager();
        let (session, token) = manager.create_session(Uuid::new_v4()).unwrap();

        manager.revoke_session(session.id).unwrap();

        let result = manager.validate(&token);
        assert!(matches!(result, Err(AuthError::SessionRevoked)));
    }

    #[test]
    fn test_revocation_leaves_other_sessions() {
        let manager = create_manager();
        let user_id = Uuid::new_v4();

        let (first, token1) = manager.create_session(user_id).unwrap();
        let (_, token2) = manager.create_session(user_id).unwrap();

        manager.revoke_session(first.id).unwrap();

        assert!(matches!(manager.validate(&token1), Err(AuthError::SessionRevoked)));
        assert!(manager.validate(&token2).is_ok());
    }

    #[test]
    fn test_expired_session_is_invalid() {
        let manager = SessionManager::new(
            SessionConfig {
                token_ttl: Duration::seconds(-1),
            },
            InMemorySessionRepository::new(),
        );

        let (_, token) = manager.create_session(Uuid::new_v4()).unwrap();
        assert!(matches!(manager.validate(&token), Err(AuthError::SessionInvalid)));
    }

    #[test]
    fn test_expiry_clamps_instead_of_overflowing() {
        let manager = SessionManager::new(
            SessionConfig {
                token_ttl: Duration::hours(3_000_000_000),
            },
            InMemorySessionRepository::new(),
        );

        let (session, token) = manager.create_session(Uuid::new_v4()).unwrap();
        assert_eq!(session.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(manager.validate(&token).is_ok());
    }

    #[test]
    fn test_prune_drops_expired_and_revoked() {
        let repo = InMemorySessionRepository::new();
        let now = Utc::now();
        let make = |expires_at, revoked| Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: hash_token(&generate_token()),
            created_at: now,
            expires_at,
            revoked,
        };

        let live = make(now + Duration::hours(1), false);
        repo.create(&live).unwrap();
        repo.create(&make(now - Duration::hours(1), false)).unwrap();
        repo.create(&make(now + Duration::hours(1), true)).unwrap();

        assert_eq!(repo.delete_stale(now).unwrap(), 2);
        assert!(repo.find_by_token_hash(&live.token_hash).unwrap().is_some());
        assert_eq!(repo.delete_stale(now).unwrap(), 0);
    }
}
