//! # Auth Module
//!
//! User registration, password login and bearer-token sessions.

pub mod api;
pub mod crypto;
pub mod errors;
pub mod session;
pub mod user;

pub use api::{AuthResponse, AuthService};
pub use crypto::PasswordPolicy;
pub use errors::{AuthError, AuthResult};
pub use session::{InMemorySessionRepository, Session, SessionConfig, SessionManager, SessionRepository};
pub use user::{InMemoryUserRepository, User, UserRepository};
