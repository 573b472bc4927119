//! Client-side session
//!
//! The session is the only place a client keeps its bearer token. It is established by
//! register/login and cleared by logout or by any 401 from the server.

use crate::auth::User;

#[derive(Debug, Clone, Default)]
pub struct ClientSession {
    token: Option<String>,
    user: Option<User>,
}

impl ClientSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume with a token obtained earlier
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user: None,
        }
    }

    pub fn establish(&mut self, user: User, token: String) {
        self.user = Some(user);
        self.token = Some(token);
    }

    /// Forget the token and user; the caller must authenticate again
    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}
