//! # User Management
//!
//! User model, register/login request checks and the user repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::crypto::{hash_password, verify_password, PasswordPolicy};
use super::errors::{AuthError, AuthResult};
use crate::rules::{is_blank, is_valid_email, messages, ErrorBag};

/// Longest accepted name or email, in characters
pub const MAX_CHARS: usize = 255;

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// User's email address (unique)
    pub email: String,

    /// Argon2id password hash (never plaintext)
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user, hashing the password
    pub fn new(name: String, email: String, password: &str) -> AuthResult<Self> {
        let password_hash = hash_password(password)?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    /// Verify a password against this user's stored hash
    pub fn verify_password(&self, password: &str) -> AuthResult<bool> {
        verify_password(password, &self.password_hash)
    }
}

/// Registration request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Read a register body, recording rule failures in `bag`.
    ///
    /// The returned request is only meaningful when nothing was recorded. Email
    /// uniqueness needs the repository and is checked by the caller.
    pub fn from_body(body: &Value, policy: &PasswordPolicy, bag: &mut ErrorBag) -> Self {
        let name = required_string(body, "name", bag);
        if name.chars().count() > MAX_CHARS {
            bag.add("name", messages::max_chars("name", MAX_CHARS));
        }

        let email = required_email(body, bag);

        let password = required_string(body, "password", bag);
        if !bag.has("password") {
            if !policy.is_satisfied_by(&password) {
                bag.add("password", messages::min_chars("password", policy.min_length));
            }
            if body.get("password_confirmation").and_then(Value::as_str) != Some(password.as_str()) {
                bag.add("password", messages::confirmed("password"));
            }
        }

        Self {
            name,
            email,
            password,
        }
    }
}

/// Login request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_body(body: &Value, bag: &mut ErrorBag) -> Self {
        Self {
            email: required_email(body, bag),
            password: required_string(body, "password", bag),
        }
    }
}

fn required_string(body: &Value, key: &str, bag: &mut ErrorBag) -> String {
    let value = body.get(key);
    if is_blank(value) {
        bag.add(key, messages::required(key));
        return String::new();
    }
    match value.and_then(Value::as_str) {
        Some(s) => s.to_string(),
        None => {
            bag.add(key, messages::string(key));
            String::new()
        }
    }
}

fn required_email(body: &Value, bag: &mut ErrorBag) -> String {
    let email = required_string(body, "email", bag);
    if bag.has("email") {
        return email;
    }
    if !is_valid_email(&email) {
        bag.add("email", messages::email("email"));
    } else if email.chars().count() > MAX_CHARS {
        bag.add("email", messages::max_chars("email", MAX_CHARS));
    }
    email
}

/// User repository trait
///
/// Abstracts storage operations for users.
pub trait UserRepository: Send + Sync {
    /// Find a user by their ID
    fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>>;

    /// Find a user by their email
    fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Check if an email is already registered
    fn email_exists(&self, email: &str) -> AuthResult<bool>;

    /// Create a new user
    fn create(&self, user: &User) -> AuthResult<()>;
}

/// In-memory user repository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: std::sync::RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    fn email_exists(&self, email: &str) -> AuthResult<bool> {
        let users = self
            .users
            .read()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))?;
        Ok(users.iter().any(|u| u.email == email))
    }

    fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self
            .users
            .write()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))?;

        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailAlreadyExists);
        }

        users.push(user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register_body() -> Value {
        json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "password123",
            "password_confirmation": "password123"
        })
    }

    #[test]
    fn test_user_creation() {
        let user = User::new("Ada".into(), "ada@example.com".into(), "password123").unwrap();

        assert_eq!(user.email, "ada@example.com");
        assert!(!user.password_hash.is_empty());
        assert_ne!(user.password_hash, "password123"); // Not plaintext!
        assert!(user.verify_password("password123").unwrap());
        assert!(!user.verify_password("wrong_password").unwrap());
    }

    #[test]
    fn test_valid_register_body() {
        let mut bag = ErrorBag::new();
        let request = RegisterRequest::from_body(&register_body(), &PasswordPolicy::default(), &mut bag);

        assert!(bag.is_empty());
        assert_eq!(request.name, "Ada");
        assert_eq!(request.password, "password123");
    }

    #[test]
    fn test_register_rules() {
        let body = json!({
            "name": "x".repeat(256),
            "email": "not-an-email",
            "password": "short",
            "password_confirmation": "different"
        });
        let mut bag = ErrorBag::new();
        RegisterRequest::from_body(&body, &PasswordPolicy::default(), &mut bag);
        let errors = bag.into_inner();

        assert_eq!(errors["name"], vec!["The name field must not be greater than 255 characters."]);
        assert_eq!(errors["email"], vec!["The email field must be a valid email address."]);
        assert_eq!(
            errors["password"],
            vec![
                "The password field must be at least 8 characters.",
                "The password field confirmation does not match."
            ]
        );
    }

    #[test]
    fn test_register_empty_body() {
        let mut bag = ErrorBag::new();
        RegisterRequest::from_body(&json!({}), &PasswordPolicy::default(), &mut bag);
        let errors = bag.into_inner();

        assert_eq!(errors["name"], vec!["The name field is required."]);
        assert_eq!(errors["email"], vec!["The email field is required."]);
        assert_eq!(errors["password"], vec!["The password field is required."]);
    }

    #[test]
    fn test_login_rules() {
        let mut bag = ErrorBag::new();
        LoginRequest::from_body(&json!({"email": "a@b.co", "password": 12}), &mut bag);
        let errors = bag.into_inner();

        assert!(!errors.contains_key("email"));
        assert_eq!(errors["password"], vec!["The password field must be a string."]);
    }

    #[test]
    fn test_in_memory_repository() {
        let repo = InMemoryUserRepository::new();

        let user = User::new("Ada".into(), "ada@example.com".into(), "password123").unwrap();
        let user_id = user.id;
        repo.create(&user).unwrap();

        let found = repo.find_by_id(user_id).unwrap();
        assert_eq!(found.unwrap().email, "ada@example.com");
        assert!(repo.find_by_email("ada@example.com").unwrap().is_some());
        assert!(repo.email_exists("ada@example.com").unwrap());
        assert!(!repo.email_exists("other@example.com").unwrap());

        // Duplicate email rejected
        let user2 = User::new("Eve".into(), "ada@example.com".into(), "password456").unwrap();
        assert!(matches!(repo.create(&user2), Err(AuthError::EmailAlreadyExists)));
    }

    #[test]
    fn test_user_serialization_omits_password() {
        let user = User::new("Ada".into(), "ada@example.com".into(), "password123").unwrap();
        let json = serde_json::to_string(&user).unwrap();

        assert!(!json.contains("password_hash"));
        assert!(!json.contains(&user.password_hash));
        assert!(json.contains("\"name\":\"Ada\""));
    }
}
