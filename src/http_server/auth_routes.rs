//! Auth HTTP Routes
//!
//! Register, login, logout and current-user endpoints over the shared AuthService.

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use super::errors::ApiResult;
use super::extract::AuthUser;
use super::state::AppState;
use crate::auth::{AuthResponse, User};

pub const LOGGED_OUT: &str = "Logged out successfully";

/// Auth routes, mounted under `/api`
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/user", get(user_handler))
}

// ==================
// Handlers
// ==================

/// Register handler
async fn register_handler(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let Json(body) = body?;
    let (user, token) = state.auth.register(&body)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Login handler
async fn login_handler(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(body) = body?;
    let (user, token) = state.auth.login(&body)?;
    Ok(Json(AuthResponse { user, token }))
}

/// Logout handler: revokes only the presenting token
async fn logout_handler(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Value>> {
    state.auth.logout(auth.session.id)?;
    Ok(Json(json!({ "message": LOGGED_OUT })))
}

/// Current user handler
async fn user_handler(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}
