//! Bearer-token authentication extractor

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::errors::ApiError;
use super::state::AppState;
use crate::auth::{Session, User};

/// The authenticated caller. Rejects with 401 when the token is missing or dead.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub session: Session,
}

/// Token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthenticated)?;

        let (user, session) = state.auth.authenticate(token).map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            ApiError::from(e)
        })?;

        Ok(AuthUser { user, session })
    }
}
