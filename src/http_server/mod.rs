//! # HTTP Server Module
//!
//! Axum server for the form builder API.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/register`, `/api/login`, `/api/logout`, `/api/user` - Authentication
//! - `/api/forms/*` - Form schemas (bearer token required)

pub mod auth_routes;
pub mod errors;
pub mod extract;
pub mod form_routes;
pub mod observability_routes;
pub mod server;
pub mod state;

pub use errors::{ApiError, ApiResult};
pub use extract::AuthUser;
pub use server::{build_router, spawn_session_pruner, HttpServer};
pub use state::{AppAuthService, AppState};
