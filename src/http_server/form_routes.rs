//! Form HTTP Routes
//!
//! Owner-scoped CRUD over form schemas plus a value-check endpoint. Every write is
//! re-validated here; the client's own pass is never trusted.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Json, Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::errors::{ApiError, ApiResult};
use super::extract::AuthUser;
use super::state::AppState;
use crate::forms::{validate_create, validate_update, validate_values, FormSchema, FormValue, Page};
use crate::rules::FieldErrors;

/// Form routes, mounted under `/api`
pub fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/forms", get(index_handler).post(store_handler))
        .route(
            "/forms/:id",
            get(show_handler).put(update_handler).delete(destroy_handler),
        )
        .route("/forms/:id/validate", post(validate_handler))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

/// Non-numeric ids can never name a form
fn form_id(id: Result<Path<u64>, PathRejection>) -> ApiResult<u64> {
    id.map(|Path(id)| id).map_err(|_| ApiError::NotFound)
}

// ==================
// Handlers
// ==================

async fn index_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<Page<FormSchema>>> {
    let Query(query) = query?;
    let page = state
        .forms
        .list(auth.user.id, query.page.unwrap_or(1), state.per_page)?;
    Ok(Json(page))
}

async fn store_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<FormSchema>)> {
    let Json(body) = body?;
    let schema = validate_create(&body).map_err(ApiError::Validation)?;

    let form = state.forms.create(auth.user.id, schema)?;
    tracing::info!(form_id = ?form.id, user_id = %auth.user.id, "form created");

    Ok((StatusCode::CREATED, Json(form)))
}

async fn show_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<FormSchema>> {
    let id = form_id(id)?;
    let form = state
        .forms
        .find(auth.user.id, id)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(form))
}

async fn update_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<FormSchema>> {
    let id = form_id(id)?;
    let existing = state
        .forms
        .find(auth.user.id, id)?
        .ok_or(ApiError::NotFound)?;

    let Json(body) = body?;
    let schema = validate_update(&body, existing).map_err(ApiError::Validation)?;

    let form = state.forms.update(auth.user.id, id, schema)?;
    tracing::info!(form_id = id, user_id = %auth.user.id, "form updated");

    Ok(Json(form))
}

async fn destroy_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = form_id(id)?;
    state.forms.delete(auth.user.id, id)?;
    tracing::info!(form_id = id, user_id = %auth.user.id, "form deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Runs the respondent-value pass against a stored form
async fn validate_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let id = form_id(id)?;
    let form = state
        .forms
        .find(auth.user.id, id)?
        .ok_or(ApiError::NotFound)?;

    let Json(body) = body?;
    let values = parse_values(&body)?;

    let errors = validate_values(&form.fields, &values);
    if !errors.is_empty() {
        return Err(ApiError::InvalidValues(errors));
    }

    Ok(Json(json!({ "valid": true, "errors": {} })))
}

fn parse_values(body: &Value) -> ApiResult<FormValue> {
    match body.get("values") {
        None | Some(Value::Null) => Ok(FormValue::new()),
        Some(values) => serde_json::from_value(values.clone()).map_err(|_| {
            ApiError::Validation(FieldErrors::from([(
                "values".to_string(),
                vec!["The values field must map field ids to strings or lists of strings.".to_string()],
            )]))
        }),
    }
}
