//! Typed HTTP client for the form builder API
//!
//! Every call takes the caller's [`ClientSession`] explicitly. A 401 clears it; transport
//! failures leave both the session and the caller's schema untouched. No call is retried.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::errors::{ClientError, ClientResult};
use super::session::ClientSession;
use crate::auth::User;
use crate::forms::{FormSchema, FormValidator, FormValue, Page};
use crate::http_server::observability_routes::HealthResponse;

#[derive(Debug, Deserialize)]
struct AuthPayload {
    user: User,
    token: String,
}

/// Client for one server
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    validator: FormValidator,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            validator: FormValidator::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ==================
    // Auth
    // ==================

    /// Register and establish `session` on success
    pub async fn register(
        &self,
        session: &mut ClientSession,
        name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> ClientResult<User> {
        let body = json!({
            "name": name,
            "email": email,
            "password": password,
            "password_confirmation": password_confirmation,
        });
        let request = self.http.post(self.url("/api/register")).json(&body);
        let payload: AuthPayload = self.send_json(session, request).await?;

        session.establish(payload.user.clone(), payload.token);
        Ok(payload.user)
    }

    /// Log in and establish `session` on success
    pub async fn login(&self, session: &mut ClientSession, email: &str, password: &str) -> ClientResult<User> {
        let body = json!({ "email": email, "password": password });
        let request = self.http.post(self.url("/api/login")).json(&body);
        let payload: AuthPayload = self.send_json(session, request).await?;

        session.establish(payload.user.clone(), payload.token);
        Ok(payload.user)
    }

    /// Revoke the session's token server-side, then clear it
    pub async fn logout(&self, session: &mut ClientSession) -> ClientResult<()> {
        let request = self.http.post(self.url("/api/logout"));
        self.send(session, request).await?;
        session.clear();
        Ok(())
    }

    pub async fn current_user(&self, session: &mut ClientSession) -> ClientResult<User> {
        let request = self.http.get(self.url("/api/user"));
        self.send_json(session, request).await
    }

    // ==================
    // Forms
    // ==================

    pub async fn list_forms(&self, session: &mut ClientSession, page: usize) -> ClientResult<Page<FormSchema>> {
        let request = self
            .http
            .get(self.url("/api/forms"))
            .query(&[("page", page)]);
        self.send_json(session, request).await
    }

    pub async fn get_form(&self, session: &mut ClientSession, id: u64) -> ClientResult<FormSchema> {
        let request = self.http.get(self.url(&format!("/api/forms/{}", id)));
        self.send_json(session, request).await
    }

    /// Create (no id) or update (with id) a schema.
    ///
    /// The editor-structural pass runs first; a non-empty result is returned as
    /// [`ClientError::Invalid`] without contacting the server.
    pub async fn save_form(&self, session: &mut ClientSession, schema: &FormSchema) -> ClientResult<FormSchema> {
        let errors = self.validator.check_schema(schema);
        if !errors.is_empty() {
            return Err(ClientError::Invalid(errors));
        }

        let body = json!({
            "title": schema.title,
            "description": schema.description,
            "fields": schema.fields,
            "is_published": schema.is_published,
        });

        let request = match schema.id {
            Some(id) => self.http.put(self.url(&format!("/api/forms/{}", id))),
            None => self.http.post(self.url("/api/forms")),
        };
        self.send_json(session, request.json(&body)).await
    }

    pub async fn delete_form(&self, session: &mut ClientSession, id: u64) -> ClientResult<()> {
        let request = self.http.delete(self.url(&format!("/api/forms/{}", id)));
        self.send(session, request).await?;
        Ok(())
    }

    /// Server-side respondent-value check against a stored form
    pub async fn check_values(&self, session: &mut ClientSession, id: u64, values: &FormValue) -> ClientResult<()> {
        let request = self
            .http
            .post(self.url(&format!("/api/forms/{}/validate", id)))
            .json(&json!({ "values": values }));
        self.send(session, request).await?;
        Ok(())
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let response = self.http.get(self.url("/health")).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            return Err(ClientError::from_response(status, body));
        }
        Ok(response.json().await?)
    }

    // ==================
    // Transport
    // ==================

    async fn send_json<T: DeserializeOwned>(
        &self,
        session: &mut ClientSession,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let response = self.send(session, request).await?;
        Ok(response.json().await?)
    }

    async fn send(&self, session: &mut ClientSession, request: RequestBuilder) -> ClientResult<Response> {
        let request = match session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!("server rejected token, clearing session");
            session.clear();
            return Err(ClientError::Unauthorized);
        }

        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Err(ClientError::from_response(status, body))
    }
}
