//! Authenticated REST resource client
//!
//! Thin wrapper over `reqwest` that attaches the session credential to every
//! call, unwraps pagination envelopes at the boundary, and converts HTTP
//! failures into [`ClientError`] values with a human-readable message.

pub mod session;

pub use session::Session;

use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::{
    aggregate,
    config::ClientConfig,
    error::{ClientError, ClientResult},
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Build a client bound to the given session context.
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.api.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue a request and decode the JSON body. An empty body (204 or
    /// zero-length 200) decodes to `Value::Null`.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        let mut builder = self.http.request(method.clone(), self.url(path));
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        tracing::debug!(%method, path, "API request");
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Expired or revoked credential: force the logout side effect
            // before surfacing the error.
            self.session.invalidate();
            let message = Self::error_message(response).await;
            return Err(ClientError::Unauthorized(message));
        }

        if !status.is_success() {
            let message = Self::error_message(response).await;
            tracing::warn!(%status, path, "API request failed: {}", message);
            return Err(ClientError::Http(message));
        }

        let text = response.text().await?;
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ClientError::Payload(format!("{} returned invalid JSON: {}", path, e)))
    }

    /// Best-effort human-readable message: prefer the server payload's
    /// `error` / `detail` / `message` field, fall back to the status line.
    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        let fallback = || {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        };
        match response.json::<Value>().await {
            Ok(Value::Object(map)) => ["error", "detail", "message"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(fallback),
            _ => fallback(),
        }
    }

    /// GET a collection endpoint and normalize the payload to a plain list.
    /// Pagination metadata (`count`, `next`, ...) is discarded here; callers
    /// needing totals use the list length or a dedicated stats endpoint.
    pub async fn fetch_list(&self, path: &str) -> ClientResult<Vec<Value>> {
        let value = self.request(Method::GET, path, None).await?;
        Ok(aggregate::normalize(value))
    }

    /// GET a single JSON object (stats endpoints, detail views).
    pub async fn fetch(&self, path: &str) -> ClientResult<Value> {
        self.request(Method::GET, path, None).await
    }

    /// POST a mutation. Callers must follow any successful mutation with a
    /// full re-aggregation rather than patching local state.
    pub async fn post(&self, path: &str, body: &Value) -> ClientResult<Value> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// POST an action endpoint with no body (`/fines/{id}/pay/`, ...).
    pub async fn post_action(&self, path: &str) -> ClientResult<Value> {
        self.request(Method::POST, path, None).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> ClientResult<Value> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<Value> {
        self.request(Method::DELETE, path, None).await
    }
}
