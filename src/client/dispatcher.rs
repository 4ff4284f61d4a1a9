//! Request Dispatcher
//!
//! HTTP client for the Trackle REST backend. Resolves resource paths
//! against the configured base URL, attaches the session's bearer token
//! and turns every reply into an envelope or an [`ErrorResponse`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::envelope::{ApiResponse, PaginatedResponse};
use super::error::{normalize, ClientError, ErrorResponse};
use super::session::{ClearReason, Session};

/// Paths served outside the API prefix
pub const UNPREFIXED_PATHS: [&str; 4] = ["/login", "/register", "/me", "/auth/check"];

/// Result of a call returning a single envelope
pub type ApiResult<T> = Result<ApiResponse<T>, ErrorResponse>;

/// Result of a list call
pub type PaginatedResult<T> = Result<PaginatedResponse<T>, ErrorResponse>;

/// Connection settings for [`ApiClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin (e.g., "http://localhost:8080")
    pub base_url: String,
    /// Prefix for resource routes (e.g., "/api/v1")
    pub api_prefix: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_prefix: "/api/v1".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Called whenever the server rejects the session with 401.
///
/// The token has already been evicted when this runs.
pub trait AuthFailureHandler: Send + Sync {
    fn on_unauthorized(&self, path: &str);
}

impl<F> AuthFailureHandler for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_unauthorized(&self, path: &str) {
        self(path)
    }
}

struct LogOnly;

impl AuthFailureHandler for LogOnly {
    fn on_unauthorized(&self, path: &str) {
        tracing::info!(path, "Authentication required, please log in again");
    }
}

/// Per-call overrides
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(HeaderName, HeaderValue)>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Trackle REST API client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    session: Session,
    on_unauthorized: Arc<dyn AuthFailureHandler>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish()
    }
}

impl ApiClient {
    /// Create a new client with the given configuration and session
    pub fn new(config: ClientConfig, session: Session) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            config: ClientConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_prefix: normalize_prefix(&config.api_prefix),
                request_timeout_ms: config.request_timeout_ms,
            },
            session,
            on_unauthorized: Arc::new(LogOnly),
        })
    }

    /// Replace the 401 callback
    pub fn on_unauthorized(mut self, handler: impl AuthFailureHandler + 'static) -> Self {
        self.on_unauthorized = Arc::new(handler);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Absolute URL for a resource path
    pub fn url(&self, path: &str) -> String {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        let route = path.split(['?', '#']).next().unwrap_or_default();
        if UNPREFIXED_PATHS.contains(&route) {
            format!("{}{}", self.config.base_url, path)
        } else {
            format!("{}{}{}", self.config.base_url, self.config.api_prefix, path)
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<RequestOptions>,
    ) -> ApiResult<T> {
        self.dispatch::<(), _>(Method::GET, path, None, options).await
    }

    pub async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<RequestOptions>,
    ) -> PaginatedResult<T> {
        self.dispatch::<(), _>(Method::GET, path, None, options).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> ApiResult<T> {
        self.dispatch(Method::POST, path, body, options).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> ApiResult<T> {
        self.dispatch(Method::PUT, path, body, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<RequestOptions>,
    ) -> ApiResult<T> {
        self.dispatch::<(), _>(Method::DELETE, path, None, options).await
    }

    async fn dispatch<B, E>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> Result<E, ErrorResponse>
    where
        B: Serialize + ?Sized,
        E: DeserializeOwned + EmptyEnvelope,
    {
        self.send(method, path, body, options).await.map_err(normalize)
    }

    async fn send<B, E>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> Result<E, ClientError>
    where
        B: Serialize + ?Sized,
        E: DeserializeOwned + EmptyEnvelope,
    {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);

        if let Some(token) = self.session.token() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(options) = options {
            for (name, value) in options.headers {
                request = request.header(name, value);
            }
            if let Some(timeout) = options.timeout {
                request = request.timeout(timeout);
            }
        }

        tracing::debug!(%method, %url, "Dispatching request");
        let started = Instant::now();

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "Request did not complete");
            ClientError::Network(e)
        })?;

        let status = response.status();
        tracing::debug!(
            %method,
            %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Response received"
        );

        if status == StatusCode::UNAUTHORIZED {
            self.evict(path);
        }

        // A reply arrived, so a broken body is never a network error.
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) if status.is_success() => {
                return Err(ClientError::Decode(format!("Failed to read response body: {e}")));
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "Failed to read error body");
                Default::default()
            }
        };

        if status.is_success() {
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(E::empty());
            }
            return serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()));
        }

        Err(ClientError::Http {
            status: status.as_u16(),
            body: serde_json::from_slice(&bytes).ok(),
            reason: format!("Request failed with status code {}", status.as_u16()),
        })
    }

    fn evict(&self, path: &str) {
        tracing::warn!(path, "Server rejected credentials, clearing session");
        self.session.clear(ClearReason::Unauthorized);
        self.on_unauthorized.on_unauthorized(path);
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Envelope to return for a 2xx reply with no body
trait EmptyEnvelope {
    fn empty() -> Self;
}

impl<T> EmptyEnvelope for ApiResponse<T> {
    fn empty() -> Self {
        ApiResponse::empty()
    }
}

impl<T> EmptyEnvelope for PaginatedResponse<T> {
    fn empty() -> Self {
        PaginatedResponse {
            success: true,
            message: String::new(),
            data: None,
            error: None,
            page: 1,
            limit: 0,
            total_pages: 0,
            total: 0,
            has_next: false,
            has_prev: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::error::{ErrorKind, NETWORK_ERROR_MESSAGE};
    use crate::client::test_support::{spawn, unused_addr};
    use axum::{
        http::{HeaderMap as AxumHeaders, StatusCode as AxumStatus},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::Mutex;

    fn client_for(base_url: &str) -> ApiClient {
        ApiClient::new(
            ClientConfig {
                base_url: base_url.to_string(),
                ..ClientConfig::default()
            },
            Session::in_memory(),
        )
        .unwrap()
    }

    async fn echo_auth(headers: AxumHeaders) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Json(json!({
            "success": true,
            "message": "ok",
            "data": {"authorization": auth, "content_type": content_type}
        }))
    }

    #[test]
    fn test_url_resolution() {
        let client = client_for("http://localhost:8080/");
        assert_eq!(client.url("/exercises"), "http://localhost:8080/api/v1/exercises");
        assert_eq!(client.url("exercises/3"), "http://localhost:8080/api/v1/exercises/3");
        assert_eq!(client.url("/login"), "http://localhost:8080/login");
        assert_eq!(client.url("/register"), "http://localhost:8080/register");
        assert_eq!(client.url("/me"), "http://localhost:8080/me");
        assert_eq!(client.url("/me/templates"), "http://localhost:8080/api/v1/me/templates");
        assert_eq!(
            client.url("/exercises?page=1&limit=10"),
            "http://localhost:8080/api/v1/exercises?page=1&limit=10"
        );
    }

    #[test]
    fn test_prefix_normalization() {
        assert_eq!(normalize_prefix("api/v1/"), "/api/v1");
        assert_eq!(normalize_prefix("/"), "");
    }

    #[tokio::test]
    async fn test_success_envelope_returned_untouched() {
        let app = Router::new().route(
            "/api/v1/exercises/1",
            get(|| async {
                Json(json!({"success": true, "message": "Exercise found", "data": {"id": 1, "name": "Squat"}}))
            }),
        );
        let base = spawn(app).await;

        let resp: ApiResponse<Value> = client_for(&base).get("/exercises/1", None).await.unwrap();
        assert!(resp.success);
        assert_eq!(resp.message, "Exercise found");
        assert_eq!(resp.data.unwrap(), json!({"id": 1, "name": "Squat"}));
    }

    #[tokio::test]
    async fn test_bearer_token_attached_when_present() {
        let app = Router::new().route("/api/v1/whoami", get(echo_auth));
        let base = spawn(app).await;
        let client = client_for(&base);

        let anonymous: ApiResponse<Value> = client.get("/whoami", None).await.unwrap();
        let data = anonymous.data.unwrap();
        assert_eq!(data["authorization"], Value::Null);
        assert_eq!(data["content_type"], "application/json");

        client.session().establish("abc").unwrap();
        let authed: ApiResponse<Value> = client.get("/whoami", None).await.unwrap();
        assert_eq!(authed.data.unwrap()["authorization"], "Bearer abc");
    }

    #[tokio::test]
    async fn test_unauthorized_evicts_token_and_notifies() {
        let app = Router::new().route(
            "/api/v1/me/workouts",
            get(|| async {
                (
                    AxumStatus::UNAUTHORIZED,
                    Json(json!({"success": false, "message": "Invalid token", "error": "unauthorized"})),
                )
            }),
        );
        let base = spawn(app).await;

        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let recorder = Arc::clone(&seen);
        let client = client_for(&base)
            .on_unauthorized(move |path: &str| recorder.lock().unwrap().push(path.to_string()));
        client.session().establish("stale").unwrap();

        let err = client.get::<Value>("/me/workouts", None).await.unwrap_err();
        assert_eq!(err.status, 401);
        assert_eq!(err.message, "Invalid token");
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(!client.session().is_authenticated());
        assert_eq!(*seen.lock().unwrap(), vec!["/me/workouts".to_string()]);
    }

    #[tokio::test]
    async fn test_unauthorized_without_body_uses_canned_message() {
        let app = Router::new().route("/api/v1/stats/aggregate", get(|| async { AxumStatus::UNAUTHORIZED }));
        let base = spawn(app).await;
        let client = client_for(&base);
        client.session().establish("stale").unwrap();

        let err = client.get::<Value>("/stats/aggregate", None).await.unwrap_err();
        assert_eq!(err.message, "You need to log in to access this resource");
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_http_error_with_structured_body() {
        let app = Router::new().route(
            "/api/v1/me/templates/9",
            get(|| async {
                (
                    AxumStatus::NOT_FOUND,
                    Json(json!({"success": false, "message": "Template not found", "error": "record not found"})),
                )
            }),
        );
        let base = spawn(app).await;

        let client = client_for(&base);
        client.session().establish("abc").unwrap();
        let err = client.get::<Value>("/me/templates/9", None).await.unwrap_err();
        assert_eq!(err.message, "Template not found");
        assert_eq!(err.error, "record not found");
        assert_eq!(err.status, 404);
        assert!(client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_server_error_without_body() {
        let app = Router::new().route("/api/v1/exercises", get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }));
        let base = spawn(app).await;

        let err = client_for(&base).get::<Value>("/exercises", None).await.unwrap_err();
        assert_eq!(err.message, "A server error occurred, please try again later");
        assert_eq!(err.status, 500);
        assert!(err.is_server_error());
    }

    #[tokio::test]
    async fn test_network_failure_yields_status_zero() {
        let base = unused_addr().await;
        let client = client_for(&base);
        client.session().establish("abc").unwrap();

        let err = client.get::<Value>("/exercises", None).await.unwrap_err();
        assert_eq!(err.status, 0);
        assert_eq!(err.message, NETWORK_ERROR_MESSAGE);
        assert!(err.is_network_error());
        assert!(client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_non_envelope_body_is_unexpected() {
        let app = Router::new().route("/api/v1/exercises", get(|| async { "<html>proxy</html>" }));
        let base = spawn(app).await;

        let err = client_for(&base).get::<Value>("/exercises", None).await.unwrap_err();
        assert_eq!(err.status, 0);
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    /// Serves one reply whose body stops short of its Content-Length.
    async fn truncated_reply(status_line: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    return;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let reply = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: 200\r\n\r\n{{\"success\": tr"
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_truncated_success_body_is_not_a_network_error() {
        let base = truncated_reply("HTTP/1.1 200 OK").await;

        let err = client_for(&base).get::<Value>("/exercises", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(!err.is_network_error());
        assert!(err.error.starts_with("Decode error: Failed to read response body"));
    }

    #[tokio::test]
    async fn test_truncated_error_body_keeps_status() {
        let base = truncated_reply("HTTP/1.1 404 Not Found").await;

        let err = client_for(&base).get::<Value>("/exercises/99", None).await.unwrap_err();
        assert_eq!(err.status, 404);
        assert_eq!(err.message, "The requested resource was not found");
    }

    #[tokio::test]
    async fn test_empty_success_body() {
        let app = Router::new().route(
            "/api/v1/exercises/4",
            axum::routing::delete(|| async { AxumStatus::NO_CONTENT }),
        );
        let base = spawn(app).await;

        let resp: ApiResponse<Value> = client_for(&base).delete("/exercises/4", None).await.unwrap();
        assert!(resp.success);
        assert_eq!(resp.data, None);
    }

    #[tokio::test]
    async fn test_request_options_add_headers() {
        let app = Router::new().route(
            "/api/v1/echo",
            get(|headers: AxumHeaders| async move {
                let trace = headers
                    .get("x-trace")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({"success": true, "message": "", "data": trace}))
            }),
        );
        let base = spawn(app).await;

        let options = RequestOptions::default()
            .header(HeaderName::from_static("x-trace"), HeaderValue::from_static("t-1"))
            .timeout(Duration::from_secs(5));
        let resp: ApiResponse<String> = client_for(&base).get("/echo", Some(options)).await.unwrap();
        assert_eq!(resp.data.as_deref(), Some("t-1"));
    }
}
