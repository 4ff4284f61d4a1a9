//! Auth
//!
//! Login, registration and the auth check live outside the API prefix.
//! A successful login moves the session to AUTHENTICATED.

use crate::client::{ApiClient, ApiResponse, ApiResult, ClearReason};

use super::types::{AuthCheck, LoginRequest, LoginResponseData, RegisterRequest, RegisterResponseData};

pub struct Auth<'a> {
    client: &'a ApiClient,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and store it in the session
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponseData> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self
            .client
            .post::<LoginResponseData, _>("/login", Some(&body), None)
            .await?;

        match resp.data.as_ref() {
            Some(data) if resp.success && !data.token.is_empty() => {
                if let Err(e) = self.client.session().establish(data.token.as_str()) {
                    tracing::warn!(error = %e, "Logged in, but the session could not be persisted");
                }
                tracing::info!("Logged in");
            }
            _ => tracing::debug!(reply = %resp.message, "Login reply carried no token"),
        }

        Ok(resp)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisterResponseData> {
        self.client.post("/register", Some(request), None).await
    }

    /// Register, then log straight in with the same credentials
    pub async fn register_and_login(&self, request: &RegisterRequest) -> ApiResult<LoginResponseData> {
        let registered = self.register(request).await?;
        if !registered.success {
            return Ok(ApiResponse {
                success: false,
                message: registered.message,
                data: None,
                error: registered.error,
                status: registered.status,
            });
        }

        let resp = self.login(&request.email, &request.password).await?;
        if self.client.session().is_authenticated() {
            if let Err(e) = self.client.session().set_username(request.username.as_str()) {
                tracing::warn!(error = %e, "Could not persist username");
            }
        }
        Ok(resp)
    }

    /// Ask the server whether the stored token is still good
    pub async fn check(&self) -> ApiResult<AuthCheck> {
        self.client.get("/me", None).await
    }

    /// AUTHENTICATED -> ANONYMOUS, locally
    pub fn logout(&self) {
        self.client.session().clear(ClearReason::Logout);
        tracing::info!("Logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::spawn;
    use crate::client::{ClientConfig, Session};
    use axum::{http::StatusCode, routing::{get, post}, Json, Router};
    use serde_json::{json, Value};

    fn client_for(base_url: String) -> ApiClient {
        ApiClient::new(
            ClientConfig { base_url, ..ClientConfig::default() },
            Session::in_memory(),
        )
        .unwrap()
    }

    fn auth_backend() -> Router {
        Router::new()
            .route(
                "/login",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "correct-horse" {
                        (
                            StatusCode::OK,
                            Json(json!({"success": true, "message": "Login successful", "data": {"token": "abc"}})),
                        )
                    } else {
                        (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({"success": false, "message": "Invalid credentials"})),
                        )
                    }
                }),
            )
            .route(
                "/register",
                post(|Json(body): Json<Value>| async move {
                    (
                        StatusCode::CREATED,
                        Json(json!({
                            "success": true,
                            "message": "User created successfully",
                            "data": {"user": {"ID": 1, "username": body["username"], "email": body["email"], "role": "user"}}
                        })),
                    )
                }),
            )
            .route(
                "/me",
                get(|| async { Json(json!({"success": true, "message": "", "data": {"authenticated": true}})) }),
            )
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let client = client_for(spawn(auth_backend()).await);

        let resp = client.auth().login("me@example.com", "correct-horse").await.unwrap();
        assert!(resp.success);
        assert_eq!(resp.error, None);
        assert_eq!(resp.data.unwrap().token, "abc");
        assert_eq!(client.session().token().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_failed_login_stays_anonymous() {
        let client = client_for(spawn(auth_backend()).await);

        let err = client.auth().login("me@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.status, 401);
        assert_eq!(err.message, "Invalid credentials");
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let client = client_for(spawn(auth_backend()).await);
        let request = RegisterRequest {
            username: "lifter".into(),
            email: "me@example.com".into(),
            password: "correct-horse".into(),
        };

        let registered = client.auth().register(&request).await.unwrap();
        assert_eq!(registered.data.unwrap().user.username, "lifter");

        client.auth().register_and_login(&request).await.unwrap();
        assert_eq!(client.session().token().as_deref(), Some("abc"));
        assert_eq!(client.session().username().as_deref(), Some("lifter"));
    }

    #[tokio::test]
    async fn test_check_and_logout() {
        let client = client_for(spawn(auth_backend()).await);
        client.session().establish("abc").unwrap();

        let check = client.auth().check().await.unwrap();
        assert!(check.data.unwrap().authenticated);

        client.auth().logout();
        assert!(!client.session().is_authenticated());
    }
}
