//! Error Normalization
//!
//! Every failure the client can hit (an HTTP error reply, a dropped
//! connection, a body that is not an envelope, a form that never left
//! the client) is funnelled into one [`ErrorResponse`] shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Normalized failure handed to callers
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: String,
    /// HTTP status, or 0 when no response reached the client
    pub status: u16,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error: impl Into<String>, status: u16) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: error.into(),
            status,
        }
    }

    /// Already normalized, so this is the identity.
    pub fn normalize(self) -> Self {
        self
    }

    /// Position in the failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self.status {
            0 if self.error == VALIDATION_ERROR => ErrorKind::Validation,
            0 if self.error.starts_with(NETWORK_ERROR_PREFIX) => ErrorKind::Network,
            0 => ErrorKind::Unexpected,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Authorization,
            404 => ErrorKind::NotFound,
            s if s >= 500 => ErrorKind::Server,
            _ => ErrorKind::Request,
        }
    }

    pub fn is_http_error(&self, status: u16) -> bool {
        self.status != 0 && self.status == status
    }

    pub fn is_not_found(&self) -> bool {
        self.is_http_error(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.is_http_error(401)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    pub fn is_network_error(&self) -> bool {
        self.kind() == ErrorKind::Network
    }
}

/// Failure taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Rejected by a form before submission
    Validation,
    /// 401
    Authentication,
    /// 403
    Authorization,
    /// 404
    NotFound,
    /// 5xx
    Server,
    /// Any other 4xx or unmapped status
    Request,
    /// No response reached the client
    Network,
    Unexpected,
}

pub const NETWORK_ERROR_MESSAGE: &str = "Network error - unable to reach the server";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";
const DEFAULT_BODY_MESSAGE: &str = "An error occurred";
const VALIDATION_ERROR: &str = "validation";
const NETWORK_ERROR_PREFIX: &str = "network: ";

/// Client-side form validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("At least one {0} is required")]
    Empty(&'static str),

    #[error("{field} must be {rule}")]
    Invalid { field: &'static str, rule: &'static str },
}

/// Everything that can go wrong while calling the backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Already translated by the dispatcher
    #[error("{0}")]
    Normalized(ErrorResponse),

    /// Server replied with a non-2xx status
    #[error("HTTP {status}: {reason}")]
    Http {
        status: u16,
        body: Option<Value>,
        reason: String,
    },

    /// The request never got a response
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx body that is not an envelope
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Unexpected(String),
}

impl From<ErrorResponse> for ClientError {
    fn from(err: ErrorResponse) -> Self {
        ClientError::Normalized(err)
    }
}

impl From<ClientError> for ErrorResponse {
    fn from(err: ClientError) -> Self {
        normalize(err)
    }
}

impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        normalize(ClientError::Validation(err))
    }
}

/// Translate a failure into an [`ErrorResponse`], first match wins:
/// an attached normalized error, a structured body, the status code,
/// a missing response, anything else.
pub fn normalize(err: ClientError) -> ErrorResponse {
    match err {
        ClientError::Normalized(resp) => resp,
        ClientError::Http {
            status,
            body: Some(Value::Object(body)),
            reason,
        } => {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_BODY_MESSAGE);
            let error = body
                .get("error")
                .and_then(Value::as_str)
                .filter(|e| !e.is_empty())
                .map(str::to_string)
                .unwrap_or(reason);
            ErrorResponse::new(message, error, status)
        }
        ClientError::Http { status, reason, .. } => {
            ErrorResponse::new(status_message(status, &reason), reason, status)
        }
        ClientError::Network(e) if e.status().is_none() => ErrorResponse::new(
            NETWORK_ERROR_MESSAGE,
            format!("{NETWORK_ERROR_PREFIX}{e}"),
            0,
        ),
        ClientError::Validation(e) => ErrorResponse::new(e.to_string(), VALIDATION_ERROR, 0),
        other => ErrorResponse::new(UNEXPECTED_ERROR_MESSAGE, other.to_string(), 0),
    }
}

/// Canned message for a status without a structured body
pub fn status_message(status: u16, reason: &str) -> String {
    match status {
        400 => "Bad request - please check your input".to_string(),
        401 => "You need to log in to access this resource".to_string(),
        403 => "You do not have permission to access this resource".to_string(),
        404 => "The requested resource was not found".to_string(),
        500 => "A server error occurred, please try again later".to_string(),
        _ => format!("Error: {status} - {reason}"),
    }
}
