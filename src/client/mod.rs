//! API Access Layer
//!
//! Everything between the rest of the application and the Trackle
//! backend goes through here.
//!
//! ## Architecture
//!
//! - **ApiClient**: dispatches requests, attaches the bearer token and
//!   evicts it on 401
//! - **Session**: explicit token holder with pluggable persistence
//! - **Envelopes**: `ApiResponse`, `PaginatedResponse`, `ErrorResponse`
//! - **Normalizer**: folds every failure into an `ErrorResponse`
//!
//! ## Request Flow
//!
//! 1. A resource wrapper builds the path and query string
//! 2. `ApiClient` prefixes it (unless it is a bootstrap path) and sends it
//! 3. A 2xx body is returned as the envelope; anything else is normalized
//! 4. A 401 clears the session and fires the `AuthFailureHandler`

mod dispatcher;
mod envelope;
mod error;
mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatcher::{
    ApiClient, ApiResult, AuthFailureHandler, ClientConfig, PaginatedResult, RequestOptions,
    UNPREFIXED_PATHS,
};
pub use envelope::{
    ApiResponse, PageRequest, PaginatedResponse, Pagination, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
pub use error::{
    normalize, status_message, ClientError, ErrorKind, ErrorResponse, ValidationError,
    NETWORK_ERROR_MESSAGE, UNEXPECTED_ERROR_MESSAGE,
};
pub use session::{
    ClearReason, FileStore, MemoryStore, Session, SessionError, SessionEvent, SessionState,
    SessionStore, StoredSession,
};
