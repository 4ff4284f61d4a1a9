//! # Trackle
//!
//! Typed client for the Trackle fitness-tracking REST backend: exercise
//! library, workout templates, workout log and statistics.
//!
//! ## Features
//!
//! - **Uniform envelopes**: every call yields `ApiResponse` / `PaginatedResponse`
//! - **One error shape**: HTTP, network and decoding failures all become `ErrorResponse`
//! - **Explicit session**: bearer token held in a `Session`, evicted on 401
//! - **Typed resources**: exercises, templates, workouts, stats, auth
//!
//! ## Modules
//!
//! - [`client`]: request dispatcher, envelopes, error normalization, session
//! - [`resources`]: per-resource wrappers and DTOs
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trackle::client::{ApiClient, ClientConfig, Session};
//! use trackle::resources::ExerciseQuery;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientConfig::default(), Session::in_memory())?
//!         .on_unauthorized(|path: &str| eprintln!("{path}: please log in again"));
//!
//!     client.auth().login("me@example.com", "correct-horse").await?;
//!
//!     let page = client
//!         .exercises()
//!         .list(&ExerciseQuery::default().category("Strength"))
//!         .await?;
//!     println!("{} exercises", page.total);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod resources;

// Re-export top-level types for convenience
pub use client::{
    ApiClient, ApiResponse, ApiResult, AuthFailureHandler, ClientConfig, ClientError, ErrorKind,
    ErrorResponse, PageRequest, PaginatedResponse, PaginatedResult, Pagination, Session,
    SessionEvent, SessionState,
};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};

pub use resources::{
    Exercise, ExerciseQuery, Template, TemplateExercise, TimeRange, User, Workout, WorkoutEntry,
    WorkoutQuery,
};
