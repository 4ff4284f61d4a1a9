//! Resource Wrappers
//!
//! One typed handle per backend resource. Each call builds its path and
//! query string, hands it to [`ApiClient`] and returns the envelope as-is:
//! - Auth (login, registration, auth check, logout)
//! - Exercises (library, search, facets)
//! - Templates (and the exercises inside them)
//! - Workouts
//! - Statistics

mod auth;
mod exercises;
mod stats;
mod templates;
mod types;
mod workouts;

pub use auth::Auth;
pub use exercises::{ExerciseQuery, Exercises};
pub use stats::Stats;
pub use templates::Templates;
pub use types::*;
pub use workouts::{WorkoutQuery, Workouts};

use crate::client::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    pub fn exercises(&self) -> Exercises<'_> {
        Exercises::new(self)
    }

    pub fn templates(&self) -> Templates<'_> {
        Templates::new(self)
    }

    pub fn workouts(&self) -> Workouts<'_> {
        Workouts::new(self)
    }

    pub fn stats(&self) -> Stats<'_> {
        Stats::new(self)
    }
}

/// Append percent-encoded `key=value` pairs to `path`
pub(crate) fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

/// Percent-encode one path segment
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
