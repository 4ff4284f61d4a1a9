//! Statistics
//!
//! Read-only aggregates computed by the backend.

use crate::client::{ApiClient, ApiResult};

use super::types::{AggregateStats, ExerciseProgress, TimeRange, WorkoutStats};
use super::with_query;

pub struct Stats<'a> {
    client: &'a ApiClient,
}

impl<'a> Stats<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Workout counts over `range`
    pub async fn workouts(&self, range: TimeRange) -> ApiResult<WorkoutStats> {
        let path = with_query("/stats/workouts", &[("timeRange", range.to_string())]);
        self.client.get(&path, None).await
    }

    /// Best weight per day for one exercise over `range`
    pub async fn exercise(&self, exercise_id: u64, range: TimeRange) -> ApiResult<ExerciseProgress> {
        let path = with_query(
            &format!("/stats/exercises/{exercise_id}"),
            &[("timeRange", range.to_string())],
        );
        self.client.get(&path, None).await
    }

    pub async fn aggregate(&self) -> ApiResult<AggregateStats> {
        self.client.get("/stats/aggregate", None).await
    }
}
