//! Workouts
//!
//! Logged workouts for the current user.

use serde_json::Value;

use crate::client::{ApiClient, ApiResult, PageRequest, PaginatedResult};

use super::types::{CreateWorkoutRequest, UpdateWorkoutRequest, Workout, WorkoutSummary};
use super::with_query;

/// Filters for [`Workouts::list`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkoutQuery {
    pub page: PageRequest,
    pub template_id: Option<u64>,
}

impl WorkoutQuery {
    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    pub fn template(mut self, template_id: u64) -> Self {
        self.template_id = Some(template_id);
        self
    }
}

pub struct Workouts<'a> {
    client: &'a ApiClient,
}

impl<'a> Workouts<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &WorkoutQuery) -> PaginatedResult<Vec<WorkoutSummary>> {
        let mut pairs = query.page.query_pairs();
        if let Some(template_id) = query.template_id {
            pairs.push(("template_id", template_id.to_string()));
        }
        self.client
            .get_paginated(&with_query("/me/workouts", &pairs), None)
            .await
    }

    pub async fn get(&self, id: u64) -> ApiResult<Workout> {
        self.client.get(&format!("/me/workouts/{id}"), None).await
    }

    /// The backend answers with an empty `data` on success.
    pub async fn create(&self, workout: &CreateWorkoutRequest) -> ApiResult<Workout> {
        self.client.post("/me/workouts", Some(workout), None).await
    }

    pub async fn update(&self, id: u64, update: &UpdateWorkoutRequest) -> ApiResult<Workout> {
        self.client
            .put(&format!("/me/workouts/{id}"), Some(update), None)
            .await
    }

    pub async fn delete(&self, id: u64) -> ApiResult<Value> {
        self.client.delete(&format!("/me/workouts/{id}"), None).await
    }
}
