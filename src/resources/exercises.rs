//! Exercises
//!
//! The shared exercise library. Listing is paginated and filterable by
//! name, category and muscle.

use serde_json::Value;

use crate::client::{ApiClient, ApiResult, PageRequest, PaginatedResult};

use super::types::{Exercise, ExerciseUpdate, NewExercise};
use super::{segment, with_query};

/// Filters for [`Exercises::list`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseQuery {
    pub page: PageRequest,
    pub search: Option<String>,
    pub category: Option<String>,
    pub muscle: Option<String>,
}

impl ExerciseQuery {
    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn muscle(mut self, muscle: impl Into<String>) -> Self {
        self.muscle = Some(muscle.into());
        self
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.page.query_pairs();
        let filters = [
            ("search", &self.search),
            ("category", &self.category),
            ("muscle", &self.muscle),
        ];
        for (key, value) in filters {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_string()));
            }
        }
        pairs
    }
}

pub struct Exercises<'a> {
    client: &'a ApiClient,
}

impl<'a> Exercises<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ExerciseQuery) -> PaginatedResult<Vec<Exercise>> {
        let path = with_query("/exercises", &query.query_pairs());
        self.client.get_paginated(&path, None).await
    }

    pub async fn get(&self, id: u64) -> ApiResult<Exercise> {
        self.client.get(&format!("/exercises/{id}"), None).await
    }

    pub async fn create(&self, exercise: &NewExercise) -> ApiResult<Exercise> {
        self.client.post("/exercises", Some(exercise), None).await
    }

    pub async fn update(&self, id: u64, update: &ExerciseUpdate) -> ApiResult<Exercise> {
        self.client
            .put(&format!("/exercises/{id}"), Some(update), None)
            .await
    }

    pub async fn delete(&self, id: u64) -> ApiResult<Value> {
        self.client.delete(&format!("/exercises/{id}"), None).await
    }

    /// Name or category search
    pub async fn search(&self, q: &str) -> ApiResult<Vec<Exercise>> {
        let path = with_query("/exercises/search", &[("q", q.to_string())]);
        self.client.get(&path, None).await
    }

    pub async fn by_category(&self, category: &str) -> ApiResult<Vec<Exercise>> {
        let path = format!("/exercises/category/{}", segment(category));
        self.client.get(&path, None).await
    }

    /// Picks based on the user's workout history
    pub async fn suggested(&self) -> ApiResult<Vec<Exercise>> {
        self.client.get("/exercises/suggested", None).await
    }

    pub async fn categories(&self) -> ApiResult<Vec<String>> {
        self.client.get("/exercises/categories", None).await
    }

    pub async fn muscles(&self) -> ApiResult<Vec<String>> {
        self.client.get("/exercises/muscles", None).await
    }

    pub async fn equipment(&self) -> ApiResult<Vec<String>> {
        self.client.get("/exercises/equipment", None).await
    }
}
