//! Templates
//!
//! Workout templates owned by the current user, and the exercise slots
//! inside them.

use serde::Serialize;
use serde_json::Value;

use crate::client::{ApiClient, ApiResult, PageRequest, PaginatedResult};

use super::types::{CreateTemplateRequest, Template, TemplateExercise, UpdateTemplateRequest};
use super::with_query;

#[derive(Serialize)]
struct AddExerciseBody {
    exercise_id: u64,
    sets: u32,
}

#[derive(Serialize)]
struct SetsBody {
    sets: u32,
}

pub struct Templates<'a> {
    client: &'a ApiClient,
}

impl<'a> Templates<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, page: PageRequest, search: Option<&str>) -> PaginatedResult<Vec<Template>> {
        let mut pairs = page.query_pairs();
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        self.client
            .get_paginated(&with_query("/me/templates", &pairs), None)
            .await
    }

    pub async fn get(&self, id: u64) -> ApiResult<Template> {
        self.client.get(&format!("/me/templates/{id}"), None).await
    }

    pub async fn create(&self, template: &CreateTemplateRequest) -> ApiResult<Template> {
        self.client.post("/me/templates", Some(template), None).await
    }

    pub async fn update(&self, id: u64, update: &UpdateTemplateRequest) -> ApiResult<Template> {
        self.client
            .put(&format!("/me/templates/{id}"), Some(update), None)
            .await
    }

    pub async fn delete(&self, id: u64) -> ApiResult<Value> {
        self.client.delete(&format!("/me/templates/{id}"), None).await
    }

    pub async fn exercises(&self, template_id: u64) -> ApiResult<Vec<TemplateExercise>> {
        self.client
            .get(&format!("/templates/{template_id}/exercises"), None)
            .await
    }

    pub async fn add_exercise(
        &self,
        template_id: u64,
        exercise_id: u64,
        sets: u32,
    ) -> ApiResult<TemplateExercise> {
        let body = AddExerciseBody { exercise_id, sets };
        self.client
            .post(&format!("/templates/{template_id}/exercises"), Some(&body), None)
            .await
    }

    pub async fn update_exercise(&self, template_exercise_id: u64, sets: u32) -> ApiResult<TemplateExercise> {
        self.client
            .put(
                &format!("/template-exercises/{template_exercise_id}"),
                Some(&SetsBody { sets }),
                None,
            )
            .await
    }

    pub async fn remove_exercise(&self, template_exercise_id: u64) -> ApiResult<Value> {
        self.client
            .delete(&format!("/template-exercises/{template_exercise_id}"), None)
            .await
    }
}
