//! Resource DTOs
//!
//! Records owned by the backend, plus the request bodies the client sends.
//! The backend serializes its base model fields as `ID`/`CreatedAt`/
//! `UpdatedAt` on some routes, so those spellings are accepted too.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::client::ValidationError;

// ============================================
// Users & auth
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "ID")]
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "UpdatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponseData {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let username_ok = (3..=30).contains(&self.username.chars().count())
            && self
                .username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !username_ok {
            return Err(ValidationError::Invalid {
                field: "Username",
                rule: "3-30 characters, alphanumeric and underscore only",
            });
        }

        let email = self.email.trim();
        let email_ok = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !email_ok {
            return Err(ValidationError::Invalid {
                field: "Email",
                rule: "a valid email address",
            });
        }

        if self.password.chars().count() < 8 {
            return Err(ValidationError::Invalid {
                field: "Password",
                rule: "at least 8 characters long",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisterResponseData {
    pub user: User,
}

/// Reply of the auth check endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthCheck {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<User>,
}

// ============================================
// Exercises
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// 0 when the backend echoes a create request without the stored id
    #[serde(default, alias = "ID")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub primary_muscle: String,
    #[serde(default)]
    pub equipment: String,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "UpdatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewExercise {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub primary_muscle: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub equipment: String,
}

impl NewExercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("Name"));
        }
        Ok(())
    }
}

/// Partial update; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExerciseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_muscle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
}

// ============================================
// Templates
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateExercise {
    /// Slot id; the template detail route omits it
    #[serde(default, alias = "ID")]
    pub id: u64,
    #[serde(default)]
    pub template_id: u64,
    pub exercise_id: u64,
    pub sets: u32,
    /// Flattened exercise fields of the template detail route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub exercise: Option<Exercise>,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "UpdatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(alias = "ID")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub exercises: Vec<TemplateExercise>,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "UpdatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateExerciseSpec {
    pub exercise_id: u64,
    pub sets: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub description: String,
    pub exercises: Vec<TemplateExerciseSpec>,
}

impl CreateTemplateRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("Template name"));
        }
        if self.exercises.is_empty() {
            return Err(ValidationError::Empty("exercise"));
        }
        if self.exercises.iter().any(|e| e.sets == 0) {
            return Err(ValidationError::Invalid {
                field: "Sets",
                rule: "greater than 0",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateTemplateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Vec<TemplateExerciseSpec>>,
}

// ============================================
// Workouts
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    #[serde(default, alias = "ID")]
    pub id: u64,
    #[serde(default)]
    pub workout_id: u64,
    pub exercise_id: u64,
    /// Present on the detail route
    #[serde(default)]
    pub exercise_name: Option<String>,
    pub set_number: u32,
    pub reps: u32,
    pub weight: f64,
    #[serde(default)]
    pub exercise: Option<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(alias = "ID")]
    pub id: u64,
    #[serde(default)]
    pub user_id: u64,
    pub template_id: u64,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(alias = "workout_name")]
    pub name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub entries: Vec<WorkoutEntry>,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "UpdatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Row of the workout list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    #[serde(alias = "id")]
    pub workout_id: u64,
    #[serde(alias = "name")]
    pub workout_name: String,
    pub template_id: u64,
    #[serde(default)]
    pub template_name: String,
    #[serde(default)]
    pub logged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntrySpec {
    pub exercise_id: u64,
    pub set_number: u32,
    pub reps: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateWorkoutRequest {
    pub template_id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub entries: Vec<WorkoutEntrySpec>,
}

impl CreateWorkoutRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("Workout name"));
        }
        if self.template_id == 0 {
            return Err(ValidationError::Required("Template"));
        }
        if self.entries.is_empty() {
            return Err(ValidationError::Empty("entry"));
        }
        for entry in &self.entries {
            if entry.set_number < 1 {
                return Err(ValidationError::Invalid { field: "Set number", rule: "at least 1" });
            }
            if entry.reps < 1 {
                return Err(ValidationError::Invalid { field: "Reps", rule: "at least 1" });
            }
            if entry.weight.is_nan() || entry.weight < 0.0 {
                return Err(ValidationError::Invalid { field: "Weight", rule: "0 or more" });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateWorkoutRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<WorkoutEntrySpec>>,
}

// ============================================
// Statistics
// ============================================

/// Window for statistics queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    Year,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Year => "year",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "year" => Ok(TimeRange::Year),
            other => Err(format!("Invalid time range: {other}. Use: week, month, year")),
        }
    }
}

/// Workout counts per label (day or month)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutStats {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
}

/// Best weight per day for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProgress {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub weights: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total_workouts: u64,
    pub total_exercises: u64,
    #[serde(default)]
    pub avg_duration: f64,
    #[serde(default)]
    pub exercises: Vec<ExerciseRef>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("lifter_01", "a@b.co", "password1").validate().is_ok());
        assert!(register("ab", "a@b.co", "password1").validate().is_err());
        assert!(register("bad name", "a@b.co", "password1").validate().is_err());
        assert!(register("lifter", "not-an-email", "password1").validate().is_err());
        assert_eq!(
            register("lifter", "a@b.co", "short").validate().unwrap_err().to_string(),
            "Password must be at least 8 characters long"
        );
    }

    #[test]
    fn test_exercise_requires_name() {
        assert_eq!(
            NewExercise::new("  ").validate().unwrap_err(),
            ValidationError::Required("Name")
        );
        assert!(NewExercise::new("Squat").validate().is_ok());
    }

    #[test]
    fn test_template_requires_an_exercise() {
        let mut req = CreateTemplateRequest {
            name: "Push day".into(),
            ..Default::default()
        };
        assert_eq!(
            req.validate().unwrap_err().to_string(),
            "At least one exercise is required"
        );

        req.exercises.push(TemplateExerciseSpec { exercise_id: 1, sets: 0 });
        assert!(req.validate().is_err());

        req.exercises[0].sets = 3;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_workout_validation() {
        let mut req = CreateWorkoutRequest {
            template_id: 2,
            name: "Monday".into(),
            notes: None,
            entries: vec![WorkoutEntrySpec { exercise_id: 1, set_number: 1, reps: 5, weight: 100.0 }],
        };
        assert!(req.validate().is_ok());

        req.entries[0].weight = -1.0;
        assert!(req.validate().is_err());

        req.entries[0].weight = 0.0;
        req.entries[0].reps = 0;
        assert!(req.validate().is_err());

        req.entries.clear();
        assert_eq!(req.validate().unwrap_err(), ValidationError::Empty("entry"));
    }

    #[test]
    fn test_accepts_go_model_keys() {
        let exercise: Exercise = serde_json::from_value(json!({
            "ID": 3,
            "CreatedAt": "2025-01-02T10:00:00Z",
            "UpdatedAt": "2025-01-02T10:00:00Z",
            "DeletedAt": null,
            "name": "Bench Press",
            "category": "Strength",
            "primary_muscle": "Chest"
        }))
        .unwrap();
        assert_eq!(exercise.id, 3);
        assert_eq!(exercise.primary_muscle, "Chest");
        assert!(exercise.created_at.is_some());
        assert_eq!(exercise.equipment, "");
    }

    #[test]
    fn test_template_detail_slots_without_ids() {
        let template: Template = serde_json::from_value(json!({
            "ID": 4,
            "CreatedAt": "2025-03-01T09:30:00.123456+01:00",
            "UpdatedAt": "2025-03-01T09:30:00.123456+01:00",
            "DeletedAt": null,
            "name": "Push day",
            "description": "",
            "user_id": 2,
            "exercises": [
                {"exercise_id": 1, "sets": 3, "name": "Bench Press", "description": "Flat bench", "category": "Strength"}
            ]
        }))
        .unwrap();
        let slot = &template.exercises[0];
        assert_eq!(slot.id, 0);
        assert_eq!(slot.exercise_id, 1);
        assert_eq!(slot.name.as_deref(), Some("Bench Press"));
        assert_eq!(slot.category.as_deref(), Some("Strength"));
        assert!(slot.exercise.is_none());
    }

    #[test]
    fn test_workout_detail_shape() {
        let workout: Workout = serde_json::from_value(json!({
            "ID": 8,
            "template_id": 2,
            "template_name": "Push day",
            "workout_name": "Monday push",
            "notes": "felt strong",
            "entries": [
                {"exercise_id": 1, "exercise_name": "Bench Press", "set_number": 1, "reps": 5, "weight": 80.5}
            ]
        }))
        .unwrap();
        assert_eq!(workout.name, "Monday push");
        assert_eq!(workout.entries[0].exercise_name.as_deref(), Some("Bench Press"));
    }

    #[test]
    fn test_time_range_parsing() {
        assert_eq!("Week".parse::<TimeRange>().unwrap(), TimeRange::Week);
        assert_eq!(TimeRange::default().to_string(), "month");
        assert!("decade".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_aggregate_stats_keys() {
        let stats: AggregateStats = serde_json::from_value(json!({
            "totalWorkouts": 12,
            "totalExercises": 40,
            "avgDuration": 52.5,
            "exercises": [{"id": "1", "name": "Squat"}]
        }))
        .unwrap();
        assert_eq!(stats.total_workouts, 12);
        assert_eq!(stats.exercises[0].name, "Squat");
    }
}
