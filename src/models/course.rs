// src/models/course.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::status::RecordStatus;

// Curso do catálogo. Sem franquia = curso global, visível para todas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub franchise_id: Option<i64>,
    #[schema(example = "Abacus Level 1")]
    pub name: String,
    pub category: String,
    #[schema(example = "3 months")]
    pub duration: String,
    pub instructor: String,
    pub students: String,
    pub status: RecordStatus,
    pub start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoursePayload {
    #[validate(length(min = 1, message = "Course name is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required."))]
    pub category: String,
    #[validate(length(min = 1, message = "Duration is required."))]
    pub duration: String,
    #[validate(length(min = 1, message = "Instructor is required."))]
    pub instructor: String,
    #[serde(default)]
    pub students: String,
    #[serde(default)]
    pub status: RecordStatus,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    pub franchise_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoursePayload {
    #[validate(length(min = 1, message = "Course name cannot be empty."))]
    pub name: Option<String>,
    pub category: Option<String>,
    pub duration: Option<String>,
    pub instructor: Option<String>,
    pub students: Option<String>,
    pub status: Option<RecordStatus>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    pub franchise_id: Option<i64>,
}
