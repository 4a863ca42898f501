// src/models/batch.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::status::RecordStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: i64,
    pub franchise_id: Option<i64>,
    #[schema(example = "B1")]
    pub name: String,
    pub students: i32,
    #[serde(rename = "start")]
    pub start_date: NaiveDate,
    #[serde(rename = "end")]
    pub end_date: NaiveDate,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_batch_dates"))]
pub struct CreateBatchPayload {
    #[validate(length(min = 1, message = "Batch name is required."))]
    pub name: String,
    #[validate(range(min = 0, message = "Students cannot be negative."))]
    #[serde(default)]
    pub students: i32,
    #[schema(value_type = String, format = Date)]
    pub start: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end: NaiveDate,
    #[serde(default)]
    pub status: RecordStatus,
    pub franchise_id: Option<i64>,
}

fn validate_batch_dates(payload: &CreateBatchPayload) -> Result<(), ValidationError> {
    if payload.end < payload.start {
        let mut err = ValidationError::new("date_range");
        err.message = Some("Batch end date cannot be before its start date.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBatchPayload {
    #[validate(length(min = 1, message = "Batch name cannot be empty."))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "Students cannot be negative."))]
    pub students: Option<i32>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end: Option<NaiveDate>,
    pub status: Option<RecordStatus>,
    pub franchise_id: Option<i64>,
}
