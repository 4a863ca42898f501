// src/models/event.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::status::EventStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub franchise_id: Option<i64>,
    #[schema(example = "Regional Abacus Workshop")]
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPayload {
    #[validate(length(min = 1, message = "Event name is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "Location is required."))]
    pub location: String,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: EventStatus,
    pub franchise_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventPayload {
    #[validate(length(min = 1, message = "Event name cannot be empty."))]
    pub name: Option<String>,
    pub location: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub status: Option<EventStatus>,
    pub franchise_id: Option<i64>,
}
