// src/models/student.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{staff::validate_not_negative, status::RecordStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub franchise_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[schema(example = "B1")]
    pub batch: String,

    #[schema(value_type = f64)]
    pub fees_paid: Decimal,
    #[schema(value_type = f64)]
    pub fees_pending: Decimal,

    pub status: RecordStatus,

    #[schema(value_type = Vec<Object>)]
    pub attendance: Value,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub student: Student,
    pub franchise_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,

    #[validate(email(message = "Invalid email address."))]
    pub email: String,

    #[validate(length(min = 5, max = 15, message = "Phone must have between 5 and 15 characters."))]
    pub phone: String,

    #[validate(length(min = 1, message = "Batch is required."))]
    pub batch: String,

    // Obrigatório para admin; ignorado para franchise_head
    pub franchise_id: Option<i64>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64)]
    #[serde(default)]
    pub fees_paid: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64)]
    #[serde(default)]
    pub fees_pending: Decimal,

    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentPayload {
    #[validate(length(min = 1, message = "Name cannot be empty."))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email address."))]
    pub email: Option<String>,

    #[validate(length(min = 5, max = 15, message = "Phone must have between 5 and 15 characters."))]
    pub phone: Option<String>,

    #[validate(length(min = 1, message = "Batch cannot be empty."))]
    pub batch: Option<String>,

    pub franchise_id: Option<i64>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = Option<f64>)]
    pub fees_paid: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = Option<f64>)]
    pub fees_pending: Option<Decimal>,

    pub status: Option<RecordStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fees_use_legacy_camel_case_names() {
        let payload: CreateStudentPayload = serde_json::from_value(serde_json::json!({
            "name": "Ravi",
            "email": "ravi@example.com",
            "phone": "9876543210",
            "batch": "B1",
            "feesPaid": 1500.0,
            "feesPending": 500.0
        }))
        .unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.fees_paid, Decimal::new(1500, 0));
        assert_eq!(payload.franchise_id, None);
    }
}
