// src/models/staff.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::status::RecordStatus;

// Mapeia o CREATE TYPE staff_role
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "staff_role")]
pub enum StaffRole {
    Instructor,
    Admin,
    Support,
    #[default]
    #[sqlx(rename = "staff")]
    #[serde(rename = "staff")]
    Staff,
}

// ---
// Staff: sempre ligado a um principal (1-1) e, via FK única, a uma franquia.
// A FK vira NULL quando a franquia é apagada.
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: i64,
    pub user_id: i64,
    pub franchise_id: Option<i64>,
    pub name: String,
    pub phone: String,

    #[schema(value_type = f64, example = 25000.0)]
    pub salary: Decimal,

    pub role: StaffRole,
    pub status: RecordStatus,
    pub batch: Option<String>,

    // Snapshots (somente leitura pela API)
    #[schema(value_type = Vec<Object>)]
    pub attendance: Value,
    #[schema(value_type = Vec<Object>)]
    pub leaves: Value,

    pub created_at: DateTime<Utc>,
}

// Projeção de leitura: staff + nome da franquia + e-mail de login
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub staff: Staff,
    pub franchise_name: Option<String>,
    pub email: Option<String>,
}

pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("Value cannot be negative.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,

    #[validate(email(message = "Invalid email address."))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub password: String,

    #[validate(length(min = 5, max = 15, message = "Phone must have between 5 and 15 characters."))]
    pub phone: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64)]
    #[serde(default)]
    pub salary: Decimal,

    #[serde(default)]
    pub role: StaffRole,

    #[serde(default)]
    pub status: RecordStatus,

    pub batch: Option<String>,

    // Obrigatório para admin; ignorado para franchise_head
    pub franchise_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaffPayload {
    #[validate(length(min = 1, message = "Name cannot be empty."))]
    pub name: Option<String>,

    #[validate(length(min = 5, max = 15, message = "Phone must have between 5 and 15 characters."))]
    pub phone: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = Option<f64>)]
    pub salary: Option<Decimal>,

    pub role: Option<StaffRole>,
    pub status: Option<RecordStatus>,

    // String vazia remove a turma
    pub batch: Option<String>,

    pub franchise_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_staff_role_is_lowercase() {
        assert_eq!(serde_json::to_string(&StaffRole::Staff).unwrap(), "\"staff\"");
        assert_eq!(serde_json::to_string(&StaffRole::Instructor).unwrap(), "\"Instructor\"");
        let role: StaffRole = serde_json::from_str("\"Support\"").unwrap();
        assert_eq!(role, StaffRole::Support);
    }

    #[test]
    fn create_payload_defaults_and_validation() {
        let payload: CreateStaffPayload = serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "email": "asha@example.com",
            "password": "secret1",
            "phone": "9876543210",
            "salary": -1.0
        }))
        .unwrap();
        assert_eq!(payload.role, StaffRole::Staff);
        assert_eq!(payload.status, RecordStatus::Active);
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("salary"));
    }
}
