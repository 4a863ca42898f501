// src/models/franchise.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{auth::AccountCredentials, status::FranchiseStatus};

// ---
// 1. Franchise (a unidade "tenant")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Franchise {
    pub id: i64,

    // Principal franchise_head dono desta franquia (zero ou um)
    pub user_id: Option<i64>,

    #[schema(example = "Wagholi Pune")]
    pub name: String,
    #[schema(example = "Pune")]
    pub location: String,
    pub start_date: NaiveDate,
    pub status: FranchiseStatus,
    pub created_at: DateTime<Utc>,
}

// ---
// 2. FranchiseOption (o "dropdown" do frontend)
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct FranchiseOption {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFranchisePayload {
    #[validate(length(min = 1, message = "Franchise name is required."))]
    pub name: String,

    #[validate(length(min = 1, message = "Location is required."))]
    pub location: String,

    #[schema(value_type = String, format = Date, example = "2024-05-01")]
    pub start_date: NaiveDate,

    #[serde(default)]
    pub status: FranchiseStatus,

    // Se vier, cria a conta franchise_head na mesma transação
    #[validate(nested)]
    pub head: Option<AccountCredentials>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFranchisePayload {
    #[validate(length(min = 1, message = "Franchise name cannot be empty."))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Location cannot be empty."))]
    pub location: Option<String>,

    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,

    pub status: Option<FranchiseStatus>,
}
