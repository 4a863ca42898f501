// src/models/status.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Mapeia o CREATE TYPE record_status (staff, alunos, cursos, turmas)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "record_status")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

// Mapeia o CREATE TYPE franchise_status (minúsculo, herdado do cadastro antigo)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "franchise_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FranchiseStatus {
    #[default]
    Active,
    Inactive,
}

// Mapeia o CREATE TYPE event_status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_keep_their_legacy_casing() {
        assert_eq!(serde_json::to_string(&RecordStatus::Active).unwrap(), "\"Active\"");
        assert_eq!(serde_json::to_string(&FranchiseStatus::Inactive).unwrap(), "\"inactive\"");
        assert_eq!(serde_json::to_string(&EventStatus::Upcoming).unwrap(), "\"upcoming\"");
    }
}
