// src/models/attendance.rs

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// --- ENUMS ---

// Mapeia o CREATE TYPE person_type do banco
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema)]
#[sqlx(type_name = "person_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PersonType {
    #[default]
    Staff,
    Student,
}

impl FromStr for PersonType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staff" => Ok(PersonType::Staff),
            "student" => Ok(PersonType::Student),
            _ => Err(()),
        }
    }
}

// Mapeia o CREATE TYPE attendance_status do banco
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "attendance_status")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
    Excused,
}

impl FromStr for AttendanceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Present" => Ok(AttendanceStatus::Present),
            "Absent" => Ok(AttendanceStatus::Absent),
            "Late" => Ok(AttendanceStatus::Late),
            "Excused" => Ok(AttendanceStatus::Excused),
            _ => Err(()),
        }
    }
}

// --- REGISTRO (o dado persistido) ---

// Único por (franchise_id, person_type, person_id, date)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: i64,
    #[serde(rename = "franchise")]
    pub franchise_id: i64,
    #[serde(rename = "person_type")]
    pub person_type: PersonType,
    #[serde(rename = "person_id")]
    pub person_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(rename = "in_time")]
    pub in_time: Option<String>,
    #[serde(rename = "out_time")]
    pub out_time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Registro enriquecido com o nome de exibição (staff ou aluno)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: AttendanceRecord,

    // Nulo quando a pessoa não foi encontrada
    pub name: Option<String>,

    // Campo legado do frontend (= person_id)
    pub staff_id: i64,
}

// --- ENTRADA (o que o cliente manda) ---

// Tudo opcional e "cru": a validação campo a campo acontece no pré-passo
// do motor de upsert, para devolver erros por índice do lote.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AttendanceInput {
    pub franchise: Option<i64>,
    pub person_type: Option<String>,
    pub person_id: Option<i64>,
    #[schema(example = "2024-05-01")]
    pub date: Option<String>,
    #[schema(example = "Present")]
    pub status: Option<String>,
    #[schema(example = "09:30")]
    pub in_time: Option<String>,
    pub out_time: Option<String>,
}

// O POST aceita uma lista crua ou `{ "records": [...] }`
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AttendanceSubmission {
    Bare(Vec<AttendanceInput>),
    Wrapped { records: Vec<AttendanceInput> },
}

impl AttendanceSubmission {
    pub fn into_records(self) -> Vec<AttendanceInput> {
        match self {
            AttendanceSubmission::Bare(records) | AttendanceSubmission::Wrapped { records } => records,
        }
    }
}

// Entrada já validada, pronta para o upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceUpsert {
    pub franchise_id: i64,
    pub person_type: PersonType,
    pub person_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub in_time: Option<String>,
    pub out_time: Option<String>,
}

impl AttendanceUpsert {
    pub fn key(&self) -> (i64, PersonType, i64, NaiveDate) {
        (self.franchise_id, self.person_type, self.person_id, self.date)
    }
}

// --- CONSULTAS ---

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Ignorado para quem tem escopo de franquia
    pub franchise: Option<i64>,
    /// YYYY-MM-DD
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthlyAttendanceQuery {
    /// Ignorado para quem tem escopo de franquia
    pub franchise: Option<i64>,
    /// YYYY-MM
    pub month: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_accepts_bare_and_wrapped_lists() {
        let bare: AttendanceSubmission =
            serde_json::from_str(r#"[{"person_id": 42, "date": "2024-05-01"}]"#).unwrap();
        assert_eq!(bare.into_records().len(), 1);

        let wrapped: AttendanceSubmission = serde_json::from_str(
            r#"{"records": [{"person_id": 1, "date": "2024-05-01"}, {"person_id": 2, "date": "2024-05-01"}]}"#,
        )
        .unwrap();
        assert_eq!(wrapped.into_records().len(), 2);
    }

    #[test]
    fn status_parsing_is_closed() {
        assert_eq!("Late".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Late));
        assert!("late".parse::<AttendanceStatus>().is_err());
        assert!("Sick".parse::<AttendanceStatus>().is_err());
        assert_eq!("student".parse::<PersonType>(), Ok(PersonType::Student));
    }

    #[test]
    fn record_keeps_legacy_snake_case_fields() {
        let record = AttendanceRecord {
            id: 1,
            franchise_id: 7,
            person_type: PersonType::Staff,
            person_id: 42,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            status: AttendanceStatus::Present,
            in_time: Some("09:00".into()),
            out_time: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["franchise"], 7);
        assert_eq!(json["person_type"], "staff");
        assert_eq!(json["person_id"], 42);
        assert_eq!(json["in_time"], "09:00");
    }
}
