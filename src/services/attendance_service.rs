// src/services/attendance_service.rs

use std::collections::{hash_map::Entry, BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{AttendanceRepository, FranchiseRepository},
    models::{
        attendance::{
            AttendanceInput, AttendanceQuery, AttendanceStatus, AttendanceUpsert, AttendanceView,
            MonthlyAttendanceQuery, PersonType,
        },
        scope::Scope,
    },
};

const REQUIRED: &str = "This field is required.";

#[derive(Clone)]
pub struct AttendanceService {
    pool: PgPool,
    repo: AttendanceRepository,
    franchise_repo: FranchiseRepository,
}

impl AttendanceService {
    pub fn new(pool: PgPool, repo: AttendanceRepository, franchise_repo: FranchiseRepository) -> Self {
        Self { pool, repo, franchise_repo }
    }

    /// Valida o lote inteiro antes de qualquer escrita e grava cada chave com
    /// um UPSERT atômico. Uma falha do banco desfaz o lote todo.
    ///
    /// As linhas são travadas em ordem de chave, então dois lotes concorrentes
    /// sobre as mesmas pessoas esperam um pelo outro em vez de travarem.
    pub async fn upsert_attendance(
        &self,
        scope: &Scope,
        inputs: Vec<AttendanceInput>,
    ) -> Result<Vec<AttendanceView>, AppError> {
        let batch = prepare_batch(inputs, scope)?;
        if batch.is_empty() {
            return Ok(vec![]);
        }

        let mut tx = self.pool.begin().await?;

        let franchises: BTreeSet<i64> = batch.iter().map(|r| r.franchise_id).collect();
        for franchise_id in franchises {
            if !self.franchise_repo.exists(&mut *tx, franchise_id).await? {
                return Err(AppError::NotFound("Franchise"));
            }
        }

        // ids voltam na ordem do lote recebido
        let mut ids = vec![0; batch.len()];
        for i in write_order(&batch) {
            ids[i] = self.repo.upsert(&mut *tx, &batch[i]).await?;
        }
        let records = self.repo.find_views_by_ids(&mut *tx, &ids).await?;

        tx.commit().await?;

        tracing::info!("📝 {} registros de presença gravados.", records.len());
        Ok(records)
    }

    /// Leituras nunca falham por parâmetro ausente: degradam para lista vazia.
    pub async fn list_attendance(&self, scope: &Scope, query: &AttendanceQuery) -> Result<Vec<AttendanceView>, AppError> {
        let Some(franchise_id) = read_franchise(scope, query.franchise) else {
            return Ok(vec![]);
        };
        let Some(date) = query.date.as_deref().and_then(parse_date) else {
            return Ok(vec![]);
        };
        self.repo.list_by_date(&self.pool, franchise_id, date).await
    }

    pub async fn monthly_attendance(
        &self,
        scope: &Scope,
        query: &MonthlyAttendanceQuery,
    ) -> Result<Vec<AttendanceView>, AppError> {
        let Some(franchise_id) = read_franchise(scope, query.franchise) else {
            return Ok(vec![]);
        };
        let Some((from, to)) = query.month.as_deref().and_then(month_range) else {
            return Ok(vec![]);
        };
        self.repo.list_between(&self.pool, franchise_id, from, to).await
    }
}

// Escopo de franquia manda; admin precisa pedir uma franquia explicitamente
fn read_franchise(scope: &Scope, requested: Option<i64>) -> Option<i64> {
    match scope {
        Scope::Unrestricted => requested,
        Scope::Empty => None,
        scoped => scoped.franchise_id(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// `"2024-05"` -> `[2024-05-01, 2024-06-01)`
pub fn month_range(raw: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (year, month) = raw.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;

    let from = NaiveDate::from_ymd_opt(year, month, 1)?;
    let to = if from.month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((from, to))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Pré-passo puro do motor de upsert.
///
/// 1. Escopo de uma franquia sobrescreve o `franchise` de cada entrada;
///    admin precisa informá-lo em todas.
/// 2. `person_id` e `date` obrigatórios; `person_type` padrão "staff";
///    `status` padrão "Present" e restrito aos quatro valores.
/// 3. Qualquer erro reprova o lote inteiro (chaves `records[i].campo`).
/// 4. Chaves repetidas no mesmo lote: vale a última, na posição da primeira.
pub fn prepare_batch(inputs: Vec<AttendanceInput>, scope: &Scope) -> Result<Vec<AttendanceUpsert>, AppError> {
    if scope.is_empty() {
        return Err(AppError::permission_denied(
            "Your account is not linked to any franchise.",
        ));
    }

    let mut errors = BTreeMap::new();
    let mut prepared = Vec::with_capacity(inputs.len());

    for (i, input) in inputs.into_iter().enumerate() {
        let mut field_error = |field: &str, message: &str| {
            errors.insert(format!("records[{}].{}", i, field), message.to_string());
        };

        let franchise_id = match scope {
            Scope::Unrestricted => input.franchise,
            scoped => scoped.franchise_id(),
        };
        if franchise_id.is_none() {
            field_error("franchise", REQUIRED);
        }

        let person_type = match non_blank(input.person_type) {
            None => Some(PersonType::default()),
            Some(raw) => raw.parse::<PersonType>().ok(),
        };
        if person_type.is_none() {
            field_error("person_type", "Must be 'staff' or 'student'.");
        }

        match input.person_id {
            None => field_error("person_id", REQUIRED),
            Some(id) if id <= 0 => field_error("person_id", "Must be a positive id."),
            Some(_) => {}
        }

        let date = match non_blank(input.date) {
            None => {
                field_error("date", REQUIRED);
                None
            }
            Some(raw) => {
                let parsed = parse_date(&raw);
                if parsed.is_none() {
                    field_error("date", "Invalid date, expected YYYY-MM-DD.");
                }
                parsed
            }
        };

        let status = match non_blank(input.status) {
            None => Some(AttendanceStatus::default()),
            Some(raw) => raw.parse::<AttendanceStatus>().ok(),
        };
        if status.is_none() {
            field_error("status", "Must be one of Present, Absent, Late, Excused.");
        }

        if let (Some(franchise_id), Some(person_type), Some(person_id), Some(date), Some(status)) =
            (franchise_id, person_type, input.person_id, date, status)
        {
            prepared.push(AttendanceUpsert {
                franchise_id,
                person_type,
                person_id,
                date,
                status,
                in_time: non_blank(input.in_time),
                out_time: non_blank(input.out_time),
            });
        }
    }

    if !errors.is_empty() {
        return Err(AppError::FieldErrors(errors));
    }

    Ok(collapse_duplicates(prepared))
}

// Índices do lote ordenados pela chave única
fn write_order(batch: &[AttendanceUpsert]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..batch.len()).collect();
    order.sort_by_key(|&i| batch[i].key());
    order
}

fn collapse_duplicates(records: Vec<AttendanceUpsert>) -> Vec<AttendanceUpsert> {
    let mut positions = HashMap::new();
    let mut unique: Vec<AttendanceUpsert> = Vec::with_capacity(records.len());

    for record in records {
        match positions.entry(record.key()) {
            Entry::Occupied(slot) => unique[*slot.get()] = record,
            Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(record);
            }
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(person_id: i64, date: &str) -> AttendanceInput {
        AttendanceInput {
            person_id: Some(person_id),
            date: Some(date.into()),
            ..Default::default()
        }
    }

    fn staff_scope() -> Scope {
        Scope::FranchiseAndBatch { franchise_id: 7, batch: Some("B1".into()) }
    }

    fn may_1() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn staff_submission_is_forced_into_own_franchise_with_defaults() {
        let batch = prepare_batch(
            vec![AttendanceInput { status: Some("Present".into()), ..input(42, "2024-05-01") }],
            &staff_scope(),
        )
        .unwrap();

        assert_eq!(
            batch,
            vec![AttendanceUpsert {
                franchise_id: 7,
                person_type: PersonType::Staff,
                person_id: 42,
                date: may_1(),
                status: AttendanceStatus::Present,
                in_time: None,
                out_time: None,
            }]
        );
    }

    #[test]
    fn scoped_caller_cannot_write_another_franchise() {
        let batch = prepare_batch(
            vec![AttendanceInput { franchise: Some(3), ..input(42, "2024-05-01") }],
            &Scope::SingleFranchise { franchise_id: 9 },
        )
        .unwrap();
        assert_eq!(batch[0].franchise_id, 9);
    }

    #[test]
    fn admin_must_name_the_franchise_on_every_record() {
        let err = prepare_batch(vec![input(1, "2024-05-01")], &Scope::Unrestricted).unwrap_err();
        match err {
            AppError::FieldErrors(fields) => {
                assert_eq!(fields.get("records[0].franchise").map(String::as_str), Some(REQUIRED));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let ok = prepare_batch(
            vec![AttendanceInput { franchise: Some(4), ..input(1, "2024-05-01") }],
            &Scope::Unrestricted,
        )
        .unwrap();
        assert_eq!(ok[0].franchise_id, 4);
    }

    #[test]
    fn one_bad_record_fails_the_whole_batch() {
        let inputs = vec![
            input(1, "2024-05-01"),
            AttendanceInput { person_id: None, ..input(0, "2024-05-01") },
            AttendanceInput { status: Some("Sick".into()), ..input(3, "05/01/2024") },
        ];
        let Err(AppError::FieldErrors(fields)) = prepare_batch(inputs, &staff_scope()) else {
            panic!("batch should fail validation");
        };
        assert!(fields.contains_key("records[1].person_id"));
        assert!(fields.contains_key("records[2].status"));
        assert!(fields.contains_key("records[2].date"));
        assert!(!fields.keys().any(|k| k.starts_with("records[0]")));
    }

    #[test]
    fn person_type_and_status_are_closed_sets() {
        let batch = prepare_batch(
            vec![AttendanceInput {
                person_type: Some("student".into()),
                status: Some("Excused".into()),
                in_time: Some(" 09:15 ".into()),
                out_time: Some("".into()),
                ..input(5, "2024-05-01")
            }],
            &staff_scope(),
        )
        .unwrap();
        assert_eq!(batch[0].person_type, PersonType::Student);
        assert_eq!(batch[0].status, AttendanceStatus::Excused);
        assert_eq!(batch[0].in_time.as_deref(), Some("09:15"));
        assert_eq!(batch[0].out_time, None);

        let err = prepare_batch(
            vec![AttendanceInput { person_type: Some("parent".into()), ..input(5, "2024-05-01") }],
            &staff_scope(),
        );
        assert!(matches!(err, Err(AppError::FieldErrors(_))));
    }

    #[test]
    fn duplicate_keys_in_one_batch_collapse_to_the_last() {
        let batch = prepare_batch(
            vec![
                AttendanceInput { status: Some("Present".into()), ..input(42, "2024-05-01") },
                input(43, "2024-05-01"),
                AttendanceInput { status: Some("Absent".into()), ..input(42, "2024-05-01") },
            ],
            &staff_scope(),
        )
        .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].person_id, 42);
        assert_eq!(batch[0].status, AttendanceStatus::Absent);
        assert_eq!(batch[1].person_id, 43);
    }

    #[test]
    fn writes_follow_key_order_whatever_the_submission_order() {
        let forward: Vec<AttendanceInput> = (1..=4).map(|id| input(id, "2024-05-01")).collect();
        let backward: Vec<AttendanceInput> = (1..=4).rev().map(|id| input(id, "2024-05-01")).collect();

        let forward = prepare_batch(forward, &staff_scope()).unwrap();
        let backward = prepare_batch(backward, &staff_scope()).unwrap();

        let written = |batch: &[AttendanceUpsert]| -> Vec<i64> {
            write_order(batch).into_iter().map(|i| batch[i].person_id).collect()
        };
        assert_eq!(written(&forward), vec![1, 2, 3, 4]);
        assert_eq!(written(&backward), vec![1, 2, 3, 4]);
        assert_eq!(write_order(&backward), vec![3, 2, 1, 0]);
    }

    #[test]
    fn staff_rows_lock_before_student_rows() {
        let batch = prepare_batch(
            vec![
                AttendanceInput { person_type: Some("student".into()), ..input(1, "2024-05-01") },
                input(9, "2024-05-02"),
                input(9, "2024-05-01"),
            ],
            &staff_scope(),
        )
        .unwrap();
        assert_eq!(write_order(&batch), vec![2, 1, 0]);
    }

    #[test]
    fn empty_scope_cannot_submit_attendance() {
        assert!(matches!(
            prepare_batch(vec![input(1, "2024-05-01")], &Scope::Empty),
            Err(AppError::PermissionDenied(_))
        ));
    }

    #[test]
    fn month_range_is_half_open() {
        assert_eq!(
            month_range("2024-05"),
            Some((may_1(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()))
        );
        assert_eq!(
            month_range("2024-12"),
            Some((
                NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
            ))
        );
        assert_eq!(month_range("2024-13"), None);
        assert_eq!(month_range("May 2024"), None);
    }

    #[test]
    fn reads_resolve_the_franchise_from_scope() {
        assert_eq!(read_franchise(&Scope::Unrestricted, None), None);
        assert_eq!(read_franchise(&Scope::Unrestricted, Some(3)), Some(3));
        assert_eq!(read_franchise(&Scope::SingleFranchise { franchise_id: 9 }, Some(3)), Some(9));
        assert_eq!(read_franchise(&staff_scope(), None), Some(7));
        assert_eq!(read_franchise(&Scope::Empty, Some(3)), None);
    }
}
