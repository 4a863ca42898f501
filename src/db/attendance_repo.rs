// src/db/attendance_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};

use crate::{
    common::{db_utils::{map_write_error, unique_message}, error::AppError},
    models::attendance::{AttendanceUpsert, AttendanceView},
};

// Nome de exibição resolvido por tipo de pessoa; nulo se a pessoa não existir mais
const VIEW_SELECT: &str = r#"
    SELECT
        a.*,
        CASE WHEN a.person_type = 'staff' THEN st.name ELSE su.name END AS name,
        a.person_id AS staff_id
    FROM attendance_records a
    LEFT JOIN staff st ON a.person_type = 'staff' AND st.id = a.person_id
    LEFT JOIN students su ON a.person_type = 'student' AND su.id = a.person_id
"#;

#[derive(Clone, Default)]
pub struct AttendanceRepository;

impl AttendanceRepository {
    pub fn new() -> Self {
        Self
    }

    // UPSERT atômico na chave (franquia, tipo, pessoa, dia).
    // Nunca "busca e depois insere": o ON CONFLICT resolve a corrida no banco.
    pub async fn upsert<'e, E>(&self, executor: E, record: &AttendanceUpsert) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO attendance_records (franchise_id, person_type, person_id, date, status, in_time, out_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (franchise_id, person_type, person_id, date)
            DO UPDATE SET
                status = EXCLUDED.status,
                in_time = EXCLUDED.in_time,
                out_time = EXCLUDED.out_time,
                updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(record.franchise_id)
        .bind(record.person_type)
        .bind(record.person_id)
        .bind(record.date)
        .bind(record.status)
        .bind(record.in_time.as_deref())
        .bind(record.out_time.as_deref())
        .fetch_one(executor)
        .await
        .map_err(|e| map_write_error(e, unique_message))
    }

    // Recarrega os registros gravados, na ordem dos ids recebidos
    pub async fn find_views_by_ids<'e, E>(&self, executor: E, ids: &[i64]) -> Result<Vec<AttendanceView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{VIEW_SELECT} WHERE a.id = ANY($1) ORDER BY array_position($1, a.id)");
        let records = sqlx::query_as::<_, AttendanceView>(&sql)
            .bind(ids)
            .fetch_all(executor)
            .await?;
        Ok(records)
    }

    pub async fn list_by_date<'e, E>(
        &self,
        executor: E,
        franchise_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "{VIEW_SELECT} WHERE a.franchise_id = $1 AND a.date = $2 ORDER BY a.person_type, a.person_id"
        );
        let records = sqlx::query_as::<_, AttendanceView>(&sql)
            .bind(franchise_id)
            .bind(date)
            .fetch_all(executor)
            .await?;
        Ok(records)
    }

    // Intervalo semiaberto [from, to)
    pub async fn list_between<'e, E>(
        &self,
        executor: E,
        franchise_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "{VIEW_SELECT} WHERE a.franchise_id = $1 AND a.date >= $2 AND a.date < $3 \
             ORDER BY a.date, a.person_type, a.person_id"
        );
        let records = sqlx::query_as::<_, AttendanceView>(&sql)
            .bind(franchise_id)
            .bind(from)
            .bind(to)
            .fetch_all(executor)
            .await?;
        Ok(records)
    }
}
