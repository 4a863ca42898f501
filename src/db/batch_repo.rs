// src/db/batch_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};

use crate::{
    common::{db_utils::{map_write_error, unique_message}, error::AppError},
    db::scope_filter::{count_stats, push_scope, ScopeColumns, StatsSpec},
    models::{
        batch::{Batch, CreateBatchPayload, UpdateBatchPayload},
        dashboard::EntityStats,
        scope::ScopeFilter,
    },
};

const COLUMNS: ScopeColumns = ScopeColumns { franchise: "franchise_id", batch: None };

const STATS: StatsSpec = StatsSpec {
    table: "batches",
    columns: COLUMNS,
    active: "Active",
    inactive: "Inactive",
};

#[derive(Clone, Default)]
pub struct BatchRepository;

impl BatchRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        franchise_id: Option<i64>,
        payload: &CreateBatchPayload,
    ) -> Result<Batch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Batch>(
            r#"
            INSERT INTO batches (franchise_id, name, students, start_date, end_date, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(franchise_id)
        .bind(&payload.name)
        .bind(payload.students)
        .bind(payload.start)
        .bind(payload.end)
        .bind(payload.status)
        .fetch_one(executor)
        .await
        .map_err(|e| map_write_error(e, unique_message))
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &ScopeFilter) -> Result<Vec<Batch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM batches WHERE TRUE");
        push_scope(&mut qb, filter, COLUMNS);
        qb.push(" ORDER BY created_at DESC, id DESC");

        let batches = qb.build_query_as::<Batch>().fetch_all(executor).await?;
        Ok(batches)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Batch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let batch = sqlx::query_as::<_, Batch>("SELECT * FROM batches WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(batch)
    }

    // O serviço confere o intervalo de datas resultante antes de chamar
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        changes: &UpdateBatchPayload,
        franchise_id: Option<i64>,
    ) -> Result<Option<Batch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Batch>(
            r#"
            UPDATE batches SET
                name = COALESCE($2, name),
                students = COALESCE($3, students),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                status = COALESCE($6, status),
                franchise_id = COALESCE($7, franchise_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.students)
        .bind(changes.start)
        .bind(changes.end)
        .bind(changes.status)
        .bind(franchise_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_write_error(e, unique_message))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM batches WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn stats<'e, E>(&self, executor: E, filter: &ScopeFilter) -> Result<EntityStats, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        count_stats(executor, STATS, filter).await
    }
}
