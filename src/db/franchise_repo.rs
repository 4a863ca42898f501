// src/db/franchise_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{map_write_error, unique_message},
        error::AppError,
    },
    db::scope_filter::{count_stats, push_scope, ScopeColumns, StatsSpec},
    models::{
        dashboard::EntityStats,
        franchise::{Franchise, FranchiseOption, UpdateFranchisePayload},
        scope::ScopeFilter,
        status::FranchiseStatus,
    },
};

// A própria franquia é a "coluna de franquia"
const COLUMNS: ScopeColumns = ScopeColumns { franchise: "id", batch: None };

const STATS: StatsSpec = StatsSpec {
    table: "franchises",
    columns: COLUMNS,
    active: "active",
    inactive: "inactive",
};

// Sem estado: quem chama decide o executor (pool ou transação)
#[derive(Clone, Default)]
pub struct FranchiseRepository;

impl FranchiseRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Option<i64>,
        name: &str,
        location: &str,
        start_date: NaiveDate,
        status: FranchiseStatus,
    ) -> Result<Franchise, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Franchise>(
            r#"
            INSERT INTO franchises (user_id, name, location, start_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(location)
        .bind(start_date)
        .bind(status)
        .fetch_one(executor)
        .await
        .map_err(|e| map_write_error(e, unique_message))
    }

    // Lista com escopo, mais novas primeiro
    pub async fn list<'e, E>(&self, executor: E, filter: &ScopeFilter) -> Result<Vec<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM franchises WHERE TRUE");
        push_scope(&mut qb, filter, COLUMNS);
        qb.push(" ORDER BY created_at DESC, id DESC");

        let franchises = qb.build_query_as::<Franchise>().fetch_all(executor).await?;
        Ok(franchises)
    }

    // Feed do dropdown do frontend
    pub async fn options<'e, E>(&self, executor: E, filter: &ScopeFilter) -> Result<Vec<FranchiseOption>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id, name FROM franchises WHERE TRUE");
        push_scope(&mut qb, filter, COLUMNS);
        qb.push(" ORDER BY name ASC");

        let options = qb.build_query_as::<FranchiseOption>().fetch_all(executor).await?;
        Ok(options)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let franchise = sqlx::query_as::<_, Franchise>("SELECT * FROM franchises WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(franchise)
    }

    pub async fn exists<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM franchises WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    // A franquia de um franchise_head (zero ou uma, garantido pela UNIQUE em user_id)
    pub async fn find_id_by_owner<'e, E>(&self, executor: E, user_id: i64) -> Result<Option<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM franchises WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(executor)
            .await?;
        Ok(id)
    }

    // Atualização parcial: campos ausentes mantêm o valor atual
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        changes: &UpdateFranchisePayload,
    ) -> Result<Option<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let franchise = sqlx::query_as::<_, Franchise>(
            r#"
            UPDATE franchises SET
                name = COALESCE($2, name),
                location = COALESCE($3, location),
                start_date = COALESCE($4, start_date),
                status = COALESCE($5, status)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.location.as_deref())
        .bind(changes.start_date)
        .bind(changes.status)
        .fetch_optional(executor)
        .await?;
        Ok(franchise)
    }

    // Apaga e devolve a linha removida (para saber o principal vinculado).
    // Alunos ainda vinculados bloqueiam a remoção (ON DELETE RESTRICT).
    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<Option<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Franchise>("DELETE FROM franchises WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| match map_write_error(e, unique_message) {
                AppError::Conflict(_) => {
                    AppError::Conflict("Franchise still has students; move or remove them first.".into())
                }
                other => other,
            })
    }

    pub async fn stats<'e, E>(&self, executor: E, filter: &ScopeFilter) -> Result<EntityStats, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        count_stats(executor, STATS, filter).await
    }
}
