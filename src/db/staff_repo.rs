// src/db/staff_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{map_write_error, unique_message},
        error::AppError,
    },
    db::scope_filter::{count_stats, push_scope, ScopeColumns, StatsSpec},
    models::{
        dashboard::EntityStats,
        scope::{ScopeFilter, StaffLink},
        staff::{Staff, StaffRole, StaffView, UpdateStaffPayload},
        status::RecordStatus,
    },
};

// A turma do staff não estreita a listagem de staff
const COLUMNS: ScopeColumns = ScopeColumns { franchise: "s.franchise_id", batch: None };

const STATS: StatsSpec = StatsSpec {
    table: "staff s",
    columns: COLUMNS,
    active: "Active",
    inactive: "Inactive",
};

const VIEW_SELECT: &str = r#"
    SELECT s.*, f.name AS franchise_name, u.email AS email
    FROM staff s
    LEFT JOIN franchises f ON f.id = s.franchise_id
    LEFT JOIN users u ON u.id = s.user_id
    WHERE TRUE"#;

// Colunas de um novo registro de staff
pub struct NewStaff<'a> {
    pub user_id: i64,
    pub franchise_id: i64,
    pub name: &'a str,
    pub phone: &'a str,
    pub salary: Decimal,
    pub role: StaffRole,
    pub status: RecordStatus,
    pub batch: Option<&'a str>,
}

#[derive(Clone, Default)]
pub struct StaffRepository;

impl StaffRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(&self, executor: E, new: NewStaff<'_>) -> Result<Staff, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Staff>(
            r#"
            INSERT INTO staff (user_id, franchise_id, name, phone, salary, role, status, batch)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NULLIF(BTRIM($8), ''))
            RETURNING *
            "#,
        )
        .bind(new.user_id)
        .bind(new.franchise_id)
        .bind(new.name)
        .bind(new.phone)
        .bind(new.salary)
        .bind(new.role)
        .bind(new.status)
        .bind(new.batch)
        .fetch_one(executor)
        .await
        .map_err(|e| map_write_error(e, unique_message))
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &ScopeFilter) -> Result<Vec<StaffView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new(VIEW_SELECT);
        push_scope(&mut qb, filter, COLUMNS);
        qb.push(" ORDER BY s.created_at DESC, s.id DESC");

        let staff = qb.build_query_as::<StaffView>().fetch_all(executor).await?;
        Ok(staff)
    }

    pub async fn find_view_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<StaffView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new(VIEW_SELECT);
        qb.push(" AND s.id = ").push_bind(id);

        let staff = qb.build_query_as::<StaffView>().fetch_optional(executor).await?;
        Ok(staff)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Staff>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let staff = sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(staff)
    }

    // Vínculo usado pelo resolvedor de escopo
    pub async fn find_link_by_user<'e, E>(&self, executor: E, user_id: i64) -> Result<Option<StaffLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let link = sqlx::query_as::<_, StaffLink>("SELECT franchise_id, batch FROM staff WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(executor)
            .await?;
        Ok(link)
    }

    // `franchise_id` já vem resolvido pelo serviço (forçado para franchise_head)
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        changes: &UpdateStaffPayload,
        franchise_id: Option<i64>,
    ) -> Result<Option<Staff>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Staff>(
            r#"
            UPDATE staff SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                salary = COALESCE($4, salary),
                role = COALESCE($5, role),
                status = COALESCE($6, status),
                batch = CASE WHEN $7::text IS NULL THEN batch ELSE NULLIF(BTRIM($7), '') END,
                franchise_id = COALESCE($8, franchise_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.salary)
        .bind(changes.role)
        .bind(changes.status)
        .bind(changes.batch.as_deref())
        .bind(franchise_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_write_error(e, unique_message))
    }

    // Apaga e devolve a linha (o serviço usa o user_id para a segunda fase)
    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<Option<Staff>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let staff = sqlx::query_as::<_, Staff>("DELETE FROM staff WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(staff)
    }

    pub async fn stats<'e, E>(&self, executor: E, filter: &ScopeFilter) -> Result<EntityStats, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        count_stats(executor, STATS, filter).await
    }
}
