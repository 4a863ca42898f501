// src/db/student_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{map_write_error, unique_message},
        error::AppError,
    },
    db::scope_filter::{count_stats, push_scope, ScopeColumns, StatsSpec},
    models::{
        dashboard::EntityStats,
        scope::ScopeFilter,
        student::{CreateStudentPayload, Student, StudentView, UpdateStudentPayload},
    },
};

// Alunos são a única entidade estreitada pela turma do staff
const COLUMNS: ScopeColumns = ScopeColumns { franchise: "s.franchise_id", batch: Some("s.batch") };

const STATS: StatsSpec = StatsSpec {
    table: "students s",
    columns: COLUMNS,
    active: "Active",
    inactive: "Inactive",
};

const VIEW_SELECT: &str = r#"
    SELECT s.*, f.name AS franchise_name
    FROM students s
    LEFT JOIN franchises f ON f.id = s.franchise_id
    WHERE TRUE"#;

#[derive(Clone, Default)]
pub struct StudentRepository;

impl StudentRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        franchise_id: i64,
        payload: &CreateStudentPayload,
    ) -> Result<Student, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (franchise_id, name, email, phone, batch, fees_paid, fees_pending, status)
            VALUES ($1, $2, $3, $4, BTRIM($5), $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(franchise_id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.batch)
        .bind(payload.fees_paid)
        .bind(payload.fees_pending)
        .bind(payload.status)
        .fetch_one(executor)
        .await
        .map_err(|e| map_write_error(e, unique_message))
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &ScopeFilter) -> Result<Vec<StudentView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new(VIEW_SELECT);
        push_scope(&mut qb, filter, COLUMNS);
        qb.push(" ORDER BY s.created_at DESC, s.id DESC");

        let students = qb.build_query_as::<StudentView>().fetch_all(executor).await?;
        Ok(students)
    }

    pub async fn find_view_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<StudentView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new(VIEW_SELECT);
        qb.push(" AND s.id = ").push_bind(id);

        let student = qb.build_query_as::<StudentView>().fetch_optional(executor).await?;
        Ok(student)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Student>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(student)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        changes: &UpdateStudentPayload,
        franchise_id: Option<i64>,
    ) -> Result<Option<Student>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Student>(
            r#"
            UPDATE students SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                batch = COALESCE(BTRIM($5), batch),
                fees_paid = COALESCE($6, fees_paid),
                fees_pending = COALESCE($7, fees_pending),
                status = COALESCE($8, status),
                franchise_id = COALESCE($9, franchise_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.batch.as_deref())
        .bind(changes.fees_paid)
        .bind(changes.fees_pending)
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
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
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
