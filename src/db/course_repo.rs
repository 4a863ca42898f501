// src/db/course_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};

use crate::{
    common::{db_utils::{map_write_error, unique_message}, error::AppError},
    db::scope_filter::{count_stats, push_scope, ScopeColumns, StatsSpec},
    models::{
        course::{Course, CreateCoursePayload, UpdateCoursePayload},
        dashboard::EntityStats,
        scope::ScopeFilter,
    },
};

const COLUMNS: ScopeColumns = ScopeColumns { franchise: "franchise_id", batch: None };

const STATS: StatsSpec = StatsSpec {
    table: "courses",
    columns: COLUMNS,
    active: "Active",
    inactive: "Inactive",
};

#[derive(Clone, Default)]
pub struct CourseRepository;

impl CourseRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        franchise_id: Option<i64>,
        payload: &CreateCoursePayload,
    ) -> Result<Course, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (franchise_id, name, category, duration, instructor, students, status, start_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(franchise_id)
        .bind(&payload.name)
        .bind(&payload.category)
        .bind(&payload.duration)
        .bind(&payload.instructor)
        .bind(&payload.students)
        .bind(payload.status)
        .bind(payload.start_date)
        .fetch_one(executor)
        .await
        .map_err(|e| map_write_error(e, unique_message))
    }

    // Cursos globais (sem franquia) aparecem para todos os escopos
    pub async fn list<'e, E>(&self, executor: E, filter: &ScopeFilter) -> Result<Vec<Course>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM courses WHERE TRUE");
        push_scope(&mut qb, filter, COLUMNS);
        qb.push(" ORDER BY created_at DESC, id DESC");

        let courses = qb.build_query_as::<Course>().fetch_all(executor).await?;
        Ok(courses)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Course>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(course)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        changes: &UpdateCoursePayload,
    ) -> Result<Option<Course>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                duration = COALESCE($4, duration),
                instructor = COALESCE($5, instructor),
                students = COALESCE($6, students),
                status = COALESCE($7, status),
                start_date = COALESCE($8, start_date),
                franchise_id = COALESCE($9, franchise_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.category.as_deref())
        .bind(changes.duration.as_deref())
        .bind(changes.instructor.as_deref())
        .bind(changes.students.as_deref())
        .bind(changes.status)
        .bind(changes.start_date)
        .bind(changes.franchise_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_write_error(e, unique_message))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
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
