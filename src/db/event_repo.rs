// src/db/event_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};

use crate::{
    common::{db_utils::{map_write_error, unique_message}, error::AppError},
    db::scope_filter::{push_scope, ScopeColumns},
    models::{
        event::{CreateEventPayload, Event, UpdateEventPayload},
        scope::ScopeFilter,
    },
};

const COLUMNS: ScopeColumns = ScopeColumns { franchise: "franchise_id", batch: None };

#[derive(Clone, Default)]
pub struct EventRepository;

impl EventRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        franchise_id: Option<i64>,
        payload: &CreateEventPayload,
    ) -> Result<Event, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (franchise_id, name, location, start_date, end_date, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(franchise_id)
        .bind(&payload.name)
        .bind(&payload.location)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.status)
        .fetch_one(executor)
        .await
        .map_err(|e| map_write_error(e, unique_message))
    }

    // Eventos mais recentes primeiro (por data de início)
    pub async fn list<'e, E>(&self, executor: E, filter: &ScopeFilter) -> Result<Vec<Event>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM events WHERE TRUE");
        push_scope(&mut qb, filter, COLUMNS);
        qb.push(" ORDER BY start_date DESC, id DESC");

        let events = qb.build_query_as::<Event>().fetch_all(executor).await?;
        Ok(events)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Event>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(event)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        changes: &UpdateEventPayload,
        franchise_id: Option<i64>,
    ) -> Result<Option<Event>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET
                name = COALESCE($2, name),
                location = COALESCE($3, location),
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
        .bind(changes.location.as_deref())
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.status)
        .bind(franchise_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_write_error(e, unique_message))
    }

    // Devolve o evento removido (o nome vai na notificação)
    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<Option<Event>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let event = sqlx::query_as::<_, Event>("DELETE FROM events WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(event)
    }
}
