// src/db/notification_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    db::scope_filter::{push_scope, ScopeColumns},
    models::{notification::Notification, scope::ScopeFilter},
};

const LIST_COLUMNS: ScopeColumns = ScopeColumns { franchise: "n.franchise_id", batch: None };
const COLUMNS: ScopeColumns = ScopeColumns { franchise: "franchise_id", batch: None };

#[derive(Clone, Default)]
pub struct NotificationRepository;

impl NotificationRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(&self, executor: E, message: &str, franchise_id: Option<i64>) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO notifications (franchise_id, message) VALUES ($1, $2) RETURNING id",
        )
        .bind(franchise_id)
        .bind(message)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &ScopeFilter) -> Result<Vec<Notification>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT n.id, n.franchise_id, f.name AS franchise_name, n.message, n.is_read, n.created_at
            FROM notifications n
            LEFT JOIN franchises f ON f.id = n.franchise_id
            WHERE TRUE"#,
        );
        push_scope(&mut qb, filter, LIST_COLUMNS);
        qb.push(" ORDER BY n.created_at DESC, n.id DESC");

        let notifications = qb.build_query_as::<Notification>().fetch_all(executor).await?;
        Ok(notifications)
    }

    // `false` quando a notificação não existe ou está fora do escopo
    pub async fn mark_read<'e, E>(&self, executor: E, id: i64, filter: &ScopeFilter) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE notifications SET is_read = TRUE WHERE id = ");
        qb.push_bind(id);
        push_scope(&mut qb, filter, COLUMNS);

        let result = qb.build().execute(executor).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_all_read<'e, E>(&self, executor: E, filter: &ScopeFilter) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE notifications SET is_read = TRUE WHERE is_read = FALSE");
        push_scope(&mut qb, filter, COLUMNS);

        let result = qb.build().execute(executor).await?;
        Ok(result.rows_affected())
    }

    pub async fn unread_count<'e, E>(&self, executor: E, filter: &ScopeFilter) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM notifications WHERE is_read = FALSE");
        push_scope(&mut qb, filter, COLUMNS);

        let count = qb.build_query_scalar::<i64>().fetch_one(executor).await?;
        Ok(count)
    }
}
