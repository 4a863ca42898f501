// src/services/notification_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::NotificationRepository,
    models::{
        notification::Notification,
        scope::{EntityKind, Scope},
    },
};

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
    pool: PgPool,
}

impl NotificationService {
    pub fn new(repo: NotificationRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    /// Dispara e esquece: o insert roda em outra task e falhas só vão para o log.
    /// Chamado pelos handlers de comando depois do commit.
    pub fn notify(&self, message: impl Into<String>, franchise_id: Option<i64>) {
        let message = message.into();
        let repo = self.repo.clone();
        let pool = self.pool.clone();

        tokio::spawn(async move {
            if let Err(e) = repo.insert(&pool, &message, franchise_id).await {
                tracing::warn!("Falha ao gravar notificação '{}': {}", message, e);
            }
        });
    }

    pub async fn list(&self, scope: &Scope) -> Result<Vec<Notification>, AppError> {
        if scope.is_empty() {
            return Ok(vec![]);
        }
        self.repo.list(&self.pool, &scope.filter_for(EntityKind::Notification)).await
    }

    // Fora do escopo responde 404, igual a uma notificação inexistente
    pub async fn mark_read(&self, scope: &Scope, id: i64) -> Result<(), AppError> {
        let updated = self
            .repo
            .mark_read(&self.pool, id, &scope.filter_for(EntityKind::Notification))
            .await?;
        if !updated {
            return Err(AppError::NotFound("Notification"));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, scope: &Scope) -> Result<u64, AppError> {
        if scope.is_empty() {
            return Ok(0);
        }
        self.repo.mark_all_read(&self.pool, &scope.filter_for(EntityKind::Notification)).await
    }

    pub async fn unread_count(&self, scope: &Scope) -> Result<i64, AppError> {
        if scope.is_empty() {
            return Ok(0);
        }
        self.repo.unread_count(&self.pool, &scope.filter_for(EntityKind::Notification)).await
    }
}

/// Mensagens padronizadas dos eventos de domínio.
pub mod messages {
    pub fn franchise_added(name: &str) -> String {
        format!("Franchise '{}' was added.", name)
    }

    pub fn franchise_updated(name: &str) -> String {
        format!("Franchise '{}' was updated.", name)
    }

    pub fn franchise_removed(name: &str) -> String {
        format!("Franchise '{}' was removed.", name)
    }

    pub fn staff_added(name: &str) -> String {
        format!("Staff '{}' was added.", name)
    }

    pub fn staff_updated(name: &str) -> String {
        format!("Staff '{}' was updated.", name)
    }

    pub fn staff_removed(name: &str) -> String {
        format!("Staff '{}' was removed.", name)
    }

    pub fn event_added(name: &str) -> String {
        format!("Event '{}' was added.", name)
    }

    pub fn event_updated(name: &str) -> String {
        format!("Event '{}' was updated.", name)
    }

    pub fn event_removed(name: &str) -> String {
        format!("Event '{}' was removed.", name)
    }
}

#[cfg(test)]
mod tests {
    use super::messages;

    #[test]
    fn messages_quote_the_entity_name() {
        assert_eq!(messages::staff_added("Asha"), "Staff 'Asha' was added.");
        assert_eq!(messages::event_removed("Expo"), "Event 'Expo' was removed.");
        assert_eq!(messages::franchise_updated("Pune"), "Franchise 'Pune' was updated.");
    }
}
