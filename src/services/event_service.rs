// src/services/event_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{EventRepository, FranchiseRepository},
    models::{
        event::{CreateEventPayload, Event, UpdateEventPayload},
        scope::{EntityKind, Scope},
    },
    services::notification_service::{messages, NotificationService},
};

#[derive(Clone)]
pub struct EventService {
    pool: PgPool,
    event_repo: EventRepository,
    franchise_repo: FranchiseRepository,
    notifier: NotificationService,
}

impl EventService {
    pub fn new(
        pool: PgPool,
        event_repo: EventRepository,
        franchise_repo: FranchiseRepository,
        notifier: NotificationService,
    ) -> Self {
        Self { pool, event_repo, franchise_repo, notifier }
    }

    pub async fn create(&self, scope: &Scope, payload: CreateEventPayload) -> Result<Event, AppError> {
        let franchise_id = scope.write_optional_franchise(payload.franchise_id)?;
        if let Some(id) = franchise_id {
            if !self.franchise_repo.exists(&self.pool, id).await? {
                return Err(AppError::NotFound("Franchise"));
            }
        }

        let event = self.event_repo.create(&self.pool, franchise_id, &payload).await?;
        self.notifier.notify(messages::event_added(&event.name), event.franchise_id);
        Ok(event)
    }

    pub async fn list(&self, scope: &Scope) -> Result<Vec<Event>, AppError> {
        if scope.is_empty() {
            return Ok(vec![]);
        }
        self.event_repo.list(&self.pool, &scope.filter_for(EntityKind::Event)).await
    }

    pub async fn get(&self, scope: &Scope, id: i64) -> Result<Event, AppError> {
        let event = self
            .event_repo
            .find_by_id(&self.pool, id)
            .await?
            .filter(|e| scope.filter_for(EntityKind::Event).admits(e.franchise_id, None))
            .ok_or(AppError::NotFound("Event"))?;
        Ok(event)
    }

    pub async fn update(&self, scope: &Scope, id: i64, payload: UpdateEventPayload) -> Result<Event, AppError> {
        let current = self
            .event_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Event"))?;
        scope.authorize_write(EntityKind::Event, "Event", current.franchise_id)?;

        let franchise_id = scope.reassign_franchise(payload.franchise_id)?;
        if let Some(target) = franchise_id {
            if !self.franchise_repo.exists(&self.pool, target).await? {
                return Err(AppError::NotFound("Franchise"));
            }
        }

        let event = self
            .event_repo
            .update(&self.pool, id, &payload, franchise_id)
            .await?
            .ok_or(AppError::NotFound("Event"))?;

        self.notifier.notify(messages::event_updated(&event.name), event.franchise_id);
        Ok(event)
    }

    pub async fn delete(&self, scope: &Scope, id: i64) -> Result<(), AppError> {
        let current = self
            .event_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Event"))?;
        scope.authorize_write(EntityKind::Event, "Event", current.franchise_id)?;

        let event = self
            .event_repo
            .delete(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Event"))?;

        self.notifier.notify(messages::event_removed(&event.name), event.franchise_id);
        Ok(())
    }
}
