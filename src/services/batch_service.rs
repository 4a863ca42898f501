// src/services/batch_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{BatchRepository, FranchiseRepository},
    models::{
        batch::{Batch, CreateBatchPayload, UpdateBatchPayload},
        dashboard::EntityStats,
        scope::{EntityKind, Scope},
    },
};

#[derive(Clone)]
pub struct BatchService {
    pool: PgPool,
    batch_repo: BatchRepository,
    franchise_repo: FranchiseRepository,
}

impl BatchService {
    pub fn new(pool: PgPool, batch_repo: BatchRepository, franchise_repo: FranchiseRepository) -> Self {
        Self { pool, batch_repo, franchise_repo }
    }

    pub async fn create(&self, scope: &Scope, payload: CreateBatchPayload) -> Result<Batch, AppError> {
        let franchise_id = scope.write_optional_franchise(payload.franchise_id)?;
        if let Some(id) = franchise_id {
            if !self.franchise_repo.exists(&self.pool, id).await? {
                return Err(AppError::NotFound("Franchise"));
            }
        }
        self.batch_repo.create(&self.pool, franchise_id, &payload).await
    }

    pub async fn list(&self, scope: &Scope) -> Result<Vec<Batch>, AppError> {
        if scope.is_empty() {
            return Ok(vec![]);
        }
        self.batch_repo.list(&self.pool, &scope.filter_for(EntityKind::Batch)).await
    }

    pub async fn get(&self, scope: &Scope, id: i64) -> Result<Batch, AppError> {
        let batch = self
            .batch_repo
            .find_by_id(&self.pool, id)
            .await?
            .filter(|b| scope.filter_for(EntityKind::Batch).admits(b.franchise_id, None))
            .ok_or(AppError::NotFound("Batch"))?;
        Ok(batch)
    }

    pub async fn update(&self, scope: &Scope, id: i64, payload: UpdateBatchPayload) -> Result<Batch, AppError> {
        let current = self
            .batch_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Batch"))?;
        scope.authorize_write(EntityKind::Batch, "Batch", current.franchise_id)?;

        // O intervalo vale para o resultado da mescla, não só para o que veio no payload
        let start = payload.start.unwrap_or(current.start_date);
        let end = payload.end.unwrap_or(current.end_date);
        if end < start {
            return Err(AppError::Validation("Batch end date cannot be before its start date.".into()));
        }

        let franchise_id = scope.reassign_franchise(payload.franchise_id)?;
        if let Some(target) = franchise_id {
            if !self.franchise_repo.exists(&self.pool, target).await? {
                return Err(AppError::NotFound("Franchise"));
            }
        }

        self.batch_repo
            .update(&self.pool, id, &payload, franchise_id)
            .await?
            .ok_or(AppError::NotFound("Batch"))
    }

    pub async fn delete(&self, scope: &Scope, id: i64) -> Result<(), AppError> {
        let current = self
            .batch_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Batch"))?;
        scope.authorize_write(EntityKind::Batch, "Batch", current.franchise_id)?;

        if !self.batch_repo.delete(&self.pool, id).await? {
            return Err(AppError::NotFound("Batch"));
        }
        Ok(())
    }

    pub async fn stats(&self, scope: &Scope) -> Result<EntityStats, AppError> {
        if scope.is_empty() {
            return Ok(EntityStats::default());
        }
        self.batch_repo.stats(&self.pool, &scope.filter_for(EntityKind::Batch)).await
    }
}
