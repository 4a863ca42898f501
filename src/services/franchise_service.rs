// src/services/franchise_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{FranchiseRepository, UserRepository},
    models::{
        auth::Role,
        dashboard::EntityStats,
        franchise::{CreateFranchisePayload, Franchise, FranchiseOption, UpdateFranchisePayload},
        scope::{EntityKind, Scope},
    },
    services::{
        auth::hash_password,
        deletion::{run_two_phase_delete, DeletionReport},
        mailer::{Mailer, WelcomeEmail},
        notification_service::{messages, NotificationService},
    },
};

#[derive(Clone)]
pub struct FranchiseService {
    pool: PgPool,
    franchise_repo: FranchiseRepository,
    user_repo: UserRepository,
    notifier: NotificationService,
    mailer: Mailer,
}

impl FranchiseService {
    pub fn new(
        pool: PgPool,
        franchise_repo: FranchiseRepository,
        user_repo: UserRepository,
        notifier: NotificationService,
        mailer: Mailer,
    ) -> Self {
        Self { pool, franchise_repo, user_repo, notifier, mailer }
    }

    /// Cria a franquia e, se pedido, o principal franchise_head na mesma transação.
    pub async fn create(&self, payload: CreateFranchisePayload) -> Result<Franchise, AppError> {
        // Hash fora da transação (não toca no banco)
        let head = match &payload.head {
            Some(credentials) => Some((credentials, hash_password(&credentials.password).await?)),
            None => None,
        };

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        // 1. Principal (opcional)
        let user_id = match &head {
            Some((credentials, password_hash)) => {
                let principal = self
                    .user_repo
                    .create_user(&mut *tx, &credentials.email, password_hash, Role::FranchiseHead)
                    .await?;
                Some(principal.id)
            }
            None => None,
        };

        // 2. Franquia (se falhar, o principal acima é desfeito no rollback)
        let franchise = self
            .franchise_repo
            .create(&mut *tx, user_id, &payload.name, &payload.location, payload.start_date, payload.status)
            .await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!("🏢 Franquia '{}' criada (id {}).", franchise.name, franchise.id);

        if let Some((credentials, _)) = head {
            self.mailer.enqueue(WelcomeEmail {
                to: credentials.email.clone(),
                display_name: franchise.name.clone(),
                role: Role::FranchiseHead,
            });
        }
        self.notifier.notify(messages::franchise_added(&franchise.name), Some(franchise.id));

        Ok(franchise)
    }

    pub async fn list(&self, scope: &Scope) -> Result<Vec<Franchise>, AppError> {
        if scope.is_empty() {
            return Ok(vec![]);
        }
        self.franchise_repo.list(&self.pool, &scope.filter_for(EntityKind::Franchise)).await
    }

    pub async fn options(&self, scope: &Scope) -> Result<Vec<FranchiseOption>, AppError> {
        if scope.is_empty() {
            return Ok(vec![]);
        }
        self.franchise_repo.options(&self.pool, &scope.filter_for(EntityKind::Franchise)).await
    }

    pub async fn get(&self, scope: &Scope, id: i64) -> Result<Franchise, AppError> {
        let franchise = self
            .franchise_repo
            .find_by_id(&self.pool, id)
            .await?
            .filter(|f| scope.filter_for(EntityKind::Franchise).admits(Some(f.id), None))
            .ok_or(AppError::NotFound("Franchise"))?;
        Ok(franchise)
    }

    pub async fn update(&self, id: i64, payload: UpdateFranchisePayload) -> Result<Franchise, AppError> {
        let franchise = self
            .franchise_repo
            .update(&self.pool, id, &payload)
            .await?
            .ok_or(AppError::NotFound("Franchise"))?;

        self.notifier.notify(messages::franchise_updated(&franchise.name), Some(franchise.id));
        Ok(franchise)
    }

    /// Remoção em duas fases: a franquia primeiro, o franchise_head depois (best-effort).
    pub async fn delete(&self, id: i64) -> Result<DeletionReport<Franchise>, AppError> {
        let report = run_two_phase_delete(
            "Franchise",
            async {
                self.franchise_repo
                    .delete(&self.pool, id)
                    .await
                    .and_then(|row| row.ok_or(AppError::NotFound("Franchise")))
            },
            |franchise: &Franchise| franchise.user_id,
            |user_id| self.user_repo.delete_user(&self.pool, user_id),
        )
        .await?;

        tracing::info!(principal = ?report.principal, "🗑️ Franquia {} removida.", id);
        // A franquia não existe mais: a notificação fica global
        self.notifier.notify(messages::franchise_removed(&report.entity.name), None);
        Ok(report)
    }

    pub async fn stats(&self, scope: &Scope) -> Result<EntityStats, AppError> {
        if scope.is_empty() {
            return Ok(EntityStats::default());
        }
        self.franchise_repo.stats(&self.pool, &scope.filter_for(EntityKind::Franchise)).await
    }
}
