// src/services/staff_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{staff_repo::NewStaff, FranchiseRepository, StaffRepository, UserRepository},
    models::{
        auth::Role,
        dashboard::EntityStats,
        scope::{EntityKind, Scope},
        staff::{CreateStaffPayload, Staff, StaffView, UpdateStaffPayload},
    },
    services::{
        auth::hash_password,
        deletion::{run_two_phase_delete, DeletionReport},
        mailer::{Mailer, WelcomeEmail},
        notification_service::{messages, NotificationService},
    },
};

#[derive(Clone)]
pub struct StaffService {
    pool: PgPool,
    staff_repo: StaffRepository,
    user_repo: UserRepository,
    franchise_repo: FranchiseRepository,
    notifier: NotificationService,
    mailer: Mailer,
}

impl StaffService {
    pub fn new(
        pool: PgPool,
        staff_repo: StaffRepository,
        user_repo: UserRepository,
        franchise_repo: FranchiseRepository,
        notifier: NotificationService,
        mailer: Mailer,
    ) -> Self {
        Self { pool, staff_repo, user_repo, franchise_repo, notifier, mailer }
    }

    /// Principal (role=staff) + registro de staff, tudo ou nada.
    pub async fn create(&self, scope: &Scope, payload: CreateStaffPayload) -> Result<Staff, AppError> {
        // franchise_head sempre grava na própria franquia
        let franchise_id = scope.write_franchise(payload.franchise_id)?;
        let password_hash = hash_password(&payload.password).await?;

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        if !self.franchise_repo.exists(&mut *tx, franchise_id).await? {
            return Err(AppError::NotFound("Franchise"));
        }

        let principal = self
            .user_repo
            .create_user(&mut *tx, &payload.email, &password_hash, Role::Staff)
            .await?;

        let staff = self
            .staff_repo
            .create(
                &mut *tx,
                NewStaff {
                    user_id: principal.id,
                    franchise_id,
                    name: &payload.name,
                    phone: &payload.phone,
                    salary: payload.salary,
                    role: payload.role,
                    status: payload.status,
                    batch: payload.batch.as_deref(),
                },
            )
            .await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        self.mailer.enqueue(WelcomeEmail {
            to: payload.email,
            display_name: staff.name.clone(),
            role: Role::Staff,
        });
        self.notifier.notify(messages::staff_added(&staff.name), staff.franchise_id);

        Ok(staff)
    }

    pub async fn list(&self, scope: &Scope) -> Result<Vec<StaffView>, AppError> {
        if scope.is_empty() {
            return Ok(vec![]);
        }
        self.staff_repo.list(&self.pool, &scope.filter_for(EntityKind::Staff)).await
    }

    pub async fn get(&self, scope: &Scope, id: i64) -> Result<StaffView, AppError> {
        let staff = self
            .staff_repo
            .find_view_by_id(&self.pool, id)
            .await?
            .filter(|view| scope.filter_for(EntityKind::Staff).admits(view.staff.franchise_id, None))
            .ok_or(AppError::NotFound("Staff"))?;
        Ok(staff)
    }

    pub async fn update(&self, scope: &Scope, id: i64, payload: UpdateStaffPayload) -> Result<Staff, AppError> {
        let current = self
            .staff_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Staff"))?;
        scope.authorize_write(EntityKind::Staff, "Staff", current.franchise_id)?;

        let franchise_id = scope.reassign_franchise(payload.franchise_id)?;
        if let Some(target) = franchise_id {
            if !self.franchise_repo.exists(&self.pool, target).await? {
                return Err(AppError::NotFound("Franchise"));
            }
        }

        let staff = self
            .staff_repo
            .update(&self.pool, id, &payload, franchise_id)
            .await?
            .ok_or(AppError::NotFound("Staff"))?;

        self.notifier.notify(messages::staff_updated(&staff.name), staff.franchise_id);
        Ok(staff)
    }

    /// Remoção em duas fases: o staff primeiro, o principal depois (best-effort).
    pub async fn delete(&self, scope: &Scope, id: i64) -> Result<DeletionReport<Staff>, AppError> {
        let current = self
            .staff_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Staff"))?;
        scope.authorize_write(EntityKind::Staff, "Staff", current.franchise_id)?;

        let report = run_two_phase_delete(
            "Staff",
            async {
                self.staff_repo
                    .delete(&self.pool, id)
                    .await
                    .and_then(|row| row.ok_or(AppError::NotFound("Staff")))
            },
            |staff: &Staff| Some(staff.user_id),
            |user_id| self.user_repo.delete_user(&self.pool, user_id),
        )
        .await?;

        tracing::info!(principal = ?report.principal, "🗑️ Staff {} removido.", id);
        self.notifier.notify(messages::staff_removed(&report.entity.name), report.entity.franchise_id);
        Ok(report)
    }

    pub async fn stats(&self, scope: &Scope) -> Result<EntityStats, AppError> {
        if scope.is_empty() {
            return Ok(EntityStats::default());
        }
        self.staff_repo.stats(&self.pool, &scope.filter_for(EntityKind::Staff)).await
    }
}
