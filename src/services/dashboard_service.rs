// src/services/dashboard_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{BatchRepository, CourseRepository, FranchiseRepository, NotificationRepository, StaffRepository, StudentRepository},
    models::{
        dashboard::{DashboardSummary, EntityStats},
        scope::{EntityKind, Scope},
    },
};

#[derive(Clone)]
pub struct DashboardService {
    pool: PgPool,
    franchise_repo: FranchiseRepository,
    staff_repo: StaffRepository,
    student_repo: StudentRepository,
    course_repo: CourseRepository,
    batch_repo: BatchRepository,
    notification_repo: NotificationRepository,
}

impl DashboardService {
    pub fn new(
        pool: PgPool,
        franchise_repo: FranchiseRepository,
        staff_repo: StaffRepository,
        student_repo: StudentRepository,
        course_repo: CourseRepository,
        batch_repo: BatchRepository,
        notification_repo: NotificationRepository,
    ) -> Self {
        Self { pool, franchise_repo, staff_repo, student_repo, course_repo, batch_repo, notification_repo }
    }

    /// Os cards do dashboard, todos sob o mesmo escopo.
    pub async fn get_summary(&self, scope: &Scope) -> Result<DashboardSummary, AppError> {
        if scope.is_empty() {
            return Ok(DashboardSummary {
                franchises: EntityStats::default(),
                staff: EntityStats::default(),
                students: EntityStats::default(),
                courses: EntityStats::default(),
                batches: EntityStats::default(),
                unread_notifications: 0,
            });
        }

        // Snapshot único para todas as contagens
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let franchises = self.franchise_repo.stats(&mut *tx, &scope.filter_for(EntityKind::Franchise)).await?;
        let staff = self.staff_repo.stats(&mut *tx, &scope.filter_for(EntityKind::Staff)).await?;
        let students = self.student_repo.stats(&mut *tx, &scope.filter_for(EntityKind::Student)).await?;
        let courses = self.course_repo.stats(&mut *tx, &scope.filter_for(EntityKind::Course)).await?;
        let batches = self.batch_repo.stats(&mut *tx, &scope.filter_for(EntityKind::Batch)).await?;
        let unread_notifications = self
            .notification_repo
            .unread_count(&mut *tx, &scope.filter_for(EntityKind::Notification))
            .await?;

        tx.commit().await?;

        Ok(DashboardSummary { franchises, staff, students, courses, batches, unread_notifications })
    }
}
