// src/services/course_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{CourseRepository, FranchiseRepository},
    models::{
        course::{Course, CreateCoursePayload, UpdateCoursePayload},
        dashboard::EntityStats,
        scope::{EntityKind, Scope},
    },
};

// Escrita só por admin (garantido no handler); leitura com escopo
#[derive(Clone)]
pub struct CourseService {
    pool: PgPool,
    course_repo: CourseRepository,
    franchise_repo: FranchiseRepository,
}

impl CourseService {
    pub fn new(pool: PgPool, course_repo: CourseRepository, franchise_repo: FranchiseRepository) -> Self {
        Self { pool, course_repo, franchise_repo }
    }

    async fn ensure_franchise(&self, franchise_id: Option<i64>) -> Result<(), AppError> {
        if let Some(id) = franchise_id {
            if !self.franchise_repo.exists(&self.pool, id).await? {
                return Err(AppError::NotFound("Franchise"));
            }
        }
        Ok(())
    }

    pub async fn create(&self, payload: CreateCoursePayload) -> Result<Course, AppError> {
        self.ensure_franchise(payload.franchise_id).await?;
        self.course_repo.create(&self.pool, payload.franchise_id, &payload).await
    }

    pub async fn list(&self, scope: &Scope) -> Result<Vec<Course>, AppError> {
        if scope.is_empty() {
            return Ok(vec![]);
        }
        self.course_repo.list(&self.pool, &scope.filter_for(EntityKind::Course)).await
    }

    pub async fn get(&self, scope: &Scope, id: i64) -> Result<Course, AppError> {
        let course = self
            .course_repo
            .find_by_id(&self.pool, id)
            .await?
            .filter(|c| scope.filter_for(EntityKind::Course).admits(c.franchise_id, None))
            .ok_or(AppError::NotFound("Course"))?;
        Ok(course)
    }

    pub async fn update(&self, id: i64, payload: UpdateCoursePayload) -> Result<Course, AppError> {
        self.ensure_franchise(payload.franchise_id).await?;
        self.course_repo
            .update(&self.pool, id, &payload)
            .await?
            .ok_or(AppError::NotFound("Course"))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.course_repo.delete(&self.pool, id).await? {
            return Err(AppError::NotFound("Course"));
        }
        Ok(())
    }

    pub async fn stats(&self, scope: &Scope) -> Result<EntityStats, AppError> {
        if scope.is_empty() {
            return Ok(EntityStats::default());
        }
        self.course_repo.stats(&self.pool, &scope.filter_for(EntityKind::Course)).await
    }
}
