// src/services/student_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{FranchiseRepository, StudentRepository},
    models::{
        dashboard::EntityStats,
        scope::{EntityKind, Scope},
        student::{CreateStudentPayload, Student, StudentView, UpdateStudentPayload},
    },
};

#[derive(Clone)]
pub struct StudentService {
    pool: PgPool,
    student_repo: StudentRepository,
    franchise_repo: FranchiseRepository,
}

impl StudentService {
    pub fn new(pool: PgPool, student_repo: StudentRepository, franchise_repo: FranchiseRepository) -> Self {
        Self { pool, student_repo, franchise_repo }
    }

    pub async fn create(&self, scope: &Scope, payload: CreateStudentPayload) -> Result<Student, AppError> {
        let franchise_id = scope.write_franchise(payload.franchise_id)?;
        if !self.franchise_repo.exists(&self.pool, franchise_id).await? {
            return Err(AppError::NotFound("Franchise"));
        }
        self.student_repo.create(&self.pool, franchise_id, &payload).await
    }

    // Staff com turma só enxerga os alunos da própria turma
    pub async fn list(&self, scope: &Scope) -> Result<Vec<StudentView>, AppError> {
        if scope.is_empty() {
            return Ok(vec![]);
        }
        self.student_repo.list(&self.pool, &scope.filter_for(EntityKind::Student)).await
    }

    pub async fn get(&self, scope: &Scope, id: i64) -> Result<StudentView, AppError> {
        let filter = scope.filter_for(EntityKind::Student);
        let student = self
            .student_repo
            .find_view_by_id(&self.pool, id)
            .await?
            .filter(|view| filter.admits(Some(view.student.franchise_id), Some(&view.student.batch)))
            .ok_or(AppError::NotFound("Student"))?;
        Ok(student)
    }

    pub async fn update(&self, scope: &Scope, id: i64, payload: UpdateStudentPayload) -> Result<Student, AppError> {
        let current = self
            .student_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Student"))?;
        scope.authorize_write(EntityKind::Student, "Student", Some(current.franchise_id))?;

        let franchise_id = scope.reassign_franchise(payload.franchise_id)?;
        if let Some(target) = franchise_id {
            if !self.franchise_repo.exists(&self.pool, target).await? {
                return Err(AppError::NotFound("Franchise"));
            }
        }

        self.student_repo
            .update(&self.pool, id, &payload, franchise_id)
            .await?
            .ok_or(AppError::NotFound("Student"))
    }

    pub async fn delete(&self, scope: &Scope, id: i64) -> Result<(), AppError> {
        let current = self
            .student_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Student"))?;
        scope.authorize_write(EntityKind::Student, "Student", Some(current.franchise_id))?;

        if !self.student_repo.delete(&self.pool, id).await? {
            return Err(AppError::NotFound("Student"));
        }
        Ok(())
    }

    pub async fn stats(&self, scope: &Scope) -> Result<EntityStats, AppError> {
        if scope.is_empty() {
            return Ok(EntityStats::default());
        }
        self.student_repo.stats(&self.pool, &scope.filter_for(EntityKind::Student)).await
    }
}
