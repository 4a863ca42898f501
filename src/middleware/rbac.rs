// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    models::auth::{Principal, Role},
};

/// 1. O Trait que define quais papéis passam pelo portão
pub trait RoleGate: Send + Sync + 'static {
    fn allowed() -> &'static [Role];
    fn denial() -> &'static str;
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleGate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A. Escrita exige sessão
        let principal = parts.extensions.get::<Principal>().ok_or(AppError::InvalidToken)?;

        // B. Confere o papel
        if !T::allowed().contains(&principal.role) {
            return Err(AppError::permission_denied(T::denial()));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PORTÕES (TIPOS)
// ---

pub struct AdminOnly;
impl RoleGate for AdminOnly {
    fn allowed() -> &'static [Role] { &[Role::Admin] }
    fn denial() -> &'static str { "Only an admin can perform this action." }
}

pub struct Managers;
impl RoleGate for Managers {
    fn allowed() -> &'static [Role] { &[Role::Admin, Role::FranchiseHead] }
    fn denial() -> &'static str { "Only an admin or a franchise head can perform this action." }
}

pub struct AttendanceTakers;
impl RoleGate for AttendanceTakers {
    fn allowed() -> &'static [Role] { &[Role::Admin, Role::FranchiseHead, Role::Staff] }
    fn denial() -> &'static str { "Your role cannot record attendance." }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::Utc;

    fn parts_with(role: Option<Role>) -> Parts {
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        if let Some(role) = role {
            parts.extensions.insert(Principal {
                id: 1,
                email: "x@y.com".into(),
                password_hash: String::new(),
                role,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            });
        }
        parts
    }

    async fn check<T: RoleGate>(role: Option<Role>) -> Result<(), AppError> {
        let mut parts = parts_with(role);
        RequireRole::<T>::from_request_parts(&mut parts, &()).await.map(|_| ())
    }

    #[tokio::test]
    async fn anonymous_callers_get_401() {
        assert!(matches!(check::<Managers>(None).await, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn staff_cannot_manage_but_can_take_attendance() {
        assert!(matches!(check::<Managers>(Some(Role::Staff)).await, Err(AppError::PermissionDenied(_))));
        assert!(check::<AttendanceTakers>(Some(Role::Staff)).await.is_ok());
        assert!(matches!(check::<AttendanceTakers>(Some(Role::Student)).await, Err(AppError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn only_admin_passes_admin_gate() {
        assert!(check::<AdminOnly>(Some(Role::Admin)).await.is_ok());
        assert!(matches!(check::<AdminOnly>(Some(Role::FranchiseHead)).await, Err(AppError::PermissionDenied(_))));
    }
}
