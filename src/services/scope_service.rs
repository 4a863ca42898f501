// src/services/scope_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{FranchiseRepository, StaffRepository},
    models::{
        auth::{Principal, Role},
        scope::Scope,
    },
};

// Resolve o escopo a cada requisição (sem cache: o vínculo pode mudar entre chamadas)
#[derive(Clone)]
pub struct ScopeService {
    pool: PgPool,
    franchise_repo: FranchiseRepository,
    staff_repo: StaffRepository,
}

impl ScopeService {
    pub fn new(pool: PgPool, franchise_repo: FranchiseRepository, staff_repo: StaffRepository) -> Self {
        Self { pool, franchise_repo, staff_repo }
    }

    /// No máximo uma consulta ao banco: franquia-por-dono ou staff-por-principal.
    pub async fn resolve_scope(&self, principal: Option<&Principal>) -> Result<Scope, AppError> {
        let Some(principal) = principal else {
            return Ok(Scope::Empty);
        };

        let scope = match principal.role {
            Role::Admin => Scope::Unrestricted,
            Role::FranchiseHead => {
                let owned = self.franchise_repo.find_id_by_owner(&self.pool, principal.id).await?;
                Scope::from_links(Some(Role::FranchiseHead), owned, None)
            }
            Role::Staff => {
                let link = self.staff_repo.find_link_by_user(&self.pool, principal.id).await?;
                Scope::from_links(Some(Role::Staff), None, link)
            }
            Role::Student => Scope::Empty,
        };

        tracing::debug!(principal = principal.id, ?scope, "Escopo resolvido");
        Ok(scope)
    }
}
