// src/models/scope.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::{common::error::AppError, models::auth::Role};

// ---
// Scope: as fronteiras de franquia/turma a que um principal está restrito.
// Calculado uma vez por requisição e passado explicitamente para cada consulta.
// ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    /// admin: todas as franquias
    Unrestricted,
    /// franchise_head: a franquia que o principal possui
    SingleFranchise {
        #[serde(rename = "franchiseId")]
        franchise_id: i64,
    },
    /// staff: a franquia do registro de staff; a turma estreita alunos
    FranchiseAndBatch {
        #[serde(rename = "franchiseId")]
        franchise_id: i64,
        batch: Option<String>,
    },
    /// sem sessão, papel sem escopo ou vínculo ausente: não enxerga nada
    Empty,
}

/// Vínculo de um principal com papel staff, lido da tabela `staff`.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct StaffLink {
    pub franchise_id: Option<i64>,
    pub batch: Option<String>,
}

impl Scope {
    /// Deriva o escopo a partir do papel e dos vínculos encontrados no banco.
    /// `owned_franchise` só importa para franchise_head, `staff_link` só para staff.
    pub fn from_links(
        role: Option<Role>,
        owned_franchise: Option<i64>,
        staff_link: Option<StaffLink>,
    ) -> Self {
        match role {
            Some(Role::Admin) => Scope::Unrestricted,
            Some(Role::FranchiseHead) => match owned_franchise {
                Some(franchise_id) => Scope::SingleFranchise { franchise_id },
                None => Scope::Empty,
            },
            Some(Role::Staff) => match staff_link {
                Some(StaffLink { franchise_id: Some(franchise_id), batch }) => {
                    // Turma vazia não estreita nada
                    let batch = batch.map(|b| b.trim().to_string()).filter(|b| !b.is_empty());
                    Scope::FranchiseAndBatch { franchise_id, batch }
                }
                _ => Scope::Empty,
            },
            Some(Role::Student) | None => Scope::Empty,
        }
    }

    pub fn franchise_id(&self) -> Option<i64> {
        match self {
            Scope::SingleFranchise { franchise_id }
            | Scope::FranchiseAndBatch { franchise_id, .. } => Some(*franchise_id),
            Scope::Unrestricted | Scope::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Scope::Empty)
    }

    /// Predicado de leitura para um tipo de entidade.
    pub fn filter_for(&self, kind: EntityKind) -> ScopeFilter {
        match self {
            Scope::Unrestricted => ScopeFilter::All,
            Scope::Empty => ScopeFilter::Nothing,
            Scope::SingleFranchise { franchise_id } => ScopeFilter::Franchise {
                franchise_id: *franchise_id,
                include_global: kind.has_global_rows(),
            },
            Scope::FranchiseAndBatch { franchise_id, batch } => match batch {
                Some(batch) if kind.narrows_by_batch() => ScopeFilter::FranchiseBatch {
                    franchise_id: *franchise_id,
                    batch: batch.clone(),
                },
                _ => ScopeFilter::Franchise {
                    franchise_id: *franchise_id,
                    include_global: kind.has_global_rows(),
                },
            },
        }
    }

    /// Resolve a franquia alvo de uma escrita.
    /// Escopos de uma franquia sempre sobrescrevem o que o cliente mandou;
    /// admin precisa informar a franquia explicitamente.
    pub fn write_franchise(&self, requested: Option<i64>) -> Result<i64, AppError> {
        match self {
            Scope::Unrestricted => requested
                .ok_or_else(|| AppError::Validation("franchise is required.".into())),
            Scope::SingleFranchise { franchise_id }
            | Scope::FranchiseAndBatch { franchise_id, .. } => Ok(*franchise_id),
            Scope::Empty => Err(AppError::permission_denied(
                "Your account is not linked to any franchise.",
            )),
        }
    }

    /// Igual a `write_franchise`, mas para entidades cuja franquia é opcional
    /// (admin pode criar registros globais).
    pub fn write_optional_franchise(&self, requested: Option<i64>) -> Result<Option<i64>, AppError> {
        match self {
            Scope::Unrestricted => Ok(requested),
            other => other.write_franchise(requested).map(Some),
        }
    }

    /// Pode alterar/apagar uma linha já carregada?
    /// Fora do escopo responde 404 (não vaza existência); linhas globais
    /// são visíveis para todos, mas só o admin altera.
    pub fn authorize_write(
        &self,
        kind: EntityKind,
        label: &'static str,
        row_franchise: Option<i64>,
    ) -> Result<(), AppError> {
        match self {
            Scope::Unrestricted => Ok(()),
            Scope::Empty => Err(AppError::permission_denied(
                "Your account is not linked to any franchise.",
            )),
            Scope::SingleFranchise { franchise_id }
            | Scope::FranchiseAndBatch { franchise_id, .. } => match row_franchise {
                Some(row) if row == *franchise_id => Ok(()),
                None if kind.has_global_rows() => Err(AppError::permission_denied(
                    "Only an admin can change records shared by all franchises.",
                )),
                _ => Err(AppError::NotFound(label)),
            },
        }
    }

    /// Franquia nova numa atualização. `None` mantém a atual.
    /// Só o admin move registros entre franquias.
    pub fn reassign_franchise(&self, requested: Option<i64>) -> Result<Option<i64>, AppError> {
        match (self, requested) {
            (Scope::Unrestricted, requested) => Ok(requested),
            (Scope::Empty, _) => Err(AppError::permission_denied(
                "Your account is not linked to any franchise.",
            )),
            (_, Some(requested)) if Some(requested) != self.franchise_id() => Err(
                AppError::permission_denied("Records cannot be moved to another franchise."),
            ),
            _ => Ok(None),
        }
    }
}

// Tipos de entidade que passam pela camada de consulta com escopo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Franchise,
    Staff,
    Student,
    Course,
    Batch,
    Event,
    Notification,
}

impl EntityKind {
    /// Entidades com franquia opcional: linhas sem franquia são globais.
    pub fn has_global_rows(self) -> bool {
        matches!(
            self,
            EntityKind::Course | EntityKind::Batch | EntityKind::Event | EntityKind::Notification
        )
    }

    /// Só alunos são estreitados pela turma do staff.
    pub fn narrows_by_batch(self) -> bool {
        matches!(self, EntityKind::Student)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeFilter {
    All,
    Franchise { franchise_id: i64, include_global: bool },
    FranchiseBatch { franchise_id: i64, batch: String },
    Nothing,
}

impl ScopeFilter {
    /// Avalia o predicado contra uma linha já carregada
    /// (usado em buscas por id e mutações pontuais).
    pub fn admits(&self, franchise_id: Option<i64>, batch: Option<&str>) -> bool {
        match self {
            ScopeFilter::All => true,
            ScopeFilter::Nothing => false,
            ScopeFilter::Franchise { franchise_id: f, include_global } => match franchise_id {
                Some(row) => row == *f,
                None => *include_global,
            },
            ScopeFilter::FranchiseBatch { franchise_id: f, batch: b } => {
                franchise_id == Some(*f) && batch == Some(b.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_link(franchise_id: Option<i64>, batch: Option<&str>) -> Option<StaffLink> {
        Some(StaffLink { franchise_id, batch: batch.map(str::to_string) })
    }

    #[test]
    fn admin_is_unrestricted() {
        assert_eq!(Scope::from_links(Some(Role::Admin), None, None), Scope::Unrestricted);
    }

    #[test]
    fn franchise_head_without_franchise_sees_nothing() {
        assert_eq!(Scope::from_links(Some(Role::FranchiseHead), None, None), Scope::Empty);
        assert_eq!(
            Scope::from_links(Some(Role::FranchiseHead), Some(9), None),
            Scope::SingleFranchise { franchise_id: 9 }
        );
    }

    #[test]
    fn staff_scope_comes_from_staff_record() {
        assert_eq!(
            Scope::from_links(Some(Role::Staff), None, staff_link(Some(7), Some("B1"))),
            Scope::FranchiseAndBatch { franchise_id: 7, batch: Some("B1".into()) }
        );
        assert_eq!(
            Scope::from_links(Some(Role::Staff), None, staff_link(Some(7), Some("  "))),
            Scope::FranchiseAndBatch { franchise_id: 7, batch: None }
        );
        assert_eq!(
            Scope::from_links(Some(Role::Staff), None, staff_link(Some(7), Some(" B1 "))),
            Scope::FranchiseAndBatch { franchise_id: 7, batch: Some("B1".into()) }
        );
        assert_eq!(Scope::from_links(Some(Role::Staff), None, staff_link(None, Some("B1"))), Scope::Empty);
        assert_eq!(Scope::from_links(Some(Role::Staff), Some(3), None), Scope::Empty);
    }

    #[test]
    fn students_and_anonymous_callers_are_empty() {
        assert_eq!(Scope::from_links(Some(Role::Student), Some(1), None), Scope::Empty);
        assert_eq!(Scope::from_links(None, None, None), Scope::Empty);
    }

    #[test]
    fn batch_narrows_students_only() {
        let scope = Scope::FranchiseAndBatch { franchise_id: 7, batch: Some("B1".into()) };
        assert_eq!(
            scope.filter_for(EntityKind::Student),
            ScopeFilter::FranchiseBatch { franchise_id: 7, batch: "B1".into() }
        );
        assert_eq!(
            scope.filter_for(EntityKind::Staff),
            ScopeFilter::Franchise { franchise_id: 7, include_global: false }
        );
        assert_eq!(
            scope.filter_for(EntityKind::Course),
            ScopeFilter::Franchise { franchise_id: 7, include_global: true }
        );
    }

    #[test]
    fn scoped_filters_never_admit_other_franchises() {
        let scope = Scope::SingleFranchise { franchise_id: 9 };
        let filter = scope.filter_for(EntityKind::Student);
        assert!(filter.admits(Some(9), Some("any")));
        assert!(!filter.admits(Some(3), Some("any")));
        assert!(!filter.admits(None, None));

        let staff = Scope::FranchiseAndBatch { franchise_id: 7, batch: Some("B1".into()) };
        let filter = staff.filter_for(EntityKind::Student);
        assert!(filter.admits(Some(7), Some("B1")));
        assert!(!filter.admits(Some(7), Some("B2")));
        assert!(!filter.admits(Some(8), Some("B1")));
    }

    #[test]
    fn empty_scope_admits_nothing_and_unrestricted_admits_all() {
        assert!(!Scope::Empty.filter_for(EntityKind::Course).admits(None, None));
        assert!(Scope::Unrestricted.filter_for(EntityKind::Staff).admits(Some(42), None));
    }

    #[test]
    fn write_franchise_overrides_for_scoped_callers() {
        let staff = Scope::FranchiseAndBatch { franchise_id: 7, batch: Some("B1".into()) };
        assert_eq!(staff.write_franchise(None).unwrap(), 7);
        assert_eq!(staff.write_franchise(Some(3)).unwrap(), 7);
        assert_eq!(Scope::SingleFranchise { franchise_id: 9 }.write_franchise(Some(1)).unwrap(), 9);
    }

    #[test]
    fn write_franchise_requires_explicit_franchise_for_admin() {
        assert_eq!(Scope::Unrestricted.write_franchise(Some(4)).unwrap(), 4);
        assert!(matches!(Scope::Unrestricted.write_franchise(None), Err(AppError::Validation(_))));
        assert!(matches!(Scope::Empty.write_franchise(Some(4)), Err(AppError::PermissionDenied(_))));
        assert_eq!(Scope::Unrestricted.write_optional_franchise(None).unwrap(), None);
    }

    #[test]
    fn scope_serializes_with_kind_tag() {
        let json = serde_json::to_value(Scope::FranchiseAndBatch {
            franchise_id: 7,
            batch: Some("B1".into()),
        })
        .unwrap();
        assert_eq!(json["kind"], "franchise_and_batch");
        assert_eq!(json["franchiseId"], 7);
        assert_eq!(json["batch"], "B1");
    }

    #[test]
    fn writes_outside_scope_look_missing() {
        let head = Scope::SingleFranchise { franchise_id: 9 };
        assert!(head.authorize_write(EntityKind::Student, "Student", Some(9)).is_ok());
        assert!(matches!(
            head.authorize_write(EntityKind::Student, "Student", Some(3)),
            Err(AppError::NotFound("Student"))
        ));
        assert!(matches!(
            head.authorize_write(EntityKind::Batch, "Batch", None),
            Err(AppError::PermissionDenied(_))
        ));
        assert!(Scope::Unrestricted.authorize_write(EntityKind::Batch, "Batch", None).is_ok());
        assert!(matches!(
            Scope::Empty.authorize_write(EntityKind::Staff, "Staff", Some(9)),
            Err(AppError::PermissionDenied(_))
        ));
    }

    #[test]
    fn only_admin_moves_records_between_franchises() {
        assert_eq!(Scope::Unrestricted.reassign_franchise(Some(3)).unwrap(), Some(3));
        let head = Scope::SingleFranchise { franchise_id: 9 };
        assert_eq!(head.reassign_franchise(None).unwrap(), None);
        assert_eq!(head.reassign_franchise(Some(9)).unwrap(), None);
        assert!(matches!(head.reassign_franchise(Some(3)), Err(AppError::PermissionDenied(_))));
    }
}
