// src/services/deletion.rs

use std::future::Future;

use crate::common::error::AppError;

// ---
// Remoção em duas fases (Franchise, Staff):
//   1. apaga a entidade principal; se falhar, aborta e a entidade continua ativa
//   2. tenta apagar o principal vinculado; falha aqui só vai para o log
// A fase 1 nunca é desfeita por causa da fase 2.
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalCleanup {
    Deleted,
    // Sem principal vinculado, ou ele já tinha sido removido
    NotLinked,
    Failed,
}

#[derive(Debug)]
pub struct DeletionReport<T> {
    pub entity: T,
    pub principal: PrincipalCleanup,
}

/// `delete_entity` devolve a linha removida (ou `NotFound`), `linked_principal`
/// extrai o principal dela e `delete_principal` faz a remoção best-effort.
pub async fn run_two_phase_delete<T, EntityFut, PrincipalFut>(
    label: &str,
    delete_entity: EntityFut,
    linked_principal: impl FnOnce(&T) -> Option<i64>,
    delete_principal: impl FnOnce(i64) -> PrincipalFut,
) -> Result<DeletionReport<T>, AppError>
where
    EntityFut: Future<Output = Result<T, AppError>>,
    PrincipalFut: Future<Output = Result<bool, AppError>>,
{
    // Fase 1
    let entity = delete_entity.await?;

    // Fase 2
    let principal = match linked_principal(&entity) {
        None => PrincipalCleanup::NotLinked,
        Some(user_id) => match delete_principal(user_id).await {
            Ok(true) => PrincipalCleanup::Deleted,
            Ok(false) => PrincipalCleanup::NotLinked,
            Err(e) => {
                tracing::warn!(
                    "{} removido, mas o principal vinculado {} não pôde ser apagado: {}",
                    label, user_id, e
                );
                PrincipalCleanup::Failed
            }
        },
    };

    Ok(DeletionReport { entity, principal })
}
