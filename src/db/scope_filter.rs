// src/db/scope_filter.rs

use sqlx::{Executor, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::{dashboard::EntityStats, scope::ScopeFilter},
};

// ---
// Tradução do ScopeFilter para SQL
// ---

/// Onde ficam a franquia (e a turma, se houver) numa tabela.
/// Só recebe identificadores estáticos, nunca entrada do cliente.
#[derive(Debug, Clone, Copy)]
pub struct ScopeColumns {
    pub franchise: &'static str,
    pub batch: Option<&'static str>,
}

/// Acrescenta `AND (...)` com o predicado do escopo.
/// A consulta precisa já ter um `WHERE` aberto.
pub fn push_scope<'args>(
    qb: &mut QueryBuilder<'args, Postgres>,
    filter: &ScopeFilter,
    columns: ScopeColumns,
) {
    match filter {
        ScopeFilter::All => {}
        ScopeFilter::Nothing => {
            qb.push(" AND FALSE");
        }
        ScopeFilter::Franchise { franchise_id, include_global } => {
            qb.push(" AND (")
                .push(columns.franchise)
                .push(" = ")
                .push_bind(*franchise_id);
            if *include_global {
                qb.push(" OR ").push(columns.franchise).push(" IS NULL");
            }
            qb.push(")");
        }
        ScopeFilter::FranchiseBatch { franchise_id, batch } => {
            qb.push(" AND ")
                .push(columns.franchise)
                .push(" = ")
                .push_bind(*franchise_id);
            // Tabela sem turma: o filtro de turma não se aplica
            if let Some(batch_column) = columns.batch {
                qb.push(" AND ").push(batch_column).push(" = ").push_bind(batch.clone());
            }
        }
    }
}

/// Descreve como contar ativos/inativos numa tabela.
#[derive(Debug, Clone, Copy)]
pub struct StatsSpec {
    pub table: &'static str,
    pub columns: ScopeColumns,
    pub active: &'static str,
    pub inactive: &'static str,
}

/// `{total, active, inactive}` sob o escopo. Nunca agrega entre franquias
/// para quem tem escopo restrito, porque o mesmo predicado das listagens é aplicado.
pub async fn count_stats<'e, E>(
    executor: E,
    spec: StatsSpec,
    filter: &ScopeFilter,
) -> Result<EntityStats, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    if matches!(filter, ScopeFilter::Nothing) {
        return Ok(EntityStats::default());
    }

    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE status = '");
    qb.push(spec.active)
        .push("') AS active, COUNT(*) FILTER (WHERE status = '")
        .push(spec.inactive)
        .push("') AS inactive FROM ")
        .push(spec.table)
        .push(" WHERE TRUE");
    push_scope(&mut qb, filter, spec.columns);

    let stats = qb.build_query_as::<EntityStats>().fetch_one(executor).await?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUDENT_COLUMNS: ScopeColumns = ScopeColumns { franchise: "s.franchise_id", batch: Some("s.batch") };

    fn render(filter: &ScopeFilter, columns: ScopeColumns) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM students s WHERE TRUE");
        push_scope(&mut qb, filter, columns);
        qb.sql().to_string()
    }

    #[test]
    fn unrestricted_adds_nothing() {
        assert_eq!(render(&ScopeFilter::All, STUDENT_COLUMNS), "SELECT * FROM students s WHERE TRUE");
    }

    #[test]
    fn empty_scope_matches_no_rows() {
        assert!(render(&ScopeFilter::Nothing, STUDENT_COLUMNS).ends_with(" AND FALSE"));
    }

    #[test]
    fn franchise_filter_binds_the_id() {
        let sql = render(
            &ScopeFilter::Franchise { franchise_id: 9, include_global: false },
            STUDENT_COLUMNS,
        );
        assert!(sql.ends_with(" AND (s.franchise_id = $1)"));
    }

    #[test]
    fn optional_franchise_tables_include_global_rows() {
        let sql = render(
            &ScopeFilter::Franchise { franchise_id: 9, include_global: true },
            ScopeColumns { franchise: "c.franchise_id", batch: None },
        );
        assert!(sql.ends_with(" AND (c.franchise_id = $1 OR c.franchise_id IS NULL)"));
    }

    #[test]
    fn batch_filter_binds_franchise_and_batch() {
        let sql = render(
            &ScopeFilter::FranchiseBatch { franchise_id: 7, batch: "B1".into() },
            STUDENT_COLUMNS,
        );
        assert!(sql.ends_with(" AND s.franchise_id = $1 AND s.batch = $2"));
    }
}
