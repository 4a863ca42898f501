// src/models/dashboard.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Contadores de um tipo de entidade, sempre sob o escopo de quem pergunta
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct EntityStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
}

impl std::ops::Add for EntityStats {
    type Output = EntityStats;

    fn add(self, rhs: EntityStats) -> EntityStats {
        EntityStats {
            total: self.total + rhs.total,
            active: self.active + rhs.active,
            inactive: self.inactive + rhs.inactive,
        }
    }
}

impl std::iter::Sum for EntityStats {
    fn sum<I: Iterator<Item = EntityStats>>(iter: I) -> Self {
        iter.fold(EntityStats::default(), |acc, s| acc + s)
    }
}

// Os cards do topo do dashboard
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub franchises: EntityStats,
    pub staff: EntityStats,
    pub students: EntityStats,
    pub courses: EntityStats,
    pub batches: EntityStats,
    pub unread_notifications: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_franchise_stats_sum_to_the_total() {
        let per_franchise = vec![
            EntityStats { total: 3, active: 2, inactive: 1 },
            EntityStats { total: 5, active: 5, inactive: 0 },
        ];
        let total: EntityStats = per_franchise.into_iter().sum();
        assert_eq!(total, EntityStats { total: 8, active: 7, inactive: 1 });
    }
}
