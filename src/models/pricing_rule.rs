//! Modelo de PricingRule
//!
//! Tramos de precio por número de días (tabla pricing_rules). El cálculo
//! real lo hace la función `calculate_total_cost` de la base de datos.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PricingRule {
    pub id: Uuid,
    pub days_from: i32,
    pub days_to: i32,
    pub price_per_day: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingRule {
    pub fn new(days_from: i32, days_to: i32, price_per_day: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            days_from,
            days_to,
            price_per_day,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Tramo activo que incluye `days` (límites inclusivos)
    pub fn covers(&self, days: i64) -> bool {
        self.is_active && i64::from(self.days_from) <= days && days <= i64::from(self.days_to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers() {
        let mut rule = PricingRule::new(1, 7, Decimal::new(40, 0));
        assert!(rule.covers(1));
        assert!(rule.covers(7));
        assert!(!rule.covers(8));
        assert!(!rule.covers(0));

        rule.is_active = false;
        assert!(!rule.covers(3));
    }
}
