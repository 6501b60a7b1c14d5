//! Modelo de DailyOccupancy
//!
//! Una fila por fecha en la tabla daily_occupancy.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct DailyOccupancy {
    pub date: NaiveDate,
    pub occupied_spots: i32,
    pub updated_at: DateTime<Utc>,
}

impl DailyOccupancy {
    pub fn is_full(&self, total_spots: i32) -> bool {
        self.occupied_spots >= total_spots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_full() {
        let day = DailyOccupancy {
            date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            occupied_spots: 5,
            updated_at: Utc::now(),
        };
        assert!(day.is_full(5));
        assert!(day.is_full(4));
        assert!(!day.is_full(6));
    }
}
