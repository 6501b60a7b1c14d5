//! Modelo de TransferVehicle - mapea a la tabla transfer_vehicles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransferVehicle {
    pub id: Uuid,
    pub name: String,
    pub license_plate: String,
    pub capacity: i32,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_row() {
        let vehicle: TransferVehicle = serde_json::from_value(json!({
            "id": "5f0c6a52-5a5e-4c7e-9b53-2b4f1e0c9a11",
            "name": "Shuttle 1",
            "license_plate": "PO 4455X",
            "capacity": 8,
            "is_active": true,
            "notes": null,
            "created_at": "2024-06-01T10:00:00Z",
            "updated_at": "2024-06-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(vehicle.capacity, 8);
        assert!(vehicle.notes.is_none());
    }
}
