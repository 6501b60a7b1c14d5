//! Modelo de Setting
//!
//! Almacén clave/valor (tabla settings). Aquí solo se consulta la
//! capacidad total del parking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Clave de la capacidad total del parking
pub const TOTAL_PARKING_SPOTS_KEY: &str = "total_parking_spots";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: Value,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Uuid,
}

/// Interpretar el valor JSON de la capacidad.
///
/// Se acepta un número entero positivo o un string numérico; cualquier
/// otra cosa se considera ausente.
pub fn parse_capacity(value: &Value) -> Option<i32> {
    let capacity = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    i32::try_from(capacity).ok().filter(|c| *c > 0)
}
