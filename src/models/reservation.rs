//! Modelo de Reservation
//!
//! Este módulo contiene el struct Reservation y sus enums asociados.
//! Mapea exactamente a la tabla reservations y a los ENUM
//! reservation_status / reservation_source.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la reserva - mapea al ENUM reservation_status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "reservation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

/// Origen de la reserva - mapea al ENUM reservation_source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "reservation_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationSource {
    Phone,
    WalkIn,
    Api,
}

/// Reservation principal - mapea exactamente a la tabla reservations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub last_name: String,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_plate: Option<String>,
    pub flight_direction: Option<String>,
    pub notes: Option<String>,
    pub planned_check_in: DateTime<Utc>,
    pub planned_check_out: DateTime<Utc>,
    pub actual_check_in: Option<DateTime<Utc>>,
    pub actual_check_out: Option<DateTime<Utc>>,
    pub status: ReservationStatus,
    pub is_paid: bool,
    pub source: ReservationSource,
    pub total_cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_at: DateTime<Utc>,
    pub last_modified_by: Uuid,
}

impl Reservation {
    /// La salida planificada debe ser estrictamente posterior a la entrada
    pub fn has_valid_planned_window(&self) -> bool {
        self.planned_check_out > self.planned_check_in
    }
}

/// Datos de inserción de una reserva; el resto de columnas
/// (id, status, is_paid, timestamps) las rellena la base de datos
#[derive(Debug, Clone, Serialize)]
pub struct NewReservation {
    pub last_name: String,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_plate: Option<String>,
    pub planned_check_in: DateTime<Utc>,
    pub planned_check_out: DateTime<Utc>,
    pub source: ReservationSource,
    pub total_cost: Decimal,
    pub created_by: Uuid,
    pub last_modified_by: Uuid,
}

impl NewReservation {
    /// Materializar la fila tal como quedaría tras el INSERT
    pub fn into_reservation(self, id: Uuid, now: DateTime<Utc>) -> Reservation {
        Reservation {
            id,
            last_name: self.last_name,
            first_name: self.first_name,
            email: self.email,
            phone: self.phone,
            license_plate: self.license_plate,
            flight_direction: None,
            notes: None,
            planned_check_in: self.planned_check_in,
            planned_check_out: self.planned_check_out,
            actual_check_in: None,
            actual_check_out: None,
            status: ReservationStatus::default(),
            is_paid: false,
            source: self.source,
            total_cost: self.total_cost,
            created_at: now,
            created_by: self.created_by,
            updated_at: now,
            last_modified_by: self.last_modified_by,
        }
    }
}
