//! Repositorio de reservas
//!
//! Frontera con el almacén de datos. Una reserva se crea dentro de una
//! `BookingSession`: lectura de capacidad, lectura de ocupación, cálculo del
//! precio e inserción forman una única unidad atómica. Si la sesión se
//! descarta sin `commit`, no queda nada escrito.
//!
//! En PostgreSQL la sesión es una transacción que toma primero un advisory
//! lock de transacción, de modo que dos reservas concurrentes no pueden
//! validar la misma ocupación antes de que la otra haga commit.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::{
    setting::parse_capacity, DailyOccupancy, NewReservation, TOTAL_PARKING_SPOTS_KEY,
};
use crate::utils::errors::{AppError, AppResult};

/// Clave del advisory lock que serializa la creación de reservas
pub const BOOKING_LOCK_KEY: i64 = 0x7061_726b_696e_67;

/// Almacén capaz de abrir sesiones de reserva
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn BookingSession>>;
}

/// Operaciones disponibles dentro de una sesión de reserva
#[async_trait]
pub trait BookingSession: Send {
    /// Capacidad total configurada; `None` si no existe o no es válida
    async fn total_parking_spots(&mut self) -> AppResult<Option<i32>>;

    /// Ocupación de las fechas en `[from, to]` (inclusivo), ordenada por fecha
    async fn occupancy_between(&mut self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<DailyOccupancy>>;

    /// Precio total calculado por el almacén; `None` si no devuelve valor
    async fn calculate_total_cost(
        &mut self,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> AppResult<Option<Decimal>>;

    /// Insertar la reserva y devolver su identificador
    async fn insert_reservation(&mut self, reservation: NewReservation) -> AppResult<Uuid>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}

pub struct PgReservationRepository {
    pool: PgPool,
}

impl PgReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for PgReservationRepository {
    async fn begin(&self) -> AppResult<Box<dyn BookingSession>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Persistence(format!("Error opening transaction: {}", e)))?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BOOKING_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Persistence(format!("Error acquiring booking lock: {}", e)))?;

        Ok(Box::new(PgBookingSession { tx }))
    }
}

pub struct PgBookingSession {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl BookingSession for PgBookingSession {
    async fn total_parking_spots(&mut self) -> AppResult<Option<i32>> {
        let value: Option<Value> = sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
            .bind(TOTAL_PARKING_SPOTS_KEY)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::Configuration(format!("Error fetching parking settings: {}", e)))?;

        Ok(value.as_ref().and_then(parse_capacity))
    }

    async fn occupancy_between(&mut self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<DailyOccupancy>> {
        sqlx::query_as::<_, DailyOccupancy>(
            r#"
            SELECT date, occupied_spots, updated_at
            FROM daily_occupancy
            WHERE date >= $1 AND date <= $2
            ORDER BY date
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| AppError::Persistence(format!("Error fetching daily occupancy: {}", e)))
    }

    async fn calculate_total_cost(
        &mut self,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> AppResult<Option<Decimal>> {
        sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT calculate_total_cost(p_check_in => $1, p_check_out => $2)",
        )
        .bind(check_in)
        .bind(check_out)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| AppError::Calculation(format!("Error calling calculate_total_cost: {}", e)))
    }

    async fn insert_reservation(&mut self, reservation: NewReservation) -> AppResult<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO reservations
                (last_name, first_name, email, phone, license_plate,
                 planned_check_in, planned_check_out, source, total_cost,
                 created_by, last_modified_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(reservation.last_name)
        .bind(reservation.first_name)
        .bind(reservation.email)
        .bind(reservation.phone)
        .bind(reservation.license_plate)
        .bind(reservation.planned_check_in)
        .bind(reservation.planned_check_out)
        .bind(reservation.source)
        .bind(reservation.total_cost)
        .bind(reservation.created_by)
        .bind(reservation.last_modified_by)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| AppError::Persistence(format!("Failed to create reservation: {}", e)))
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| AppError::Persistence(format!("Error committing reservation: {}", e)))
    }
}
