//! Almacén de reservas en memoria
//!
//! Implementación de `ReservationStore` sin base de datos, usada en tests y
//! en desarrollo local. Reproduce los efectos que en PostgreSQL viven en el
//! propio almacén:
//! - la ocupación diaria se incrementa para cada fecha de la estancia
//!   insertada (inclusive la de salida),
//! - el precio se calcula por tramos de días con las `pricing_rules` activas.
//!
//! Una sesión retiene el mutex durante toda su vida y trabaja sobre una copia
//! de los datos que solo se publica en `commit`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::reservation_repository::{BookingSession, ReservationStore};
use crate::models::{
    setting::parse_capacity, DailyOccupancy, NewReservation, PricingRule, Reservation,
    TOTAL_PARKING_SPOTS_KEY,
};
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
struct MemoryData {
    settings: HashMap<String, Value>,
    occupancy: BTreeMap<NaiveDate, DailyOccupancy>,
    pricing_rules: Vec<PricingRule>,
    reservations: Vec<Reservation>,
    fail_inserts_with: Option<String>,
}

#[derive(Clone, Default)]
pub struct InMemoryReservationStore {
    data: Arc<Mutex<MemoryData>>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guardar la capacidad total del parking
    pub async fn set_total_parking_spots(&self, spots: i32) {
        self.set_setting(TOTAL_PARKING_SPOTS_KEY, Value::from(spots)).await;
    }

    pub async fn set_setting(&self, key: &str, value: Value) {
        self.data.lock().await.settings.insert(key.to_string(), value);
    }

    pub async fn set_occupancy(&self, date: NaiveDate, occupied_spots: i32) {
        self.data.lock().await.occupancy.insert(
            date,
            DailyOccupancy {
                date,
                occupied_spots,
                updated_at: Utc::now(),
            },
        );
    }

    pub async fn add_pricing_rule(&self, rule: PricingRule) {
        self.data.lock().await.pricing_rules.push(rule);
    }

    /// Hacer que las siguientes inserciones fallen con el mensaje dado
    pub async fn fail_inserts_with(&self, message: impl Into<String>) {
        self.data.lock().await.fail_inserts_with = Some(message.into());
    }

    pub async fn reservations(&self) -> Vec<Reservation> {
        self.data.lock().await.reservations.clone()
    }

    pub async fn occupancy(&self, date: NaiveDate) -> Option<i32> {
        self.data
            .lock()
            .await
            .occupancy
            .get(&date)
            .map(|day| day.occupied_spots)
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn begin(&self) -> AppResult<Box<dyn BookingSession>> {
        let guard = self.data.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryBookingSession { guard, working }))
    }
}

struct MemoryBookingSession {
    guard: OwnedMutexGuard<MemoryData>,
    working: MemoryData,
}

/// Número de días facturables: días iniciados, mínimo uno
fn billable_days(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i64 {
    let minutes = (check_out - check_in).num_minutes().max(0);
    let days = (minutes + 24 * 60 - 1) / (24 * 60);
    days.max(1)
}

#[async_trait]
impl BookingSession for MemoryBookingSession {
    async fn total_parking_spots(&mut self) -> AppResult<Option<i32>> {
        Ok(self
            .working
            .settings
            .get(TOTAL_PARKING_SPOTS_KEY)
            .and_then(parse_capacity))
    }

    async fn occupancy_between(&mut self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<DailyOccupancy>> {
        if from > to {
            return Ok(Vec::new());
        }
        Ok(self
            .working
            .occupancy
            .range(from..=to)
            .map(|(_, day)| day.clone())
            .collect())
    }

    async fn calculate_total_cost(
        &mut self,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> AppResult<Option<Decimal>> {
        let days = billable_days(check_in, check_out);
        Ok(self
            .working
            .pricing_rules
            .iter()
            .find(|rule| rule.covers(days))
            .map(|rule| rule.price_per_day * Decimal::from(days)))
    }

    async fn insert_reservation(&mut self, reservation: NewReservation) -> AppResult<Uuid> {
        if let Some(message) = &self.working.fail_inserts_with {
            return Err(AppError::Persistence(format!(
                "Failed to create reservation: {}",
                message
            )));
        }

        let now = Utc::now();
        let first_day = reservation.planned_check_in.date_naive();
        let last_day = reservation.planned_check_out.date_naive();
        for date in first_day.iter_days().take_while(|date| *date <= last_day) {
            let day = self.working.occupancy.entry(date).or_insert(DailyOccupancy {
                date,
                occupied_spots: 0,
                updated_at: now,
            });
            day.occupied_spots += 1;
            day.updated_at = now;
        }

        let id = Uuid::new_v4();
        self.working
            .reservations
            .push(reservation.into_reservation(id, now));
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryBookingSession { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
