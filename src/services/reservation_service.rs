//! Servicio de reservas externas
//!
//! Flujo de alta de una reserva que llega desde la web pública:
//! validación → disponibilidad → precio → inserción. Los tres últimos pasos
//! se ejecutan en una misma `BookingSession`, con un timeout global y sin
//! reintentos: cualquier fallo aborta la petición completa.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::dto::reservation_dto::{CreateExternalReservationRequest, ReservationCommand};
use crate::models::{NewReservation, ReservationSource};
use crate::repositories::{BookingSession, ReservationStore};
use crate::utils::errors::{AppError, AppResult};

pub struct ReservationService {
    store: Arc<dyn ReservationStore>,
    actor_id: Uuid,
    timeout: Duration,
}

impl ReservationService {
    pub fn new(store: Arc<dyn ReservationStore>, actor_id: Uuid, timeout: Duration) -> Self {
        Self {
            store,
            actor_id,
            timeout,
        }
    }

    /// Crear una reserva desde una fuente externa y devolver su id
    pub async fn create_external_reservation(
        &self,
        request: CreateExternalReservationRequest,
    ) -> AppResult<Uuid> {
        let command = request.into_command()?;

        tokio::time::timeout(self.timeout, self.book(command))
            .await
            .map_err(|_| {
                AppError::Timeout(format!(
                    "reservation flow exceeded {} ms",
                    self.timeout.as_millis()
                ))
            })?
    }

    async fn book(&self, command: ReservationCommand) -> AppResult<Uuid> {
        let mut session = self.store.begin().await?;

        let (first_day, last_day) = command.stay_dates();
        check_availability(session.as_mut(), first_day, last_day).await?;

        let total_cost = calculate_cost(session.as_mut(), command.check_in, command.check_out).await?;

        let reservation_id =
            create_reservation(session.as_mut(), build_reservation(command, total_cost, self.actor_id)).await?;

        session.commit().await?;

        tracing::info!(
            "✅ Reserva externa creada: {} ({} - {}, total {})",
            reservation_id,
            first_day,
            last_day,
            total_cost
        );
        Ok(reservation_id)
    }
}

/// Comprobar que hay plazas libres en todas las fechas de `[first_day, last_day]`.
///
/// Las fechas sin fila de ocupación se consideran disponibles.
pub async fn check_availability(
    session: &mut dyn BookingSession,
    first_day: NaiveDate,
    last_day: NaiveDate,
) -> AppResult<()> {
    let total_spots = session
        .total_parking_spots()
        .await?
        .ok_or_else(|| AppError::Configuration("Failed to fetch parking settings".to_string()))?;

    let occupancy = session.occupancy_between(first_day, last_day).await?;

    if let Some(full_day) = occupancy.iter().find(|day| day.is_full(total_spots)) {
        tracing::info!(
            "🅿️ Sin plazas para {} ({} / {})",
            full_day.date,
            full_day.occupied_spots,
            total_spots
        );
        return Err(AppError::Availability { date: full_day.date });
    }

    Ok(())
}

/// Calcular el precio total con la función de precios del almacén.
///
/// Un resultado vacío o igual a cero no es un precio válido.
pub async fn calculate_cost(
    session: &mut dyn BookingSession,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
) -> AppResult<Decimal> {
    session
        .calculate_total_cost(check_in, check_out)
        .await?
        .filter(|cost| !cost.is_zero())
        .ok_or_else(|| AppError::Calculation("Failed to calculate reservation cost".to_string()))
}

/// Insertar la reserva ya validada y con precio
pub async fn create_reservation(
    session: &mut dyn BookingSession,
    reservation: NewReservation,
) -> AppResult<Uuid> {
    session.insert_reservation(reservation).await
}

/// Mapear el comando externo a la fila de `reservations`
pub fn build_reservation(command: ReservationCommand, total_cost: Decimal, actor_id: Uuid) -> NewReservation {
    NewReservation {
        last_name: command.last_name,
        first_name: Some(command.first_name),
        email: Some(command.email),
        phone: Some(command.phone),
        license_plate: Some(command.license_plate),
        planned_check_in: command.check_in,
        planned_check_out: command.check_out,
        source: ReservationSource::Api,
        total_cost,
        created_by: actor_id,
        last_modified_by: actor_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PricingRule, ReservationStatus};
    use crate::repositories::InMemoryReservationStore;
    use serde_json::json;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn request(check_in: &str, check_out: &str) -> CreateExternalReservationRequest {
        serde_json::from_value(json!({
            "lastName": "Kowalski",
            "firstName": "Jan",
            "email": "jan@example.com",
            "phone": "600700800",
            "licensePlate": "WA 12345",
            "checkInDate": check_in,
            "checkOutDate": check_out,
        }))
        .unwrap()
    }

    async fn store_with_capacity(spots: i32) -> InMemoryReservationStore {
        let store = InMemoryReservationStore::new();
        store.set_total_parking_spots(spots).await;
        store.add_pricing_rule(PricingRule::new(1, 30, Decimal::new(40, 0))).await;
        store
    }

    fn service(store: &InMemoryReservationStore) -> ReservationService {
        ReservationService::new(Arc::new(store.clone()), Uuid::nil(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_full_day_in_range_is_rejected() {
        let store = store_with_capacity(5).await;
        store.set_occupancy(d(2), 5).await;

        let result = service(&store)
            .create_external_reservation(request("2024-06-01T10:00:00Z", "2024-06-03T10:00:00Z"))
            .await;

        match result {
            Err(AppError::Availability { date }) => assert_eq!(date, d(2)),
            other => panic!("expected availability error, got {:?}", other),
        }
        assert!(store.reservations().await.is_empty());
    }

    #[tokio::test]
    async fn test_first_full_day_is_reported() {
        let store = store_with_capacity(5).await;
        store.set_occupancy(d(3), 7).await;
        store.set_occupancy(d(2), 5).await;

        let result = service(&store)
            .create_external_reservation(request("2024-06-01T10:00:00Z", "2024-06-04T10:00:00Z"))
            .await;

        assert!(matches!(result, Err(AppError::Availability { date }) if date == d(2)));
    }

    #[tokio::test]
    async fn test_checkout_day_is_checked() {
        let store = store_with_capacity(5).await;
        store.set_occupancy(d(3), 5).await;

        // Salida a primera hora del día 3: también cuenta la ocupación del día 3
        let result = service(&store)
            .create_external_reservation(request("2024-06-01T10:00:00Z", "2024-06-03T00:30:00Z"))
            .await;

        assert!(matches!(result, Err(AppError::Availability { date }) if date == d(3)));
    }

    #[tokio::test]
    async fn test_days_outside_range_are_ignored() {
        let store = store_with_capacity(5).await;
        store.set_occupancy(d(4), 5).await;
        store.set_occupancy(d(2), 4).await;

        let result = service(&store)
            .create_external_reservation(request("2024-06-01T10:00:00Z", "2024-06-03T10:00:00Z"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_successful_reservation() {
        let store = store_with_capacity(5).await;

        let id = service(&store)
            .create_external_reservation(request("2024-06-01T10:00:00Z", "2024-06-04T10:00:00Z"))
            .await
            .unwrap();

        assert!(!id.is_nil());
        let reservations = store.reservations().await;
        assert_eq!(reservations.len(), 1);

        let reservation = &reservations[0];
        assert_eq!(reservation.id, id);
        assert_eq!(reservation.source, ReservationSource::Api);
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_eq!(reservation.total_cost, Decimal::new(120, 0));
        assert_eq!(reservation.last_name, "Kowalski");
        assert_eq!(reservation.first_name.as_deref(), Some("Jan"));
        assert_eq!(reservation.license_plate.as_deref(), Some("WA 12345"));
        assert!(reservation.has_valid_planned_window());
    }

    #[tokio::test]
    async fn test_validation_error_touches_nothing() {
        let store = store_with_capacity(5).await;

        let result = service(&store)
            .create_external_reservation(request("2024-06-03T10:00:00Z", "2024-06-01T10:00:00Z"))
            .await;

        match result {
            Err(AppError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("checkOutDate"))
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store.reservations().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_capacity_is_configuration_error() {
        let store = InMemoryReservationStore::new();
        store.add_pricing_rule(PricingRule::new(1, 30, Decimal::new(40, 0))).await;

        let result = service(&store)
            .create_external_reservation(request("2024-06-01T10:00:00Z", "2024-06-03T10:00:00Z"))
            .await;

        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_missing_price_is_calculation_error() {
        let store = InMemoryReservationStore::new();
        store.set_total_parking_spots(5).await;

        let result = service(&store)
            .create_external_reservation(request("2024-06-01T10:00:00Z", "2024-06-03T10:00:00Z"))
            .await;

        assert!(matches!(result, Err(AppError::Calculation(_))));
        assert!(store.reservations().await.is_empty());
    }

    #[tokio::test]
    async fn test_zero_price_is_calculation_error() {
        let store = InMemoryReservationStore::new();
        store.set_total_parking_spots(5).await;
        store.add_pricing_rule(PricingRule::new(1, 30, Decimal::ZERO)).await;

        let result = service(&store)
            .create_external_reservation(request("2024-06-01T10:00:00Z", "2024-06-03T10:00:00Z"))
            .await;

        assert!(matches!(result, Err(AppError::Calculation(_))));
        assert!(store.reservations().await.is_empty());
    }

    #[tokio::test]
    async fn test_insert_failure_is_persistence_error() {
        let store = store_with_capacity(5).await;
        store.fail_inserts_with("duplicate key value").await;

        let result = service(&store)
            .create_external_reservation(request("2024-06-01T10:00:00Z", "2024-06-03T10:00:00Z"))
            .await;

        match result {
            Err(AppError::Persistence(message)) => {
                assert_eq!(message, "Failed to create reservation: duplicate key value")
            }
            other => panic!("expected persistence error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_bookings_respect_capacity() {
        let store = store_with_capacity(1).await;
        let service = Arc::new(service(&store));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .create_external_reservation(request("2024-06-10T10:00:00Z", "2024-06-12T10:00:00Z"))
                    .await
            }));
        }

        let mut created = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::Availability { .. }) => rejected += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(rejected, 3);
        assert_eq!(store.occupancy(d(10)).await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_flow_times_out() {
        let store = store_with_capacity(5).await;
        let service = ReservationService::new(Arc::new(store.clone()), Uuid::nil(), Duration::from_millis(100));

        // Otra sesión retiene el almacén más allá del timeout
        let _blocking_session = store.begin().await.unwrap();

        let result = service
            .create_external_reservation(request("2024-06-01T10:00:00Z", "2024-06-03T10:00:00Z"))
            .await;

        assert!(matches!(result, Err(AppError::Timeout(_))));
    }
}
