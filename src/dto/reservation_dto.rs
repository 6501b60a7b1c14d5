//! DTOs de reservas externas
//!
//! Contrato JSON en camelCase del endpoint público y su validación.
//! El resultado de validar es un `ReservationCommand` normalizado (UTC).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::utils::validation::{validate_datetime, validate_stay_window};

pub const RESERVATION_CREATED_MESSAGE: &str = "Reservation created successfully";

// Request de una reserva desde una fuente externa (web pública)
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateExternalReservationRequest {
    #[serde(rename = "lastName")]
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[serde(rename = "firstName")]
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 9, message = "Phone number must be at least 9 characters"))]
    pub phone: String,

    #[serde(rename = "licensePlate")]
    #[validate(length(min = 1, message = "License plate is required"))]
    pub license_plate: String,

    #[serde(rename = "checkInDate")]
    #[validate(custom = "validate_check_in_format")]
    pub check_in_date: String,

    #[serde(rename = "checkOutDate")]
    #[validate(custom = "validate_check_out_format")]
    pub check_out_date: String,
}

/// Comando validado y normalizado, listo para las reglas de negocio
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationCommand {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub license_plate: String,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

impl ReservationCommand {
    /// Fechas de calendario (UTC) de entrada y salida, ambas inclusivas
    pub fn stay_dates(&self) -> (NaiveDate, NaiveDate) {
        (self.check_in.date_naive(), self.check_out.date_naive())
    }
}

impl CreateExternalReservationRequest {
    /// Validar la request y convertirla en comando.
    ///
    /// El orden entrada/salida solo se comprueba si ambas fechas son
    /// válidas, y el error se asocia al campo `checkOutDate`.
    pub fn into_command(self) -> Result<ReservationCommand, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let (Ok(check_in), Ok(check_out)) = (
            validate_datetime(&self.check_in_date),
            validate_datetime(&self.check_out_date),
        ) {
            if let Err(mut error) = validate_stay_window(check_in, check_out) {
                error.message = Some("Check-out date must be after check-in date".into());
                errors.add("checkOutDate", error);
            }

            if errors.errors().is_empty() {
                return Ok(ReservationCommand {
                    last_name: self.last_name,
                    first_name: self.first_name,
                    email: self.email,
                    phone: self.phone,
                    license_plate: self.license_plate,
                    check_in,
                    check_out,
                });
            }
        }

        Err(errors)
    }
}

fn validate_check_in_format(value: &str) -> Result<(), ValidationError> {
    validate_datetime(value).map(|_| ()).map_err(|mut error| {
        error.message = Some("Invalid check-in date format".into());
        error
    })
}

fn validate_check_out_format(value: &str) -> Result<(), ValidationError> {
    validate_datetime(value).map(|_| ()).map_err(|mut error| {
        error.message = Some("Invalid check-out date format".into());
        error
    })
}

// Response de una reserva creada
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateExternalReservationResponse {
    #[serde(rename = "reservationId")]
    pub reservation_id: Uuid,
    pub message: String,
}

impl CreateExternalReservationResponse {
    pub fn created(reservation_id: Uuid) -> Self {
        Self {
            reservation_id,
            message: RESERVATION_CREATED_MESSAGE.to_string(),
        }
    }
}
