//! Utilidades de validación
//!
//! Funciones helper para validación de datos y conversión de tipos
//! usadas por los DTOs de entrada.

use chrono::{DateTime, NaiveDateTime, Utc};
use validator::ValidationError;

/// Formato aceptado: UTC con separador `T` y sufijo `Z`, fracción opcional
const UTC_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Validar y convertir un datetime ISO-8601 en UTC (`2024-06-01T10:00:00Z`).
///
/// Se rechazan offsets distintos de `Z`, el separador espacio y los
/// espacios alrededor del valor.
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let is_utc_shape = value.len() >= 20
        && value.as_bytes()[10] == b'T'
        && value.ends_with('Z')
        && !value.chars().any(char::is_whitespace);

    is_utc_shape
        .then(|| NaiveDateTime::parse_from_str(value, UTC_DATETIME_FORMAT).ok())
        .flatten()
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &UTC_DATETIME_FORMAT.to_string());
            error
        })
}

/// Validar que la salida sea estrictamente posterior a la entrada
pub fn validate_stay_window(
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if check_out <= check_in {
        let mut error = ValidationError::new("check_out_before_check_in");
        error.add_param("check_in".into(), &check_in.to_rfc3339());
        error.add_param("check_out".into(), &check_out.to_rfc3339());
        return Err(error);
    }
    Ok(())
}
