//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.
//!
//! Todas las respuestas de error comparten el sobre `{"error":{"message": ...}}`.
//! Los fallos internos (configuración, cálculo, persistencia, timeouts) se
//! registran con detalle pero responden con un mensaje genérico.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::middleware::rate_limit::RateLimitHeaders;

pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";
pub const FORBIDDEN_MESSAGE: &str = "Forbidden: Invalid or missing API key";
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again later";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {}", describe_validation_errors(.0))]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("No available parking spots for date {date}")]
    Availability { date: NaiveDate },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Calculation error: {0}")]
    Calculation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Rate limit exceeded")]
    RateLimited(RateLimitHeaders),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::FORBIDDEN,
            AppError::Availability { .. } => StatusCode::CONFLICT,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Configuration(_)
            | AppError::Calculation(_)
            | AppError::Persistence(_)
            | AppError::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensaje visible por el cliente
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(errors) => {
                format!("Invalid input: {}", describe_validation_errors(errors))
            }
            AppError::BadRequest(msg) => format!("Invalid input: {}", msg),
            AppError::Authentication(_) => FORBIDDEN_MESSAGE.to_string(),
            AppError::Availability { .. } => self.to_string(),
            AppError::RateLimited(_) => RATE_LIMIT_MESSAGE.to_string(),
            AppError::Configuration(_)
            | AppError::Calculation(_)
            | AppError::Persistence(_)
            | AppError::Timeout(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Cuerpo de error para la API
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorMessage {
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(ErrorResponse::new(self.public_message()))).into_response();
        if let AppError::RateLimited(headers) = &self {
            headers.apply(response.headers_mut());
        }
        response
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Resumen legible de los errores de validación, ordenado por campo
pub fn describe_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}
