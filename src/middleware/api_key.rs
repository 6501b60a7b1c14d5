//! Middleware de autenticación por API key
//!
//! Las integraciones externas envían el secreto compartido en la cabecera
//! `x-api-key`. La comparación se hace en tiempo constante y antes de leer
//! el cuerpo de la petición.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    state::AppState,
    utils::{errors::AppError, security::constant_time_eq},
};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Verificar la API key de una petición
pub fn verify_api_key(provided: Option<&str>, expected: &str) -> Result<(), AppError> {
    match provided {
        Some(key) if constant_time_eq(key, expected) => Ok(()),
        Some(_) => Err(AppError::Authentication("invalid API key".to_string())),
        None => Err(AppError::Authentication("missing API key".to_string())),
    }
}

/// Middleware que exige una API key válida
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Err(e) = verify_api_key(provided, state.api_secret_key()) {
        tracing::warn!("🔒 Petición rechazada en {}: {}", request.uri().path(), e);
        return Err(e);
    }

    Ok(next.run(request).await)
}
