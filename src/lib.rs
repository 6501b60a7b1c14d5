//! Backend de reservas de parking
//!
//! Endpoint público `POST /api/reservations/external` protegido por API key
//! y por un rate limiter de ventana fija para todas las rutas `/api/`.

pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use middleware::rate_limit::rate_limit_middleware;
use routes::reservation_routes::create_reservation_router;
use state::AppState;

/// Construir el router completo de la aplicación
pub fn create_app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/reservations", create_reservation_router(state.clone()))
        .layer(from_fn_with_state(state.rate_limit.clone(), rate_limit_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check, fuera de `/api/` y por tanto sin rate limiting
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
