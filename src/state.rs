//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::{RateLimitConfig, RateLimitState};
use crate::repositories::ReservationStore;
use crate::services::ReservationService;

#[derive(Clone)]
pub struct AppState {
    api_secret_key: Arc<str>,
    pub reservation_service: Arc<ReservationService>,
    pub rate_limit: RateLimitState,
}

impl AppState {
    pub fn new(config: &EnvironmentConfig, store: Arc<dyn ReservationStore>) -> Self {
        let reservation_service =
            ReservationService::new(store, config.external_actor_id, config.store_timeout());
        let rate_limit = RateLimitState::new(RateLimitConfig {
            window: config.rate_limit_window(),
            max_requests: config.rate_limit_requests,
        });

        Self::from_parts(&config.api_secret_key, reservation_service, rate_limit)
    }

    pub fn from_parts(
        api_secret_key: &str,
        reservation_service: ReservationService,
        rate_limit: RateLimitState,
    ) -> Self {
        Self {
            api_secret_key: Arc::from(api_secret_key),
            reservation_service: Arc::new(reservation_service),
            rate_limit,
        }
    }

    pub fn api_secret_key(&self) -> &str {
        &self.api_secret_key
    }
}
