//! Middleware de Rate Limiting
//!
//! Limitador de ventana fija por cliente para las rutas bajo `/api/`.
//!
//! `RateLimitState` se crea una sola vez al arrancar y vive en memoria del
//! proceso (sin persistencia ni distribución). Cada clave guarda
//! `{count, reset_at}`; la entrada se sustituye de forma perezosa cuando su
//! ventana expira. Sin la limpieza periódica (`prune_expired`) el mapa crece
//! con el número de direcciones distintas.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::utils::errors::AppError;

pub const API_PATH_PREFIX: &str = "/api/";

pub const HEADER_LIMIT: &str = "x-ratelimit-limit";
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RESET: &str = "x-ratelimit-reset";

/// Configuración del limitador
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(60_000),
            max_requests: 10,
        }
    }
}

/// Información de rate limiting por cliente
#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    count: u32,
    reset_at: Instant,
}

/// Cabeceras `X-RateLimit-*` que acompañan a la respuesta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitHeaders {
    pub limit: u32,
    pub remaining: u32,
    /// Segundos hasta el fin de la ventana, redondeados hacia arriba
    pub reset_secs: u64,
}

impl RateLimitHeaders {
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(HEADER_LIMIT, HeaderValue::from(self.limit));
        headers.insert(HEADER_REMAINING, HeaderValue::from(self.remaining));
        headers.insert(HEADER_RESET, HeaderValue::from(self.reset_secs));
    }
}

/// Resultado de comprobar una petición
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed(RateLimitHeaders),
    Limited(RateLimitHeaders),
}

/// Estado global del rate limiting
#[derive(Clone)]
pub struct RateLimitState {
    entries: Arc<RwLock<HashMap<String, RateLimitEntry>>>,
    config: RateLimitConfig,
}

impl RateLimitState {
    /// Crear nuevo estado de rate limiting
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Comprobar e incrementar el contador de una clave.
    ///
    /// Todo ocurre bajo el mismo lock de escritura, así que dos peticiones
    /// concurrentes de la misma clave no pueden perder incrementos.
    pub async fn check(&self, key: &str) -> RateLimitDecision {
        let mut entries = self.entries.write().await;
        let now = Instant::now();

        let entry = entries
            .entry(key.to_string())
            .and_modify(|entry| {
                if now > entry.reset_at {
                    *entry = self.fresh_entry(now);
                }
            })
            .or_insert_with(|| self.fresh_entry(now));

        let reset_secs = ceil_secs(entry.reset_at.saturating_duration_since(now));

        if entry.count >= self.config.max_requests {
            return RateLimitDecision::Limited(RateLimitHeaders {
                limit: self.config.max_requests,
                remaining: 0,
                reset_secs,
            });
        }

        entry.count += 1;
        RateLimitDecision::Allowed(RateLimitHeaders {
            limit: self.config.max_requests,
            remaining: self.config.max_requests - entry.count,
            reset_secs,
        })
    }

    /// Limpiar entradas cuya ventana ya expiró; devuelve cuántas se eliminaron
    pub async fn prune_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| now <= entry.reset_at);
        before - entries.len()
    }

    fn fresh_entry(&self, now: Instant) -> RateLimitEntry {
        RateLimitEntry {
            count: 0,
            reset_at: now + self.config.window,
        }
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

/// Extraer la clave del cliente: primer salto de `x-forwarded-for`,
/// luego la dirección del peer y por último "unknown"
pub fn client_key(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware de rate limiting
pub async fn rate_limit_middleware(
    State(rate_limit_state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Response {
    if !request.uri().path().starts_with(API_PATH_PREFIX) {
        return next.run(request).await;
    }

    let key = client_key(&request);

    match rate_limit_state.check(&key).await {
        RateLimitDecision::Limited(headers) => {
            tracing::warn!("🚦 Rate limit excedido para '{}'", key);
            AppError::RateLimited(headers).into_response()
        }
        RateLimitDecision::Allowed(headers) => {
            let mut response = next.run(request).await;
            headers.apply(response.headers_mut());
            response
        }
    }
}
