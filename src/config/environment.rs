//! Configuración de variables de entorno
//!
//! Este módulo carga la configuración del servicio desde el entorno.
//! Las variables opcionales tienen valores por defecto; las obligatorias
//! (`API_SECRET_KEY`, `EXTERNAL_ACTOR_ID`) producen un `ConfigError`.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

/// Errores de carga de configuración
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Secreto compartido que deben enviar los clientes externos en `x-api-key`
    pub api_secret_key: String,
    /// Usuario que figura como `created_by` / `last_modified_by` en las reservas externas
    pub external_actor_id: Uuid,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window_ms: u64,
    pub rate_limit_prune_interval_secs: u64,
    pub store_timeout_ms: u64,
}

impl EnvironmentConfig {
    /// Cargar la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: var_or("ENVIRONMENT", "development"),
            host: var_or("HOST", "0.0.0.0"),
            port: parse_or("PORT", 3000)?,
            log_level: var_or("LOG_LEVEL", "info"),
            api_secret_key: required("API_SECRET_KEY")?,
            external_actor_id: parse_required("EXTERNAL_ACTOR_ID")?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            rate_limit_requests: parse_or("RATE_LIMIT_REQUESTS", 10)?,
            rate_limit_window_ms: parse_or("RATE_LIMIT_WINDOW_MS", 60_000)?,
            rate_limit_prune_interval_secs: parse_or("RATE_LIMIT_PRUNE_INTERVAL_SECS", 60)?,
            store_timeout_ms: parse_or("STORE_TIMEOUT_MS", 5_000)?,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_millis(self.rate_limit_window_ms)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Intervalo de limpieza del rate limiter; `None` si está deshabilitada
    pub fn rate_limit_prune_interval(&self) -> Option<Duration> {
        match self.rate_limit_prune_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

fn var_or(name: &'static str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

pub(crate) fn parse_value<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

pub(crate) fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => parse_value(name, value),
        Err(_) => Ok(default),
    }
}

fn parse_required<T: FromStr>(name: &'static str) -> Result<T, ConfigError> {
    parse_value(name, required(name)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        let port: u16 = parse_value("PORT", " 8080 ".to_string()).unwrap();
        assert_eq!(port, 8080);

        let err = parse_value::<u16>("PORT", "abc".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "PORT has an invalid value 'abc'");
    }

    #[test]
    fn test_prune_interval_zero_disables() {
        let mut config = EnvironmentConfig {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            api_secret_key: "secret".to_string(),
            external_actor_id: Uuid::nil(),
            cors_origins: vec![],
            rate_limit_requests: 10,
            rate_limit_window_ms: 60_000,
            rate_limit_prune_interval_secs: 0,
            store_timeout_ms: 5_000,
        };
        assert!(config.rate_limit_prune_interval().is_none());

        config.rate_limit_prune_interval_secs = 30;
        assert_eq!(config.rate_limit_prune_interval(), Some(Duration::from_secs(30)));
        assert_eq!(config.rate_limit_window(), Duration::from_secs(60));
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
    }
}
