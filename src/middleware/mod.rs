//! Middleware del sistema
//!
//! Este módulo contiene el middleware de API key, CORS y rate limiting.

pub mod api_key;
pub mod cors;
pub mod rate_limit;

pub use api_key::*;
pub use cors::*;
pub use rate_limit::*;
