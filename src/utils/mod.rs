//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y comparación segura de secretos.

pub mod errors;
pub mod security;
pub mod validation;
