//! Repositorios de acceso a datos

pub mod memory_repository;
pub mod reservation_repository;

pub use memory_repository::InMemoryReservationStore;
pub use reservation_repository::{BookingSession, PgReservationRepository, ReservationStore};
