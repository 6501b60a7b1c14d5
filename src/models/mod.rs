//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL: tablas reservations, daily_occupancy, settings,
//! payments, pricing_rules y transfer_vehicles.

pub mod occupancy;
pub mod payment;
pub mod pricing_rule;
pub mod reservation;
pub mod setting;
pub mod transfer_vehicle;

pub use occupancy::DailyOccupancy;
pub use payment::{Payment, PaymentStatus};
pub use pricing_rule::PricingRule;
pub use reservation::{NewReservation, Reservation, ReservationSource, ReservationStatus};
pub use setting::{Setting, TOTAL_PARKING_SPOTS_KEY};
pub use transfer_vehicle::TransferVehicle;
