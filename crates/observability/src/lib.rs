//! `fleetdesk-observability` — logging/tracing setup for FleetDesk services.

pub mod tracing;

pub use tracing::init;
