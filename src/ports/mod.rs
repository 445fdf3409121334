//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the dialogue engine and the outside world. Adapters implement these ports.
//!
//! - `ClinicGateway` - Booking, queue and billing services
//! - `ReferenceData` - Facility, practitioner and time-slot catalogs
//! - `Clock` - Current time, injectable for tests

mod clinic_gateway;
mod clock;
mod reference_data;

pub use clinic_gateway::{AccessToken, ClinicGateway, GatewayError};
pub use clock::Clock;
pub use reference_data::ReferenceData;
