//! Adapters - Implementations of port interfaces.
//!
//! - `catalog` - In-memory facility, practitioner and slot data
//! - `clock` - System and fixed clocks
//! - `gateway` - HTTP and mock clinic gateways
//! - `http` - Axum chat endpoint

pub mod catalog;
pub mod clock;
pub mod gateway;
pub mod http;

pub use catalog::StaticCatalog;
pub use clock::{FixedClock, SystemClock};
pub use gateway::{HttpClinicGateway, HttpGatewayConfig, MockClinicGateway};
