//! Clinic gateway adapters.

mod http_gateway;
mod mock_gateway;

pub use http_gateway::{HttpClinicGateway, HttpGatewayConfig};
pub use mock_gateway::{GatewayCall, MockClinicGateway, MockError, MockReply};
