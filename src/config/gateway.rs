//! Clinic service endpoints

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Base URLs of the appointment, queue and billing services.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub appointment_base_url: String,

    pub queue_base_url: String,

    pub billing_base_url: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate gateway configuration
    ///
    /// Production deployments must reach every service over HTTPS.
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        let urls = [
            ("gateway.appointment_base_url", &self.appointment_base_url),
            ("gateway.queue_base_url", &self.queue_base_url),
            ("gateway.billing_base_url", &self.billing_base_url),
        ];

        for (name, url) in urls {
            if url.trim().is_empty() {
                return Err(ValidationError::MissingRequired(name));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidUrl(name));
            }
            if production && !url.starts_with("https://") {
                return Err(ValidationError::UrlMustBeHttps(name));
            }
        }

        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidGatewayTimeout);
        }

        Ok(())
    }
}

fn default_timeout() -> u64 {
    10
}
