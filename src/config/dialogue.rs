//! Dialogue engine tuning

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::dialogue::{
    DialogueSettings, DEFAULT_CONTEXT_TTL_SECS, DEFAULT_UTC_OFFSET_MINUTES,
};

#[derive(Debug, Clone, Deserialize)]
pub struct DialogueConfig {
    /// Idle time after which an in-progress flow is dropped
    #[serde(default = "default_context_ttl")]
    pub context_ttl_secs: u64,

    /// Clinic's local time zone, used for "today" and for rendering dates
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
}

impl DialogueConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.context_ttl_secs == 0 || self.context_ttl_secs > i64::MAX as u64 / 1000 {
            return Err(ValidationError::InvalidContextTtl);
        }
        if !(-720..=840).contains(&self.utc_offset_minutes) {
            return Err(ValidationError::InvalidUtcOffset);
        }
        Ok(())
    }

    /// Engine settings built from this section.
    pub fn settings(&self) -> Result<DialogueSettings, ValidationError> {
        self.validate()?;
        DialogueSettings::new(self.context_ttl_secs, self.utc_offset_minutes)
            .map_err(|_| ValidationError::InvalidUtcOffset)
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            context_ttl_secs: default_context_ttl(),
            utc_offset_minutes: default_utc_offset(),
        }
    }
}

fn default_context_ttl() -> u64 {
    DEFAULT_CONTEXT_TTL_SECS
}

fn default_utc_offset() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}
