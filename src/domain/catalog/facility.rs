//! Facility and practitioner descriptors.

use serde::{Deserialize, Serialize};

use super::selection::Named;

/// A clinic or hospital that accepts appointments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl Facility {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }
}

impl Named for Facility {
    fn display_name(&self) -> &str {
        &self.name
    }
}

/// A doctor attached to exactly one facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Practitioner {
    pub id: String,
    pub name: String,
    pub phone: String,
}

impl Practitioner {
    pub fn new(id: impl Into<String>, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
        }
    }
}

impl Named for Practitioner {
    fn display_name(&self) -> &str {
        &self.name
    }
}
