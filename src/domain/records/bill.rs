//! Hospital bill returned by the billing service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BilledService {
    #[serde(default)]
    pub service_id: Option<String>,
    pub service_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
}

/// The most recent bill for the signed-in patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub visit_id: String,
    pub visit_date: String,
    #[serde(alias = "hospitalName")]
    pub facility_name: String,
    #[serde(default)]
    pub services: Vec<BilledService>,
    pub total_base_price: f64,
    pub total_insurance_covered: f64,
    pub total_patient_pay: f64,
    #[serde(default)]
    pub insurance_type: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}
