//! Appointment records exchanged with the booking service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::TimeSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Chờ xác nhận",
            AppointmentStatus::Confirmed => "Đã xác nhận",
            AppointmentStatus::Cancelled => "Đã hủy",
            AppointmentStatus::Completed => "Đã hoàn thành",
        }
    }
}

/// Payload submitted when the appointment flow is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub facility_id: String,
    pub practitioner_id: String,
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
}

/// A booked appointment.
///
/// Listings from the booking service are loosely shaped, so everything except
/// the identifier tolerates absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(alias = "id")]
    pub appointment_id: String,
    #[serde(default, alias = "hospitalId")]
    pub facility_id: String,
    #[serde(default, alias = "doctorId")]
    pub practitioner_id: String,
    #[serde(default, alias = "appointmentDate")]
    pub date: String,
    #[serde(default, alias = "appointmentTime")]
    pub time: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub patient_phone: String,
    #[serde(default)]
    pub patient_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Builds the record for a freshly created appointment from what was submitted.
    pub fn from_request(
        request: &AppointmentRequest,
        appointment_id: impl Into<String>,
        status: AppointmentStatus,
    ) -> Self {
        Self {
            appointment_id: appointment_id.into(),
            facility_id: request.facility_id.clone(),
            practitioner_id: request.practitioner_id.clone(),
            date: request.date.format("%Y-%m-%d").to_string(),
            time: request.time.to_string(),
            patient_name: request.patient_name.clone(),
            patient_phone: request.patient_phone.clone(),
            patient_email: request.patient_email.clone(),
            symptoms: request.symptoms.clone(),
            status,
        }
    }
}
