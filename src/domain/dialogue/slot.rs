//! Field and flow identifiers used by the dialogue engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value the engine can be waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotField {
    Facility,
    Practitioner,
    Date,
    Time,
    PatientName,
    Phone,
    Email,
    Symptoms,
    FullName,
    NationalId,
    QueueType,
    /// Explicit go-ahead at a confirm or retry boundary.
    Confirmation,
}

impl SlotField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotField::Facility => "facility",
            SlotField::Practitioner => "practitioner",
            SlotField::Date => "date",
            SlotField::Time => "time",
            SlotField::PatientName => "patient_name",
            SlotField::Phone => "phone",
            SlotField::Email => "email",
            SlotField::Symptoms => "symptoms",
            SlotField::FullName => "full_name",
            SlotField::NationalId => "national_id",
            SlotField::QueueType => "queue_type",
            SlotField::Confirmation => "confirmation",
        }
    }
}

impl fmt::Display for SlotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The tasks a user can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Appointment,
    CheckIn,
    QueueStatus,
    Reissue,
    Billing,
    AppointmentList,
}

impl FlowKind {
    /// Multi-turn flows keep state in the context; lookups finish in one turn.
    pub fn is_stateful(&self) -> bool {
        matches!(
            self,
            FlowKind::Appointment | FlowKind::CheckIn | FlowKind::QueueStatus | FlowKind::Reissue
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Appointment => "appointment",
            FlowKind::CheckIn => "check_in",
            FlowKind::QueueStatus => "queue_status",
            FlowKind::Reissue => "reissue",
            FlowKind::Billing => "billing",
            FlowKind::AppointmentList => "appointment_list",
        }
    }

    /// Short user-facing description, used when asking the user to pick.
    pub fn label(&self) -> &'static str {
        match self {
            FlowKind::Appointment => "Đặt lịch khám",
            FlowKind::CheckIn => "Check-in & lấy số",
            FlowKind::QueueStatus => "Xem trạng thái số",
            FlowKind::Reissue => "Cấp lại số",
            FlowKind::Billing => "Xem viện phí",
            FlowKind::AppointmentList => "Xem lịch hẹn",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_not_stateful() {
        assert!(!FlowKind::Billing.is_stateful());
        assert!(!FlowKind::AppointmentList.is_stateful());
        assert!(FlowKind::CheckIn.is_stateful());
    }

    #[test]
    fn serde_names_match_display() {
        for field in [SlotField::PatientName, SlotField::QueueType, SlotField::Confirmation] {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field));
        }
        let json = serde_json::to_string(&FlowKind::QueueStatus).unwrap();
        assert_eq!(json, "\"queue_status\"");
    }
}
