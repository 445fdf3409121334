//! Queue ticket records exchanged with the queue service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which counter a patient queues at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueType {
    /// Covered by national health insurance.
    #[serde(rename = "BHYT")]
    Insurance,
    /// Paid service counter.
    #[serde(rename = "DV")]
    Service,
}

impl QueueType {
    /// Wire code used by the queue service.
    pub fn code(&self) -> &'static str {
        match self {
            QueueType::Insurance => "BHYT",
            QueueType::Service => "DV",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "BHYT" => Some(QueueType::Insurance),
            "DV" => Some(QueueType::Service),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QueueType::Insurance => "BHYT",
            QueueType::Service => "Dịch vụ",
        }
    }
}

impl fmt::Display for QueueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Waiting,
    Calling,
    Done,
    Cancelled,
    Missed,
}

impl TicketStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Waiting => "🟡 Đang chờ",
            TicketStatus::Calling => "🟢 Đang gọi",
            TicketStatus::Done => "✅ Đã hoàn thành",
            TicketStatus::Cancelled => "❌ Đã hủy",
            TicketStatus::Missed => "⚠️ Đã bỏ lỡ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    pub full_name: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
}

/// A queue ticket as issued or reported by the queue service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub ticket_code: String,
    pub ticket_number: u32,
    pub queue_type: QueueType,
    pub visit_date: String,
    pub ticket_status: TicketStatus,
    pub current_number: u32,
    pub waiting_before: u32,
    pub estimated_wait_minutes: u32,
    pub issued_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub called_at: Option<String>,
    pub patient_info: PatientInfo,
}

/// Payload for a queue check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub full_name: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    pub queue_type: QueueType,
}
