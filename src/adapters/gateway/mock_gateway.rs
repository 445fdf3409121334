//! Mock Clinic Gateway for testing.
//!
//! Provides a scriptable implementation of the ClinicGateway port so dialogue
//! tests run without the booking, queue and billing services.
//!
//! # Features
//!
//! - Scripted replies consumed in order
//! - Simulated delays for timeout testing
//! - Error injection for failure paths
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let gateway = MockClinicGateway::new()
//!     .with_error(MockError::Timeout { timeout_secs: 10 })
//!     .with_ticket(MockClinicGateway::sample_ticket(QueueType::Service, 7));
//!
//! assert!(gateway.queue_reissue(QueueType::Service, None).await.is_err());
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::records::{
    Appointment, AppointmentRequest, AppointmentStatus, Bill, CheckInRequest, PatientInfo,
    QueueType, Ticket, TicketStatus,
};
use crate::ports::{AccessToken, ClinicGateway, GatewayError};

/// Mock clinic gateway for testing.
#[derive(Debug, Clone)]
pub struct MockClinicGateway {
    /// Pre-configured replies (consumed in order, across all operations).
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<GatewayCall>>>,
}

/// A configured mock reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Appointment(Appointment),
    Appointments(Vec<Appointment>),
    Ticket(Ticket),
    Bill(Bill),
    Error(MockError),
}

/// Mock error types for failure-path tests.
#[derive(Debug, Clone)]
pub enum MockError {
    Timeout { timeout_secs: u64 },
    Rejected { status: u16, message: String },
    Unauthorized,
    NotFound { message: String },
    Network { message: String },
    Malformed { message: String },
}

impl From<MockError> for GatewayError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Timeout { timeout_secs } => GatewayError::timeout(timeout_secs),
            MockError::Rejected { status, message } => {
                GatewayError::rejected(status, message, None)
            }
            MockError::Unauthorized => GatewayError::Unauthorized,
            MockError::NotFound { message } => GatewayError::not_found(message),
            MockError::Network { message } => GatewayError::connectivity(message),
            MockError::Malformed { message } => GatewayError::decode(message),
        }
    }
}

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    CreateAppointment {
        request: AppointmentRequest,
        authenticated: bool,
    },
    ListAppointments {
        authenticated: bool,
    },
    CheckIn {
        request: CheckInRequest,
        authenticated: bool,
    },
    Status {
        queue_type: QueueType,
        authenticated: bool,
    },
    Reissue {
        queue_type: QueueType,
        authenticated: bool,
    },
    LatestBill {
        authenticated: bool,
    },
}

impl Default for MockClinicGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClinicGateway {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_appointment(self, appointment: Appointment) -> Self {
        self.with_reply(MockReply::Appointment(appointment))
    }

    pub fn with_appointments(self, appointments: Vec<Appointment>) -> Self {
        self.with_reply(MockReply::Appointments(appointments))
    }

    pub fn with_ticket(self, ticket: Ticket) -> Self {
        self.with_reply(MockReply::Ticket(ticket))
    }

    pub fn with_bill(self, bill: Bill) -> Self {
        self.with_reply(MockReply::Bill(bill))
    }

    pub fn with_error(self, error: MockError) -> Self {
        self.with_reply(MockReply::Error(error))
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// A waiting ticket in `queue_type` with the given number.
    pub fn sample_ticket(queue_type: QueueType, number: u32) -> Ticket {
        Ticket {
            ticket_code: format!("{}-20250115-{:03}", queue_type.code(), number),
            ticket_number: number,
            queue_type,
            visit_date: "2025-01-15".to_string(),
            ticket_status: TicketStatus::Waiting,
            current_number: number.saturating_sub(3),
            waiting_before: number.min(3),
            estimated_wait_minutes: number.min(3) * 5,
            issued_at: "2025-01-15T01:30:00Z".to_string(),
            called_at: None,
            patient_info: PatientInfo {
                full_name: "Nguyễn Văn A".to_string(),
                phone_number: "0912345678".to_string(),
                national_id: None,
            },
        }
    }

    async fn next_reply(&self, call: GatewayCall) -> Option<MockReply> {
        self.calls.lock().unwrap().push(call);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.replies.lock().unwrap().pop_front()
    }

    fn mismatch(operation: &str, reply: &MockReply) -> GatewayError {
        GatewayError::decode(format!(
            "scripted reply {:?} does not fit {}",
            std::mem::discriminant(reply),
            operation
        ))
    }
}

#[async_trait]
impl ClinicGateway for MockClinicGateway {
    async fn create_appointment(
        &self,
        request: &AppointmentRequest,
        token: Option<&AccessToken>,
    ) -> Result<Appointment, GatewayError> {
        let call = GatewayCall::CreateAppointment {
            request: request.clone(),
            authenticated: token.is_some(),
        };
        match self.next_reply(call).await {
            None => {
                let id = format!("APPT-{:04}", self.call_count());
                Ok(Appointment::from_request(
                    request,
                    id,
                    AppointmentStatus::Pending,
                ))
            }
            Some(MockReply::Appointment(appointment)) => Ok(appointment),
            Some(MockReply::Error(err)) => Err(err.into()),
            Some(other) => Err(Self::mismatch("create_appointment", &other)),
        }
    }

    async fn list_appointments(
        &self,
        token: Option<&AccessToken>,
    ) -> Result<Vec<Appointment>, GatewayError> {
        let call = GatewayCall::ListAppointments {
            authenticated: token.is_some(),
        };
        match self.next_reply(call).await {
            None => Ok(Vec::new()),
            Some(MockReply::Appointments(appointments)) => Ok(appointments),
            Some(MockReply::Error(err)) => Err(err.into()),
            Some(other) => Err(Self::mismatch("list_appointments", &other)),
        }
    }

    async fn queue_check_in(
        &self,
        request: &CheckInRequest,
        token: Option<&AccessToken>,
    ) -> Result<Ticket, GatewayError> {
        let call = GatewayCall::CheckIn {
            request: request.clone(),
            authenticated: token.is_some(),
        };
        match self.next_reply(call).await {
            None => {
                let mut ticket = Self::sample_ticket(request.queue_type, 7);
                ticket.patient_info = PatientInfo {
                    full_name: request.full_name.clone(),
                    phone_number: request.phone_number.clone(),
                    national_id: request.national_id.clone(),
                };
                Ok(ticket)
            }
            Some(MockReply::Ticket(ticket)) => Ok(ticket),
            Some(MockReply::Error(err)) => Err(err.into()),
            Some(other) => Err(Self::mismatch("queue_check_in", &other)),
        }
    }

    async fn queue_status(
        &self,
        queue_type: QueueType,
        token: Option<&AccessToken>,
    ) -> Result<Ticket, GatewayError> {
        let call = GatewayCall::Status {
            queue_type,
            authenticated: token.is_some(),
        };
        match self.next_reply(call).await {
            None => Ok(Self::sample_ticket(queue_type, 7)),
            Some(MockReply::Ticket(ticket)) => Ok(ticket),
            Some(MockReply::Error(err)) => Err(err.into()),
            Some(other) => Err(Self::mismatch("queue_status", &other)),
        }
    }

    async fn queue_reissue(
        &self,
        queue_type: QueueType,
        token: Option<&AccessToken>,
    ) -> Result<Ticket, GatewayError> {
        let call = GatewayCall::Reissue {
            queue_type,
            authenticated: token.is_some(),
        };
        match self.next_reply(call).await {
            None => Ok(Self::sample_ticket(queue_type, 8)),
            Some(MockReply::Ticket(ticket)) => Ok(ticket),
            Some(MockReply::Error(err)) => Err(err.into()),
            Some(other) => Err(Self::mismatch("queue_reissue", &other)),
        }
    }

    async fn latest_bill(&self, token: Option<&AccessToken>) -> Result<Bill, GatewayError> {
        let call = GatewayCall::LatestBill {
            authenticated: token.is_some(),
        };
        match self.next_reply(call).await {
            None => Err(GatewayError::not_found("Không tìm thấy hóa đơn")),
            Some(MockReply::Bill(bill)) => Ok(bill),
            Some(MockReply::Error(err)) => Err(err.into()),
            Some(other) => Err(Self::mismatch("latest_bill", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::TimeSlot;
    use chrono::NaiveDate;

    fn booking() -> AppointmentRequest {
        AppointmentRequest {
            facility_id: "H001".to_string(),
            practitioner_id: "DOC001".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            time: TimeSlot::from_hm(8, 0).unwrap(),
            patient_name: "Nguyễn Văn A".to_string(),
            patient_phone: "0912345678".to_string(),
            patient_email: "a@example.com".to_string(),
            symptoms: None,
        }
    }

    #[tokio::test]
    async fn unscripted_booking_echoes_request() {
        let gateway = MockClinicGateway::new();
        let appointment = gateway.create_appointment(&booking(), None).await.unwrap();

        assert_eq!(appointment.appointment_id, "APPT-0001");
        assert_eq!(appointment.date, "2025-01-20");
        assert_eq!(appointment.time, "08:00");
        assert_eq!(appointment.status, AppointmentStatus::Pending);
    }

    #[tokio::test]
    async fn scripted_replies_are_consumed_in_order() {
        let gateway = MockClinicGateway::new()
            .with_error(MockError::Timeout { timeout_secs: 10 })
            .with_ticket(MockClinicGateway::sample_ticket(QueueType::Insurance, 12));

        let first = gateway.queue_reissue(QueueType::Insurance, None).await;
        assert_eq!(first, Err(GatewayError::timeout(10)));

        let second = gateway.queue_reissue(QueueType::Insurance, None).await.unwrap();
        assert_eq!(second.ticket_code, "BHYT-20250115-012");
    }

    #[tokio::test]
    async fn records_calls_without_exposing_tokens() {
        let gateway = MockClinicGateway::new();
        let token = AccessToken::new("t");
        let _ = gateway.queue_status(QueueType::Service, Some(&token)).await;
        let _ = gateway.latest_bill(None).await;

        assert_eq!(
            gateway.get_calls(),
            vec![
                GatewayCall::Status {
                    queue_type: QueueType::Service,
                    authenticated: true
                },
                GatewayCall::LatestBill {
                    authenticated: false
                },
            ]
        );
    }

    #[tokio::test]
    async fn mismatched_script_is_a_decode_error() {
        let gateway =
            MockClinicGateway::new().with_ticket(MockClinicGateway::sample_ticket(QueueType::Service, 1));
        let result = gateway.latest_bill(None).await;
        assert!(matches!(result, Err(GatewayError::Decode(_))));
    }

    #[tokio::test]
    async fn check_in_default_carries_patient_details() {
        let gateway = MockClinicGateway::new();
        let request = CheckInRequest {
            full_name: "Trần Thị B".to_string(),
            phone_number: "0987654321".to_string(),
            national_id: Some("079123456789".to_string()),
            queue_type: QueueType::Service,
        };
        let ticket = gateway.queue_check_in(&request, None).await.unwrap();
        assert_eq!(ticket.patient_info.full_name, "Trần Thị B");
        assert_eq!(ticket.patient_info.national_id.as_deref(), Some("079123456789"));
    }
}
