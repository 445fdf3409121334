//! One-shot lookups: latest bill and the user's appointments.
//!
//! Neither keeps state between turns; both need a signed-in user.

use std::sync::Arc;

use super::turn::{DialogueError, Turn};
use crate::domain::dialogue::{prompts, AppointmentView, ResponseFormatter};
use crate::ports::{ClinicGateway, GatewayError, ReferenceData};

/// Rejection messages the billing service uses when the user has no bill.
const NO_BILL_MARKERS: [&str; 2] = ["không tìm thấy", "chưa có dữ liệu"];

pub struct LookupFlow {
    gateway: Arc<dyn ClinicGateway>,
    catalog: Arc<dyn ReferenceData>,
    formatter: ResponseFormatter,
}

impl LookupFlow {
    pub fn new(
        gateway: Arc<dyn ClinicGateway>,
        catalog: Arc<dyn ReferenceData>,
        formatter: ResponseFormatter,
    ) -> Self {
        Self {
            gateway,
            catalog,
            formatter,
        }
    }

    pub async fn billing(&self, turn: &Turn<'_>) -> Result<String, DialogueError> {
        let Some(token) = turn.access_token else {
            return Ok(prompts::sign_in_required());
        };

        match self.gateway.latest_bill(Some(token)).await {
            Ok(bill) => Ok(self.formatter.bill(&bill)),
            Err(GatewayError::Unauthorized) => Ok(prompts::sign_in_required()),
            Err(GatewayError::NotFound { .. }) => Ok(prompts::no_billing_data()),
            Err(GatewayError::Rejected {
                status, message, ..
            }) => {
                let lowered = message.to_lowercase();
                if status == 404 || NO_BILL_MARKERS.iter().any(|m| lowered.contains(m)) {
                    Ok(prompts::no_billing_data())
                } else {
                    Ok(prompts::billing_failed(&message))
                }
            }
            Err(GatewayError::Timeout { .. }) => Ok(prompts::timed_out()),
            Err(GatewayError::Connectivity(_)) => Ok(prompts::unreachable()),
            Err(err @ GatewayError::Decode(_)) => Err(err.into()),
        }
    }

    pub async fn appointments(&self, turn: &Turn<'_>) -> Result<String, DialogueError> {
        let Some(token) = turn.access_token else {
            return Ok(prompts::sign_in_required());
        };

        match self.gateway.list_appointments(Some(token)).await {
            Ok(appointments) if appointments.is_empty() => Ok(prompts::no_appointments()),
            Ok(appointments) => {
                let views: Vec<AppointmentView<'_>> = appointments
                    .iter()
                    .map(|appointment| AppointmentView {
                        appointment,
                        facility: self.catalog.facility(&appointment.facility_id),
                        practitioner: self
                            .catalog
                            .practitioner(&appointment.facility_id, &appointment.practitioner_id),
                    })
                    .collect();
                Ok(self.formatter.appointment_list(&views))
            }
            Err(GatewayError::Unauthorized) => Ok(prompts::sign_in_required()),
            Err(GatewayError::Timeout { .. }) => Ok(prompts::timed_out()),
            Err(GatewayError::Connectivity(_)) => Ok(prompts::unreachable()),
            Err(GatewayError::Rejected { message, .. } | GatewayError::NotFound { message }) => {
                Ok(prompts::appointments_failed(&message))
            }
            Err(err @ GatewayError::Decode(_)) => Err(err.into()),
        }
    }
}
