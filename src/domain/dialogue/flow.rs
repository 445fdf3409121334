//! Flow state: which task is active and which step it is on.

use serde::{Deserialize, Serialize};

use super::slot::{FlowKind, SlotField};
use crate::domain::foundation::StateMachine;

/// Steps of the appointment booking flow, in the order fields are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStep {
    SelectFacility,
    SelectPractitioner,
    SelectDate,
    SelectTime,
    EnterName,
    EnterPhone,
    EnterEmail,
    EnterSymptoms,
    Confirm,
}

impl AppointmentStep {
    /// The field this step is waiting for.
    pub fn pending_field(&self) -> SlotField {
        use AppointmentStep::*;
        match self {
            SelectFacility => SlotField::Facility,
            SelectPractitioner => SlotField::Practitioner,
            SelectDate => SlotField::Date,
            SelectTime => SlotField::Time,
            EnterName => SlotField::PatientName,
            EnterPhone => SlotField::Phone,
            EnterEmail => SlotField::Email,
            EnterSymptoms => SlotField::Symptoms,
            Confirm => SlotField::Confirmation,
        }
    }

    /// The next step in the linear order, if any.
    pub fn next(&self) -> Option<Self> {
        use AppointmentStep::*;
        match self {
            SelectFacility => Some(SelectPractitioner),
            SelectPractitioner => Some(SelectDate),
            SelectDate => Some(SelectTime),
            SelectTime => Some(EnterName),
            EnterName => Some(EnterPhone),
            EnterPhone => Some(EnterEmail),
            EnterEmail => Some(EnterSymptoms),
            EnterSymptoms => Some(Confirm),
            Confirm => None,
        }
    }
}

impl StateMachine for AppointmentStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use AppointmentStep::*;
        match self {
            // A stale date or time found at confirmation sends the user back.
            Confirm => vec![SelectDate, SelectTime],
            // Once patient details exist, a re-picked slot returns to confirm.
            SelectTime => vec![EnterName, Confirm],
            step => step.next().into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueOperation {
    CheckIn,
    Status,
    Reissue,
}

impl QueueOperation {
    pub fn kind(&self) -> FlowKind {
        match self {
            QueueOperation::CheckIn => FlowKind::CheckIn,
            QueueOperation::Status => FlowKind::QueueStatus,
            QueueOperation::Reissue => FlowKind::Reissue,
        }
    }

    /// Fields required before the operation can be sent, in prompt order.
    pub fn required_fields(&self) -> &'static [SlotField] {
        match self {
            QueueOperation::CheckIn => &[
                SlotField::FullName,
                SlotField::Phone,
                SlotField::NationalId,
                SlotField::QueueType,
            ],
            QueueOperation::Status | QueueOperation::Reissue => &[SlotField::QueueType],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStage {
    Collecting,
    /// A submission failed; collected fields are kept until the user retries.
    AwaitingRetry,
}

/// Where the conversation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Flow {
    #[default]
    Idle,
    Appointment {
        step: AppointmentStep,
    },
    Queue {
        operation: QueueOperation,
        stage: QueueStage,
    },
}

impl Flow {
    /// Entry state for a stateful flow; `None` for one-shot lookups.
    pub fn start(kind: FlowKind) -> Option<Self> {
        let queue = |operation| Flow::Queue {
            operation,
            stage: QueueStage::Collecting,
        };
        match kind {
            FlowKind::Appointment => Some(Flow::Appointment {
                step: AppointmentStep::SelectFacility,
            }),
            FlowKind::CheckIn => Some(queue(QueueOperation::CheckIn)),
            FlowKind::QueueStatus => Some(queue(QueueOperation::Status)),
            FlowKind::Reissue => Some(queue(QueueOperation::Reissue)),
            FlowKind::Billing | FlowKind::AppointmentList => None,
        }
    }

    pub fn kind(&self) -> Option<FlowKind> {
        match self {
            Flow::Idle => None,
            Flow::Appointment { .. } => Some(FlowKind::Appointment),
            Flow::Queue { operation, .. } => Some(operation.kind()),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Flow::Idle)
    }
}
