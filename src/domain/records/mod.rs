//! Records module - Results returned by the clinic's external services.

mod appointment;
mod bill;
mod queue;

pub use appointment::{Appointment, AppointmentRequest, AppointmentStatus};
pub use bill::{Bill, BilledService};
pub use queue::{CheckInRequest, PatientInfo, QueueType, Ticket, TicketStatus};
