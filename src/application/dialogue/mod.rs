//! Dialogue application layer - flow controllers and the turn engine.

mod appointment_flow;
mod engine;
mod lookup_flow;
mod queue_flow;
mod turn;

pub use appointment_flow::AppointmentFlow;
pub use engine::DialogueEngine;
pub use lookup_flow::LookupFlow;
pub use queue_flow::QueueFlow;
pub use turn::{
    DialogueError, DialogueSettings, Entry, Turn, TurnCommand, TurnResult,
    DEFAULT_CONTEXT_TTL_SECS, DEFAULT_UTC_OFFSET_MINUTES,
};
