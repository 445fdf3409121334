//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that the rest of the clinic assistant domain builds on.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::ConversationId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
