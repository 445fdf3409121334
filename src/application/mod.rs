//! Application layer - flow controllers and the turn engine.
//!
//! This layer drives domain types through one conversational turn and
//! coordinates calls to the clinic gateway.

pub mod dialogue;

pub use dialogue::{DialogueEngine, TurnCommand, TurnResult};
