//! Dialogue module - Conversation state and the pure pieces of a turn.
//!
//! Everything here is synchronous and free of I/O: the context value, flow
//! states, entity extractors, intent rules, prompt texts and the formatter.
//! The async controllers that tie them to the gateway live in
//! `application::dialogue`.

mod context;
pub mod extractor;
mod flow;
mod formatter;
mod intent;
mod matcher;
pub mod prompts;
mod slot;

pub use context::{CollectedFields, ConversationContext};
pub use flow::{AppointmentStep, Flow, QueueOperation, QueueStage};
pub use formatter::{AppointmentView, ResponseFormatter};
pub use intent::{IntentResolver, IntentRules, Resolution};
pub use matcher::{Pattern, Rule, RuleSet};
pub use slot::{FlowKind, SlotField};
