//! Domain layer containing the dialogue model and clinic records.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (timestamps, IDs, validation errors, state machines)
//! - `catalog` - Facilities, practitioners and bookable time slots
//! - `records` - Tickets, appointments and bills returned by clinic services
//! - `dialogue` - Conversation context, extractors, intent rules and reply texts

pub mod catalog;
pub mod dialogue;
pub mod foundation;
pub mod records;
