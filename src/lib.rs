//! Clinic Assistant - patient-facing chat for a group of Vietnamese clinics.
//!
//! A slot-filling dialogue engine walks patients through booking an
//! appointment, checking in to a queue, asking about their queue number and
//! having a ticket reissued. It also answers billing and appointment-list
//! lookups. Every turn is a pure function of the utterance and the context
//! the client sends back, so the server keeps no session state.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
