//! Per-conversation dialogue context.
//!
//! The context is owned by the caller and passed in and out of every turn.
//! It is the only memory the engine has.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::flow::Flow;
use super::slot::{FlowKind, SlotField};
use crate::domain::foundation::{ConversationId, Timestamp};
use crate::domain::records::QueueType;

/// Validated values gathered for the active flow.
///
/// An empty string records that an optional field was explicitly skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectedFields(BTreeMap<SlotField, String>);

impl CollectedFields {
    pub fn get(&self, field: SlotField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Value of a field, treating a skipped field as absent.
    pub fn value(&self, field: SlotField) -> Option<&str> {
        self.get(field).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, field: SlotField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(&mut self, field: SlotField, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn skip(&mut self, field: SlotField) {
        self.0.insert(field, String::new());
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    #[serde(default)]
    pub conversation_id: ConversationId,
    #[serde(default)]
    pub flow: Flow,
    #[serde(default)]
    pub pending_field: Option<SlotField>,
    #[serde(default)]
    pub last_flow: Option<FlowKind>,
    #[serde(default)]
    pub collected: CollectedFields,
    /// Ticket code or appointment id of the last successful submission.
    #[serde(default)]
    pub result_reference: Option<String>,
    #[serde(default)]
    pub queue_type_hint: Option<QueueType>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl ConversationContext {
    /// Empty context for the first turn of a conversation.
    pub fn new() -> Self {
        Self {
            conversation_id: ConversationId::new(),
            flow: Flow::Idle,
            pending_field: None,
            last_flow: None,
            collected: CollectedFields::default(),
            result_reference: None,
            queue_type_hint: None,
            updated_at: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.flow.is_idle()
    }

    pub fn active_flow(&self) -> Option<FlowKind> {
        self.flow.kind()
    }

    /// Drops in-progress state when the last turn is older than `ttl`.
    ///
    /// The result reference and queue-type hint survive. Returns whether
    /// anything was evicted.
    pub fn evict_if_expired(&mut self, now: Timestamp, ttl: Duration) -> bool {
        let Some(updated_at) = self.updated_at else {
            return false;
        };
        if now.duration_since(&updated_at) <= ttl {
            return false;
        }
        self.flow = Flow::Idle;
        self.pending_field = None;
        self.last_flow = None;
        self.collected.clear();
        true
    }

    /// Enters the entry state of `kind`, discarding any previous flow's fields.
    ///
    /// One-shot lookups leave the flow idle and do not count as `last_flow`.
    pub fn begin(&mut self, kind: FlowKind) {
        self.collected.clear();
        self.pending_field = None;
        self.flow = Flow::start(kind).unwrap_or(Flow::Idle);
        if kind.is_stateful() {
            self.last_flow = Some(kind);
        }
    }

    /// Moves to `flow` and waits for `field`.
    pub fn await_field(&mut self, flow: Flow, field: SlotField) {
        self.flow = flow;
        self.pending_field = Some(field);
    }

    /// Returns to idle, clearing everything gathered for the current flow.
    pub fn reset_to_idle(&mut self) {
        self.flow = Flow::Idle;
        self.pending_field = None;
        self.collected.clear();
    }

    /// Finishes the current flow successfully.
    pub fn complete(&mut self, reference: Option<String>) {
        self.reset_to_idle();
        if reference.is_some() {
            self.result_reference = reference;
        }
    }

    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = Some(now);
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}
