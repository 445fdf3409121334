//! Dialogue engine - one utterance in, one reply and one context out.
//!
//! The engine owns no conversation state. Each turn:
//!
//! 1. evicts the incoming context if it outlived the TTL,
//! 2. resolves the intent (cancel, switch, continue, help),
//! 3. runs the matching controller against a working copy of the context,
//! 4. stamps the context with the turn time.
//!
//! A controller error never leaks to the caller: the reply falls back to the
//! help menu and the context goes idle.

use std::sync::Arc;

use super::appointment_flow::AppointmentFlow;
use super::lookup_flow::LookupFlow;
use super::queue_flow::QueueFlow;
use super::turn::{DialogueError, DialogueSettings, Entry, Turn, TurnCommand, TurnResult};
use crate::domain::dialogue::{
    prompts, ConversationContext, FlowKind, IntentResolver, IntentRules, Resolution,
    ResponseFormatter,
};
use crate::ports::{Clock, ClinicGateway, ReferenceData};

pub struct DialogueEngine {
    resolver: IntentResolver,
    appointment: AppointmentFlow,
    queue: QueueFlow,
    lookup: LookupFlow,
    clock: Arc<dyn Clock>,
    settings: DialogueSettings,
}

impl DialogueEngine {
    pub fn new(
        gateway: Arc<dyn ClinicGateway>,
        catalog: Arc<dyn ReferenceData>,
        clock: Arc<dyn Clock>,
        settings: DialogueSettings,
    ) -> Self {
        let formatter = ResponseFormatter::new(settings.utc_offset);
        Self {
            resolver: IntentResolver::default(),
            appointment: AppointmentFlow::new(gateway.clone(), catalog.clone(), formatter),
            queue: QueueFlow::new(gateway.clone(), formatter),
            lookup: LookupFlow::new(gateway, catalog, formatter),
            clock,
            settings,
        }
    }

    /// Replaces the built-in keyword rules.
    pub fn with_rules(mut self, rules: IntentRules) -> Self {
        self.resolver = IntentResolver::new(rules);
        self
    }

    pub fn settings(&self) -> &DialogueSettings {
        &self.settings
    }

    /// Processes one turn.
    pub async fn handle(&self, command: TurnCommand) -> TurnResult {
        let now = self.clock.now();
        let mut context = command.context.unwrap_or_default();

        let had_flow = !context.is_idle();
        let expired = context.evict_if_expired(now, self.settings.context_ttl) && had_flow;
        if expired {
            tracing::info!(
                conversation_id = %context.conversation_id,
                "Context expired; in-progress flow dropped"
            );
        }

        let turn = Turn::new(
            &command.utterance,
            now,
            self.settings.utc_offset,
            command.access_token.as_ref(),
        );

        let reply = if command.utterance.trim().is_empty() {
            prompts::empty_message()
        } else {
            self.dispatch(&turn, &mut context).await
        };

        context.touch(now);

        let reply = if expired {
            format!("{}{}", prompts::session_expired_note(), reply)
        } else {
            reply
        };

        TurnResult { reply, context }
    }

    async fn dispatch(&self, turn: &Turn<'_>, context: &mut ConversationContext) -> String {
        let resolution = self.resolver.resolve(turn.utterance, context);

        tracing::debug!(
            conversation_id = %context.conversation_id,
            flow = ?context.active_flow(),
            pending_field = ?context.pending_field,
            resolution = ?resolution,
            "Turn resolved"
        );

        let mut working = context.clone();
        match self.apply(resolution, turn, &mut working).await {
            Ok(reply) => {
                *context = working;
                reply
            }
            Err(err) => {
                tracing::warn!(
                    conversation_id = %context.conversation_id,
                    flow = ?context.active_flow(),
                    error = %err,
                    "Turn failed; resetting to idle"
                );
                context.reset_to_idle();
                prompts::help_menu()
            }
        }
    }

    async fn apply(
        &self,
        resolution: Resolution,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
    ) -> Result<String, DialogueError> {
        match resolution {
            Resolution::Cancel => {
                let active = context.active_flow();
                context.reset_to_idle();
                context.last_flow = None;
                tracing::info!(
                    conversation_id = %context.conversation_id,
                    flow = ?active,
                    "Flow cancelled"
                );
                Ok(prompts::cancelled(active))
            }
            Resolution::Help => Ok(prompts::help_menu()),
            Resolution::Ambiguous(candidates) => Ok(prompts::disambiguation(&candidates)),
            // Lookups hold no state, so whatever flow is underway is kept.
            Resolution::Begin { kind, .. } if !kind.is_stateful() => {
                self.run(kind, turn, context, Entry::Fresh).await
            }
            Resolution::Begin { kind, replaced } => {
                if let Some(previous) = replaced {
                    tracing::info!(
                        conversation_id = %context.conversation_id,
                        from = previous.as_str(),
                        to = kind.as_str(),
                        "Switching flow"
                    );
                }
                context.begin(kind);
                self.run(kind, turn, context, Entry::Fresh).await
            }
            Resolution::Continue(kind) => self.run(kind, turn, context, Entry::Resume).await,
        }
    }

    async fn run(
        &self,
        kind: FlowKind,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
        entry: Entry,
    ) -> Result<String, DialogueError> {
        match kind {
            FlowKind::Appointment => self.appointment.handle(turn, context, entry).await,
            FlowKind::CheckIn | FlowKind::QueueStatus | FlowKind::Reissue => {
                self.queue.handle(turn, context, entry).await
            }
            FlowKind::Billing => self.lookup.billing(turn).await,
            FlowKind::AppointmentList => self.lookup.appointments(turn).await,
        }
    }
}
