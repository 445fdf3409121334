//! Queue controller: check-in, status and reissue.
//!
//! Every check-in turn scans the utterance for any field it carries, so one
//! message with name, phone, ID and queue type submits straight away.

use std::sync::Arc;

use super::turn::{required, submission_failure, DialogueError, Entry, Turn};
use crate::domain::dialogue::extractor::{
    extract_full_name, extract_national_id, extract_queue_type, is_confirmation, is_skip,
    parse_phone_strict,
};
use crate::domain::dialogue::{
    prompts, CollectedFields, ConversationContext, Flow, QueueOperation, QueueStage,
    ResponseFormatter, SlotField,
};
use crate::domain::records::{CheckInRequest, QueueType, Ticket};
use crate::ports::{ClinicGateway, GatewayError};

pub struct QueueFlow {
    gateway: Arc<dyn ClinicGateway>,
    formatter: ResponseFormatter,
}

impl QueueFlow {
    pub fn new(gateway: Arc<dyn ClinicGateway>, formatter: ResponseFormatter) -> Self {
        Self { gateway, formatter }
    }

    pub async fn handle(
        &self,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
        entry: Entry,
    ) -> Result<String, DialogueError> {
        let (operation, stage) = match context.flow {
            Flow::Queue { operation, stage } => (operation, stage),
            other => return Err(DialogueError::FlowMismatch(other)),
        };

        match stage {
            QueueStage::AwaitingRetry if is_confirmation(turn.utterance) => {
                self.submit(turn, context, operation).await
            }
            QueueStage::AwaitingRetry => Ok(prompts::retry_reminder()),
            QueueStage::Collecting => self.collect(turn, context, operation, entry).await,
        }
    }

    async fn collect(
        &self,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
        operation: QueueOperation,
        entry: Entry,
    ) -> Result<String, DialogueError> {
        let pending = context.pending_field;
        let mut fields = context.collected.clone();
        absorb(&mut fields, turn.utterance, operation, pending);

        if entry == Entry::Fresh && operation != QueueOperation::CheckIn {
            if let Some(hint) = context.queue_type_hint {
                if !fields.contains(SlotField::QueueType) {
                    fields.insert(SlotField::QueueType, hint.code());
                }
            }
        }

        // An answer that does not fill the field we asked for changes nothing.
        if entry == Entry::Resume {
            if let Some(field) = pending.filter(|f| !fields.contains(*f)) {
                return invalid_answer(field);
            }
        }

        context.collected = fields;

        let missing = operation
            .required_fields()
            .iter()
            .copied()
            .find(|f| !context.collected.contains(*f));

        match missing {
            Some(field) => {
                context.await_field(
                    Flow::Queue {
                        operation,
                        stage: QueueStage::Collecting,
                    },
                    field,
                );
                ask_for(field, operation)
            }
            None => self.submit(turn, context, operation).await,
        }
    }

    async fn submit(
        &self,
        turn: &Turn<'_>,
        context: &mut ConversationContext,
        operation: QueueOperation,
    ) -> Result<String, DialogueError> {
        let queue_type = collected_queue_type(context)?;

        tracing::info!(
            conversation_id = %context.conversation_id,
            operation = ?operation,
            queue_type = %queue_type,
            "Submitting queue request"
        );

        let result = match operation {
            QueueOperation::CheckIn => {
                let request = CheckInRequest {
                    full_name: required(context, SlotField::FullName)?,
                    phone_number: required(context, SlotField::Phone)?,
                    national_id: context
                        .collected
                        .value(SlotField::NationalId)
                        .map(str::to_string),
                    queue_type,
                };
                self.gateway
                    .queue_check_in(&request, turn.access_token)
                    .await
            }
            QueueOperation::Status => self.gateway.queue_status(queue_type, turn.access_token).await,
            QueueOperation::Reissue => {
                self.gateway
                    .queue_reissue(queue_type, turn.access_token)
                    .await
            }
        };

        match result {
            Ok(ticket) => Ok(self.finish(context, operation, ticket)),
            Err(err) => {
                tracing::warn!(
                    conversation_id = %context.conversation_id,
                    operation = ?operation,
                    kind = err.kind(),
                    "Queue request failed"
                );
                self.failed(context, operation, err)
            }
        }
    }

    fn finish(&self, context: &mut ConversationContext, operation: QueueOperation, ticket: Ticket) -> String {
        let text = self.formatter.ticket(&ticket);
        context.queue_type_hint = Some(ticket.queue_type);
        context.complete(Some(ticket.ticket_code));

        match operation {
            QueueOperation::CheckIn => prompts::check_in_succeeded(&text),
            QueueOperation::Reissue => prompts::reissue_succeeded(&text),
            QueueOperation::Status => text,
        }
    }

    fn failed(
        &self,
        context: &mut ConversationContext,
        operation: QueueOperation,
        err: GatewayError,
    ) -> Result<String, DialogueError> {
        if let GatewayError::Decode(_) = err {
            return Err(err.into());
        }

        // A status query submits nothing, so there is nothing to retry.
        if operation == QueueOperation::Status {
            context.reset_to_idle();
            return Ok(match err {
                GatewayError::NotFound { .. } => prompts::status_not_found(),
                GatewayError::Timeout { .. } => prompts::timed_out(),
                GatewayError::Unauthorized => prompts::sign_in_required(),
                GatewayError::Connectivity(_) => prompts::unreachable(),
                GatewayError::Rejected { message, .. } => {
                    prompts::queue_rejected(operation, &message)
                }
                GatewayError::Decode(_) => prompts::help_menu(),
            });
        }

        context.await_field(
            Flow::Queue {
                operation,
                stage: QueueStage::AwaitingRetry,
            },
            SlotField::Confirmation,
        );
        submission_failure(err, |reason| prompts::queue_rejected(operation, reason))
    }
}

/// Copies every recognisable field out of the utterance into `fields`,
/// leaving values already collected untouched.
fn absorb(
    fields: &mut CollectedFields,
    utterance: &str,
    operation: QueueOperation,
    pending: Option<SlotField>,
) {
    if operation == QueueOperation::CheckIn {
        if !fields.contains(SlotField::FullName) {
            let name_pending = pending == Some(SlotField::FullName);
            if let Some(name) = extract_full_name(utterance, name_pending) {
                fields.insert(SlotField::FullName, name);
            }
        }
        if !fields.contains(SlotField::Phone) {
            if let Some(phone) = parse_phone_strict(utterance) {
                fields.insert(SlotField::Phone, phone);
            }
        }
        if !fields.contains(SlotField::NationalId) {
            if let Some(id) = extract_national_id(utterance) {
                fields.insert(SlotField::NationalId, id);
            } else if pending == Some(SlotField::NationalId) && is_skip(utterance) {
                fields.skip(SlotField::NationalId);
            }
        }
    }

    if !fields.contains(SlotField::QueueType) {
        if let Some(queue_type) = extract_queue_type(utterance) {
            fields.insert(SlotField::QueueType, queue_type.code());
        }
    }
}

fn ask_for(field: SlotField, operation: QueueOperation) -> Result<String, DialogueError> {
    match field {
        SlotField::FullName => Ok(prompts::ask_full_name()),
        SlotField::Phone => Ok(prompts::ask_queue_phone()),
        SlotField::NationalId => Ok(prompts::ask_national_id()),
        SlotField::QueueType => Ok(prompts::ask_queue_type(operation)),
        other => Err(DialogueError::UnexpectedField(other)),
    }
}

fn invalid_answer(field: SlotField) -> Result<String, DialogueError> {
    match field {
        SlotField::FullName => Ok(prompts::invalid_full_name()),
        SlotField::Phone => Ok(prompts::invalid_queue_phone()),
        SlotField::NationalId => Ok(prompts::invalid_national_id()),
        SlotField::QueueType => Ok(prompts::invalid_queue_type()),
        other => Err(DialogueError::UnexpectedField(other)),
    }
}

fn collected_queue_type(context: &ConversationContext) -> Result<QueueType, DialogueError> {
    let code = required(context, SlotField::QueueType)?;
    QueueType::from_code(&code).ok_or(DialogueError::MalformedField(SlotField::QueueType))
}
