//! End-to-end dialogue scenarios against the scripted gateway.
//!
//! These tests drive the engine one utterance at a time, the way the chat
//! endpoint does, and check both the reply and the context handed back.

use std::sync::Arc;

use proptest::prelude::*;

use clinic_assistant::adapters::{FixedClock, MockClinicGateway, StaticCatalog};
use clinic_assistant::adapters::gateway::{GatewayCall, MockError};
use clinic_assistant::application::dialogue::{
    DialogueEngine, DialogueSettings, TurnCommand, TurnResult,
};
use clinic_assistant::domain::dialogue::{
    prompts, AppointmentStep, ConversationContext, Flow, FlowKind, QueueOperation, QueueStage,
    ResponseFormatter, SlotField,
};
use clinic_assistant::domain::foundation::Timestamp;
use clinic_assistant::domain::records::QueueType;
use clinic_assistant::ports::ReferenceData;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// 2025-01-15 09:00 in the clinic's time zone.
const NINE_AM: u64 = 1_736_906_400;

struct Harness {
    engine: DialogueEngine,
    gateway: MockClinicGateway,
    clock: FixedClock,
}

impl Harness {
    fn new() -> Self {
        Self::with_gateway(MockClinicGateway::new())
    }

    fn with_gateway(gateway: MockClinicGateway) -> Self {
        let clock = FixedClock::new(Timestamp::from_unix_secs(NINE_AM));
        let engine = DialogueEngine::new(
            Arc::new(gateway.clone()),
            Arc::new(StaticCatalog::builtin()),
            Arc::new(clock.clone()),
            DialogueSettings::default(),
        );
        Self {
            engine,
            gateway,
            clock,
        }
    }

    async fn say(&self, context: ConversationContext, utterance: &str) -> TurnResult {
        self.engine
            .handle(TurnCommand::new(utterance).with_context(context))
            .await
    }

    async fn script(&self, utterances: &[&str]) -> ConversationContext {
        let mut context = ConversationContext::new();
        for utterance in utterances {
            context = self.say(context, utterance).await.context;
        }
        context
    }
}

const TO_TIME: [&str; 4] = ["đặt lịch khám", "1", "1", "20/01/2025"];
const TO_PHONE: [&str; 6] = ["đặt lịch khám", "1", "1", "20/01/2025", "5", "Nguyễn Văn A"];
const TO_CONFIRM: [&str; 9] = [
    "đặt lịch khám",
    "1",
    "1",
    "20/01/2025",
    "5",
    "Nguyễn Văn A",
    "0912345678",
    "a@example.com",
    "bỏ qua",
];

fn appointment_step(context: &ConversationContext) -> AppointmentStep {
    match context.flow {
        Flow::Appointment { step } => step,
        other => panic!("expected appointment flow, got {other:?}"),
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// =============================================================================
// Booking
// =============================================================================

#[tokio::test]
async fn booking_phrase_from_idle_opens_facility_menu() {
    let harness = Harness::new();

    let result = harness.say(ConversationContext::new(), "đặt lịch khám").await;

    assert!(result.reply.contains("Bệnh viện Chợ Rẫy"));
    assert!(result.reply.contains("Bệnh viện Thống Nhất"));
    assert_eq!(appointment_step(&result.context), AppointmentStep::SelectFacility);
    assert_eq!(result.context.pending_field, Some(SlotField::Facility));
}

#[tokio::test]
async fn fifth_time_slot_moves_on_to_patient_name() {
    let harness = Harness::new();
    let context = harness.script(&TO_TIME).await;
    assert_eq!(appointment_step(&context), AppointmentStep::SelectTime);

    let result = harness.say(context, "5").await;

    assert_eq!(result.context.collected.get(SlotField::Time), Some("08:00"));
    assert_eq!(appointment_step(&result.context), AppointmentStep::EnterName);
    assert_eq!(result.context.pending_field, Some(SlotField::PatientName));
}

#[tokio::test]
async fn confirmed_booking_completes_with_reference() {
    let harness = Harness::new();
    let context = harness.script(&TO_CONFIRM).await;
    assert_eq!(appointment_step(&context), AppointmentStep::Confirm);

    let result = harness.say(context, "xác nhận").await;

    assert!(result.reply.contains("APPT-0001"));
    assert!(result.context.is_idle());
    assert!(result.context.collected.is_empty());
    assert_eq!(result.context.result_reference.as_deref(), Some("APPT-0001"));
    assert_eq!(harness.gateway.call_count(), 1);
}

#[tokio::test]
async fn booking_timeout_leaves_flow_at_confirmation() {
    let harness = Harness::with_gateway(
        MockClinicGateway::new().with_error(MockError::Timeout { timeout_secs: 10 }),
    );
    let context = harness.script(&TO_CONFIRM).await;

    let result = harness.say(context, "xác nhận").await;

    assert_eq!(result.reply, prompts::timed_out_with_retry());
    assert_eq!(appointment_step(&result.context), AppointmentStep::Confirm);
    assert!(!result.context.is_idle());

    // Re-confirming resubmits the same booking.
    let result = harness.say(result.context, "đồng ý").await;
    assert!(result.context.is_idle());
    assert_eq!(harness.gateway.call_count(), 2);
}

#[tokio::test]
async fn server_rejection_holds_at_confirmation() {
    let harness = Harness::with_gateway(MockClinicGateway::new().with_error(
        MockError::Rejected {
            status: 409,
            message: "Khung giờ đã kín".to_string(),
        },
    ));
    let context = harness.script(&TO_CONFIRM).await;
    let collected = context.collected.clone();

    let result = harness.say(context, "xác nhận").await;

    assert!(result.reply.contains("Khung giờ đã kín"));
    assert_eq!(appointment_step(&result.context), AppointmentStep::Confirm);
    assert_eq!(result.context.collected, collected);
}

// =============================================================================
// Queue
// =============================================================================

#[tokio::test]
async fn one_shot_service_check_in() {
    let harness = Harness::new();

    let result = harness
        .say(
            ConversationContext::new(),
            "Cho tôi lấy số DV, tên Nguyễn Văn A, SĐT 0912345678, CCCD 001234567890",
        )
        .await;

    assert!(result.reply.contains("DV-20250115-007"));
    assert!(result.reply.contains("Số người chờ trước"));
    assert!(result.context.is_idle());
    assert_eq!(result.context.result_reference.as_deref(), Some("DV-20250115-007"));
    assert_eq!(result.context.queue_type_hint, Some(QueueType::Service));
}

#[tokio::test]
async fn status_after_check_in_reuses_queue_type() {
    let harness = Harness::new();
    let context = harness
        .script(&["lấy số dịch vụ tên Nguyễn Văn A SĐT 0912345678 CCCD 001234567890"])
        .await;
    assert_eq!(context.queue_type_hint, Some(QueueType::Service));

    let result = harness.say(context, "còn bao nhiêu số nữa").await;

    assert!(result.context.is_idle());
    assert_eq!(
        harness.gateway.get_calls().last(),
        Some(&GatewayCall::Status {
            queue_type: QueueType::Service,
            authenticated: false
        })
    );
}

#[tokio::test]
async fn check_in_collects_fields_across_turns() {
    let harness = Harness::new();
    let context = harness.script(&["check in", "Trần Thị B", "0987654321"]).await;
    assert_eq!(context.pending_field, Some(SlotField::NationalId));

    let result = harness.say(context, "bỏ qua").await;
    assert_eq!(result.reply, prompts::ask_queue_type(QueueOperation::CheckIn));

    let result = harness.say(result.context, "BHYT").await;
    assert!(result.reply.contains("BHYT-20250115-007"));
    assert!(result.context.is_idle());
}

#[tokio::test]
async fn rejected_check_in_waits_for_retry() {
    let harness = Harness::with_gateway(MockClinicGateway::new().with_error(
        MockError::Rejected {
            status: 409,
            message: "Bạn đã có số trong hàng đợi".to_string(),
        },
    ));

    let result = harness
        .say(
            ConversationContext::new(),
            "lấy số BHYT tên Nguyễn Văn A SĐT 0912345678 CCCD 001234567890",
        )
        .await;

    assert!(result.reply.contains("Bạn đã có số trong hàng đợi"));
    assert_eq!(
        result.context.flow,
        Flow::Queue {
            operation: QueueOperation::CheckIn,
            stage: QueueStage::AwaitingRetry
        }
    );
}

// =============================================================================
// Lookups
// =============================================================================

#[tokio::test]
async fn billing_without_sign_in_asks_to_sign_in() {
    let harness = Harness::new();

    let result = harness.say(ConversationContext::new(), "xem viện phí").await;

    assert_eq!(result.reply, prompts::sign_in_required());
    assert!(result.context.is_idle());
    assert_eq!(harness.gateway.call_count(), 0);
}

#[tokio::test]
async fn billing_question_mid_booking_resumes_where_it_left_off() {
    let harness = Harness::new();
    let context = harness.script(&TO_TIME).await;
    let before = context.clone();

    let result = harness.say(context, "viện phí").await;
    assert_eq!(result.reply, prompts::sign_in_required());
    assert_eq!(result.context.flow, before.flow);
    assert_eq!(result.context.collected, before.collected);

    let result = harness.say(result.context, "5").await;
    assert_eq!(appointment_step(&result.context), AppointmentStep::EnterName);
    assert_eq!(
        result.context.collected.get(SlotField::Date),
        Some("20/01/2025")
    );
}

// =============================================================================
// Override, cancel and expiry
// =============================================================================

#[tokio::test]
async fn strong_status_signal_replaces_booking_in_progress() {
    let harness = Harness::new();
    let context = harness.script(&["đặt lịch khám", "2", "1"]).await;
    assert!(context.collected.contains(SlotField::Facility));
    assert!(context.collected.contains(SlotField::Practitioner));

    let result = harness.say(context, "cho tôi xem trạng thái số của tôi").await;

    assert_eq!(result.context.active_flow(), Some(FlowKind::QueueStatus));
    assert!(!result.context.collected.contains(SlotField::Facility));
    assert!(!result.context.collected.contains(SlotField::Practitioner));
    assert_eq!(result.context.last_flow, Some(FlowKind::QueueStatus));
}

#[tokio::test]
async fn cancel_mid_booking_returns_to_idle() {
    let harness = Harness::new();
    let context = harness.script(&TO_TIME).await;

    let result = harness.say(context, "hủy").await;

    assert_eq!(result.reply, prompts::cancelled(Some(FlowKind::Appointment)));
    assert!(result.context.is_idle());
    assert!(result.context.collected.is_empty());
}

#[tokio::test]
async fn expired_booking_is_dropped_with_note() {
    let harness = Harness::new();
    let mut context = harness.script(&TO_TIME).await;
    context.result_reference = Some("DV-20250115-007".to_string());

    harness.clock.advance_secs(11 * 60);
    let result = harness.say(context, "5").await;

    assert!(result.reply.starts_with(prompts::session_expired_note()));
    assert!(result.context.is_idle());
    assert!(result.context.collected.is_empty());
    assert_eq!(
        result.context.result_reference.as_deref(),
        Some("DV-20250115-007")
    );
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn menu_index_selects_matching_facility(index in 1usize..=4) {
        let catalog = StaticCatalog::builtin();
        let expected = catalog.facilities()[index - 1].id.clone();

        let context = runtime().block_on(async {
            let harness = Harness::new();
            let context = harness.script(&["đặt lịch khám"]).await;
            harness.say(context, &index.to_string()).await.context
        });

        prop_assert_eq!(context.collected.get(SlotField::Facility), Some(expected.as_str()));
    }

    #[test]
    fn malformed_phone_keeps_flow_and_pending_field(
        phone in prop_oneof!["[1-9][0-9]{9}", "0[0-9]{1,8}", "[a-z]{0,3}0[0-9]{2}"]
    ) {
        let (before, after) = runtime().block_on(async {
            let harness = Harness::new();
            let before = harness.script(&TO_PHONE).await;
            let after = harness.say(before.clone(), &phone).await.context;
            (before, after)
        });

        prop_assert_eq!(&after.flow, &before.flow);
        prop_assert_eq!(after.pending_field, Some(SlotField::Phone));
        prop_assert_eq!(&after.collected, &before.collected);
    }

    #[test]
    fn malformed_check_in_phone_keeps_pending_field(
        phone in prop_oneof!["[1-9][0-9]{9}", "0[0-9]{1,7}"]
    ) {
        let (before, after) = runtime().block_on(async {
            let harness = Harness::new();
            let before = harness.script(&["check in", "Trần Thị B"]).await;
            let after = harness.say(before.clone(), &phone).await.context;
            (before, after)
        });

        prop_assert_eq!(&after.flow, &before.flow);
        prop_assert_eq!(after.pending_field, Some(SlotField::Phone));
        prop_assert_eq!(&after.collected, &before.collected);
    }

    #[test]
    fn ticket_formatting_is_idempotent(
        number in 1u32..500,
        current in 0u32..500,
        waiting in 0u32..200,
        minutes in 0u32..600,
    ) {
        let mut ticket = MockClinicGateway::sample_ticket(QueueType::Insurance, number);
        ticket.current_number = current;
        ticket.waiting_before = waiting;
        ticket.estimated_wait_minutes = minutes;
        let formatter = ResponseFormatter::new(DialogueSettings::default().utc_offset);

        prop_assert_eq!(formatter.ticket(&ticket), formatter.ticket(&ticket));
    }

    #[test]
    fn idle_past_ttl_always_evicts(extra in 1u64..100_000, digits in "[0-9]{1,3}") {
        let context = runtime().block_on(async {
            let harness = Harness::new();
            let mut context = harness.script(&["đặt lịch khám", "1", "1"]).await;
            context.result_reference = Some("APPT-0009".to_string());
            harness.clock.advance_secs(600 + extra);
            harness.say(context, &digits).await.context
        });

        prop_assert!(context.is_idle());
        prop_assert!(context.collected.is_empty());
        prop_assert_eq!(context.result_reference.as_deref(), Some("APPT-0009"));
    }
}
