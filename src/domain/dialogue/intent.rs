//! Intent classification and override resolution.
//!
//! Runs before any slot filling and decides what the turn is about: a
//! cancellation, a new flow, the active flow, or nothing recognisable.

use regex::Regex;

use super::context::ConversationContext;
use super::extractor::{
    extract_email, extract_full_name, extract_queue_type, parse_phone_strict,
};
use super::matcher::RuleSet;
use super::slot::{FlowKind, SlotField};

/// The effective intent for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Drop the active flow and return to idle.
    Cancel,
    /// Enter `kind` from its first state. `replaced` is the flow that was
    /// active before, if any.
    Begin {
        kind: FlowKind,
        replaced: Option<FlowKind>,
    },
    /// Stay in the active flow and feed it the utterance.
    Continue(FlowKind),
    /// Several strong signals fired and none is the active flow.
    Ambiguous(Vec<FlowKind>),
    /// Nothing recognisable; show the help menu.
    Help,
}

/// Keyword and regex rules that drive [`IntentResolver`].
#[derive(Debug, Clone)]
pub struct IntentRules {
    /// Matched against the start of the utterance; wins over everything.
    pub cancel: RuleSet<()>,
    /// Precise phrases that may override an in-progress flow.
    pub strong: RuleSet<FlowKind>,
    /// Looser phrases consulted only from idle.
    pub broad: RuleSet<FlowKind>,
}

impl Default for IntentRules {
    fn default() -> Self {
        let cancel = RuleSet::new().regex(
            (),
            Regex::new(
                r"^\s*(?:hủy|huỷ|huy|reset|làm lại|lam lai|bắt đầu lại|bat dau lai|cancel|start over)\b",
            )
            .expect("cancel pattern"),
        );

        let strong = RuleSet::new()
            .keywords(
                FlowKind::Appointment,
                &[
                    "đặt lịch", "dat lich", "đặt lich", "đặt khám", "dat kham", "hẹn khám",
                    "hen kham", "đặt hẹn", "dat hen", "book appointment", "booking",
                    "make an appointment",
                ],
            )
            .keywords(
                FlowKind::AppointmentList,
                &[
                    "lịch hẹn của tôi", "lich hen cua toi", "xem lịch hẹn", "xem lich hen",
                    "danh sách lịch hẹn", "danh sach lich hen", "my appointments",
                ],
            )
            .keywords(
                FlowKind::CheckIn,
                &["check in", "checkin", "check-in", "lấy số", "lay so", "cấp số", "cap so"],
            )
            .keywords(
                FlowKind::QueueStatus,
                &[
                    "trạng thái", "trang thai", "đợi bao lâu", "doi bao lau", "còn bao nhiêu",
                    "con bao nhieu", "bao nhiêu số", "bao nhieu so", "mấy số", "may so",
                    "tới lượt", "toi luot", "đến lượt", "den luot", "đến đâu", "den dau",
                    "số của tôi", "so cua toi", "queue status", "my number",
                ],
            )
            .keywords(
                FlowKind::Reissue,
                &[
                    "cấp lại", "cap lai", "làm lại số", "lam lai so", "mất số", "mat so",
                    "reissue",
                ],
            )
            .keywords(
                FlowKind::Billing,
                &[
                    "viện phí", "vien phi", "viện phi", "tiền viện", "hóa đơn", "hoa don",
                    "thanh toán", "thanh toan", "tổng chi phí", "tong chi phi", "billing",
                    "medical bill", "hospital fee", "invoice",
                ],
            )
            .regex(
                FlowKind::Billing,
                Regex::new(r"\bbill\b").expect("bill pattern"),
            );

        let broad = RuleSet::new()
            .keywords(
                FlowKind::Appointment,
                &[
                    "lịch hẹn", "lich hen", "lịch khám", "lich kham", "khám bệnh", "kham benh",
                    "appointment", "schedule",
                ],
            )
            .regex(
                FlowKind::Appointment,
                Regex::new(r"\bbook\b").expect("book pattern"),
            )
            .keywords(
                FlowKind::CheckIn,
                &["số thứ tự", "so thu tu", "hàng đợi", "hang doi", "queue"],
            )
            .keywords(
                FlowKind::Billing,
                &[
                    "chi phí", "chi phi", "phí khám", "phi kham", "bao nhiêu tiền",
                    "bao nhieu tien", "tổng tiền", "tong tien", "tiền", "payment",
                ],
            );

        Self {
            cancel,
            strong,
            broad,
        }
    }
}

/// Decides the effective flow for a turn from the utterance and the context.
#[derive(Debug, Clone, Default)]
pub struct IntentResolver {
    rules: IntentRules,
}

impl IntentResolver {
    pub fn new(rules: IntentRules) -> Self {
        Self { rules }
    }

    pub fn resolve(&self, utterance: &str, context: &ConversationContext) -> Resolution {
        if self.rules.cancel.is_match(utterance) {
            return Resolution::Cancel;
        }

        let active = context.active_flow();
        let strong = self.rules.strong.all_matches(utterance);

        // A usable answer to the pending question outranks lookup keywords
        // that happen to appear inside it.
        if let Some(current) = active {
            if strong.iter().all(|kind| !kind.is_stateful())
                && answers_pending_field(utterance, context)
            {
                return Resolution::Continue(current);
            }
        }

        match strong.as_slice() {
            [] => {}
            [kind] if active == Some(*kind) => return Resolution::Continue(*kind),
            [kind] => {
                return Resolution::Begin {
                    kind: *kind,
                    replaced: active,
                }
            }
            several => {
                return match active {
                    Some(current) if several.contains(&current) => Resolution::Continue(current),
                    _ => Resolution::Ambiguous(several.to_vec()),
                };
            }
        }

        if let Some(current) = active {
            return Resolution::Continue(current);
        }

        let broad = self.rules.broad.first_match(utterance);
        if broad.is_none() && extract_queue_type(utterance).is_some() {
            if let Some(last) = context.last_flow.filter(|k| k.is_stateful()) {
                return Resolution::Begin {
                    kind: last,
                    replaced: None,
                };
            }
        }

        match broad {
            Some(kind) => Resolution::Begin {
                kind,
                replaced: None,
            },
            None => Resolution::Help,
        }
    }
}

/// Whether the utterance is, on its own, a well-formed value for the field
/// the active flow is waiting for.
///
/// Names count only when labelled; a bare phrase could be a question.
fn answers_pending_field(utterance: &str, context: &ConversationContext) -> bool {
    match context.pending_field {
        Some(SlotField::Email) => extract_email(utterance).is_some(),
        Some(SlotField::Phone) => parse_phone_strict(utterance).is_some(),
        Some(SlotField::PatientName | SlotField::FullName) => {
            extract_full_name(utterance, false).is_some()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::flow::{AppointmentStep, Flow};

    fn resolver() -> IntentResolver {
        IntentResolver::default()
    }

    fn idle() -> ConversationContext {
        ConversationContext::new()
    }

    fn booking_at_date() -> ConversationContext {
        let mut ctx = ConversationContext::new();
        ctx.begin(FlowKind::Appointment);
        ctx.collected.insert(SlotField::Facility, "H001");
        ctx.collected.insert(SlotField::Practitioner, "DOC001");
        ctx.await_field(
            Flow::Appointment {
                step: AppointmentStep::SelectDate,
            },
            SlotField::Date,
        );
        ctx
    }

    mod cancellation {
        use super::*;

        #[test]
        fn cancel_wins_over_strong_signals() {
            let r = resolver().resolve("hủy lấy số", &booking_at_date());
            assert_eq!(r, Resolution::Cancel);
        }

        #[test]
        fn cancel_only_at_start_of_utterance() {
            let r = resolver().resolve("tôi muốn reset", &booking_at_date());
            assert_eq!(r, Resolution::Continue(FlowKind::Appointment));
        }

        #[test]
        fn cancel_needs_word_boundary() {
            let r = resolver().resolve("huyết áp cao", &idle());
            assert_eq!(r, Resolution::Help);
        }

        #[test]
        fn english_cancel() {
            assert_eq!(resolver().resolve("Start over", &idle()), Resolution::Cancel);
        }
    }

    mod strong_signals {
        use super::*;

        #[test]
        fn booking_phrase_from_idle() {
            let r = resolver().resolve("đặt lịch khám", &idle());
            assert_eq!(
                r,
                Resolution::Begin {
                    kind: FlowKind::Appointment,
                    replaced: None
                }
            );
        }

        #[test]
        fn status_phrase_overrides_booking() {
            let r = resolver().resolve("còn bao nhiêu số nữa tới lượt tôi", &booking_at_date());
            assert_eq!(
                r,
                Resolution::Begin {
                    kind: FlowKind::QueueStatus,
                    replaced: Some(FlowKind::Appointment)
                }
            );
        }

        #[test]
        fn same_flow_signal_continues() {
            let r = resolver().resolve("đặt lịch", &booking_at_date());
            assert_eq!(r, Resolution::Continue(FlowKind::Appointment));
        }

        #[test]
        fn two_signals_prefer_the_active_flow() {
            let r = resolver().resolve("đặt lịch hay lấy số đây", &booking_at_date());
            assert_eq!(r, Resolution::Continue(FlowKind::Appointment));
        }

        #[test]
        fn two_signals_from_idle_are_ambiguous() {
            let r = resolver().resolve("đặt lịch hay lấy số đây", &idle());
            assert_eq!(
                r,
                Resolution::Ambiguous(vec![FlowKind::Appointment, FlowKind::CheckIn])
            );
        }

        #[test]
        fn appointment_list_is_its_own_flow() {
            let r = resolver().resolve("xem lịch hẹn", &idle());
            assert_eq!(
                r,
                Resolution::Begin {
                    kind: FlowKind::AppointmentList,
                    replaced: None
                }
            );
        }

        #[test]
        fn billing_word_boundary() {
            let r = resolver().resolve("my bill please", &idle());
            assert!(matches!(r, Resolution::Begin { kind: FlowKind::Billing, .. }));
        }
    }

    mod pending_answers {
        use super::*;

        fn booking_awaiting(step: AppointmentStep, field: SlotField) -> ConversationContext {
            let mut ctx = booking_at_date();
            ctx.await_field(Flow::Appointment { step }, field);
            ctx
        }

        #[test]
        fn lookup_signal_mid_flow_still_starts_lookup() {
            let r = resolver().resolve("viện phí", &booking_at_date());
            assert_eq!(
                r,
                Resolution::Begin {
                    kind: FlowKind::Billing,
                    replaced: Some(FlowKind::Appointment)
                }
            );
        }

        #[test]
        fn email_containing_bill_answers_the_question() {
            let ctx = booking_awaiting(AppointmentStep::EnterEmail, SlotField::Email);
            let r = resolver().resolve("bill.nguyen@gmail.com", &ctx);
            assert_eq!(r, Resolution::Continue(FlowKind::Appointment));
        }

        #[test]
        fn labelled_name_answers_the_question() {
            let ctx = booking_awaiting(AppointmentStep::EnterName, SlotField::PatientName);
            let r = resolver().resolve("tên tôi là Bill Trần", &ctx);
            assert_eq!(r, Resolution::Continue(FlowKind::Appointment));
        }

        #[test]
        fn unusable_answer_leaves_lookup_signal_in_charge() {
            let ctx = booking_awaiting(AppointmentStep::EnterEmail, SlotField::Email);
            let r = resolver().resolve("xem hóa đơn", &ctx);
            assert!(matches!(r, Resolution::Begin { kind: FlowKind::Billing, .. }));
        }

        #[test]
        fn stateful_signal_is_not_shadowed() {
            let ctx = booking_awaiting(AppointmentStep::EnterEmail, SlotField::Email);
            let r = resolver().resolve("lấy số a@b.vn", &ctx);
            assert!(matches!(r, Resolution::Begin { kind: FlowKind::CheckIn, .. }));
        }
    }

    mod fallbacks {
        use super::*;

        #[test]
        fn active_flow_continues_without_signal() {
            let r = resolver().resolve("25/12/2030", &booking_at_date());
            assert_eq!(r, Resolution::Continue(FlowKind::Appointment));
        }

        #[test]
        fn broad_keyword_starts_from_idle() {
            let r = resolver().resolve("tôi muốn khám bệnh", &idle());
            assert_eq!(
                r,
                Resolution::Begin {
                    kind: FlowKind::Appointment,
                    replaced: None
                }
            );
        }

        #[test]
        fn bare_queue_type_routes_to_last_flow() {
            let mut ctx = idle();
            ctx.last_flow = Some(FlowKind::Reissue);
            let r = resolver().resolve("BHYT", &ctx);
            assert_eq!(
                r,
                Resolution::Begin {
                    kind: FlowKind::Reissue,
                    replaced: None
                }
            );
        }

        #[test]
        fn bare_queue_type_without_history_is_help() {
            assert_eq!(resolver().resolve("BHYT", &idle()), Resolution::Help);
        }

        #[test]
        fn gibberish_is_help() {
            assert_eq!(resolver().resolve("xin chào", &idle()), Resolution::Help);
        }
    }

    #[test]
    fn rules_are_swappable() {
        let rules = IntentRules {
            cancel: RuleSet::new(),
            strong: RuleSet::new().keywords(FlowKind::Billing, &["money"]),
            broad: RuleSet::new(),
        };
        let resolver = IntentResolver::new(rules);
        assert!(matches!(
            resolver.resolve("money", &idle()),
            Resolution::Begin {
                kind: FlowKind::Billing,
                ..
            }
        ));
        assert_eq!(resolver.resolve("hủy", &idle()), Resolution::Help);
    }
}
