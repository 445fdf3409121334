//! Entity extractors.
//!
//! Each function looks at one raw utterance and returns a candidate value for
//! one field, or `None`. They never fail on malformed input.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::matcher::RuleSet;
use crate::domain::catalog::{SlotTable, TimeSlot};
use crate::domain::records::QueueType;

static PHONE_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:số điện thoại|so dien thoai|sđt|sdt|phone)[\s:]*([0-9]{10,11})\b")
        .expect("phone label pattern")
});

static PHONE_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([0-9]{10,11})\b").expect("bare phone pattern"));

static PHONE_STRICT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0[0-9]{9}$").expect("strict phone pattern"));

static NATIONAL_ID_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:cmnd|cccd|căn cước|can cuoc)[\s:]*([0-9]{9,12})\b")
        .expect("national id label pattern")
});

static NATIONAL_ID_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([0-9]{12}|[0-9]{9})\b").expect("bare national id pattern"));

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$").expect("date pattern")
});

static CLOCK_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}$").expect("clock time pattern"));

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

static NAME_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:họ và tên|họ tên|ho ten|tên tôi là|ten toi la|tên là|ten la|tên|ten|tôi là|toi la|mình là|minh la|my name is|name is|name)[\s:]+(\p{L}+(?:[ \t]+\p{L}+)*)",
    )
    .expect("name label pattern")
});

static NAME_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{L}+(?: \p{L}+){1,4}$").expect("bare name pattern"));

/// Words that start another labelled field and so end a labelled name.
const NAME_STOP_WORDS: &[&str] = &[
    "sđt", "sdt", "số", "so", "phone", "cccd", "cmnd", "email", "bhyt", "dv", "loại", "loai",
];

static QUEUE_TYPES: Lazy<RuleSet<QueueType>> = Lazy::new(|| {
    RuleSet::new()
        .regex(
            QueueType::Insurance,
            Regex::new(r"\bbhyt\b").expect("bhyt pattern"),
        )
        .keywords(QueueType::Insurance, &["bảo hiểm", "bao hiem", "insurance"])
        .keywords(QueueType::Service, &["dịch vụ", "dich vu"])
        .regex(QueueType::Service, Regex::new(r"\bdv\b").expect("dv pattern"))
        .regex(QueueType::Service, Regex::new(r"\bservice\b").expect("service pattern"))
});

const SKIP_WORDS: &[&str] = &["bỏ qua", "bo qua", "skip", "không có", "khong co"];

const CONFIRM_WORDS: &[&str] = &[
    "xác nhận", "xac nhan", "confirm", "đồng ý", "dong y", "ok", "thử lại", "thu lai", "retry",
];

fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Locates a phone-like token: labelled, or a bare 10-11 digit run.
///
/// The token is not checked against the phone grammar; see [`parse_phone_strict`].
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_LABELED
        .captures(text)
        .or_else(|| PHONE_BARE.captures(text))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Phone number: `0` followed by nine digits once whitespace is stripped,
/// either as the whole answer or as a labelled or bare token inside it.
pub fn parse_phone_strict(text: &str) -> Option<String> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if PHONE_STRICT.is_match(&compact) {
        return Some(compact);
    }
    extract_phone(text).filter(|p| PHONE_STRICT.is_match(p))
}

/// National ID: labelled or bare, exactly 9 or 12 digits.
pub fn extract_national_id(text: &str) -> Option<String> {
    let valid = |s: &str| s.len() == 9 || s.len() == 12;
    if let Some(id) = NATIONAL_ID_LABELED
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|s| valid(s))
    {
        return Some(id.to_string());
    }
    NATIONAL_ID_BARE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parses `DD/MM/YYYY` into a real calendar date, ignoring how far away it is.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let caps = DATE.captures(text.trim())?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Appointment date: `DD/MM/YYYY`, not earlier than `today`.
pub fn extract_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    parse_calendar_date(text).filter(|date| *date >= today)
}

/// Time slot by 1-based menu index or by an exact `HH:MM` literal.
pub fn extract_time_slot(text: &str, slots: &SlotTable) -> Option<TimeSlot> {
    let answer = text.trim();
    if let Ok(index) = answer.parse::<usize>() {
        return slots.by_index(index);
    }
    if !CLOCK_TIME.is_match(answer) {
        return None;
    }
    answer
        .parse::<TimeSlot>()
        .ok()
        .filter(|slot| slots.contains(*slot))
}

/// Full name from a labelled phrase, or, when `name_pending`, from an answer
/// made of two to five alphabetic words.
pub fn extract_full_name(text: &str, name_pending: bool) -> Option<String> {
    if let Some(captured) = NAME_LABELED.captures(text).and_then(|c| c.get(1)) {
        let words: Vec<&str> = captured
            .as_str()
            .split_whitespace()
            .take_while(|w| !NAME_STOP_WORDS.contains(&w.to_lowercase().as_str()))
            .collect();
        if !words.is_empty() {
            return Some(words.join(" "));
        }
    }

    if !name_pending || is_skip(text) {
        return None;
    }
    let answer = normalize_spaces(text);
    NAME_BARE.is_match(&answer).then_some(answer)
}

pub fn extract_email(text: &str) -> Option<String> {
    let answer = text.trim();
    EMAIL.is_match(answer).then(|| answer.to_string())
}

pub fn extract_queue_type(text: &str) -> Option<QueueType> {
    QUEUE_TYPES.first_match(text)
}

/// The user declined to give an optional value.
pub fn is_skip(text: &str) -> bool {
    let answer = normalize_spaces(&text.to_lowercase());
    SKIP_WORDS.contains(&answer.as_str())
}

/// The user gave the go-ahead at a confirm or retry prompt.
pub fn is_confirmation(text: &str) -> bool {
    let answer = normalize_spaces(&text.to_lowercase());
    CONFIRM_WORDS.contains(&answer.as_str())
}
