//! Bookable time-of-day slots.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// A bookable start time, rendered as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    /// Creates a slot from hour and minute, rejecting impossible values.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| ValidationError::invalid_format("time_slot", format!("{hour}:{minute}")))
    }

    pub fn as_time(&self) -> NaiveTime {
        self.0
    }

    /// Morning slots start before noon.
    pub fn is_morning(&self) -> bool {
        self.0.hour() < 12
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl FromStr for TimeSlot {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(Self)
            .map_err(|_| ValidationError::invalid_format("time_slot", trimmed))
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Ordered list of bookable slots; menus address it with 1-based indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTable {
    slots: Vec<TimeSlot>,
}

impl SlotTable {
    pub fn new(mut slots: Vec<TimeSlot>) -> Self {
        slots.sort();
        slots.dedup();
        Self { slots }
    }

    /// Half-hour slots from 06:00 through 18:30 inclusive.
    pub fn half_hourly() -> Self {
        let slots = (6..=18)
            .flat_map(|hour| [(hour, 0), (hour, 30)])
            .filter_map(|(h, m)| TimeSlot::from_hm(h, m).ok())
            .collect();
        Self::new(slots)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeSlot> {
        self.slots.iter()
    }

    /// Looks up a slot by its 1-based menu position.
    pub fn by_index(&self, index: usize) -> Option<TimeSlot> {
        index.checked_sub(1).and_then(|i| self.slots.get(i)).copied()
    }

    /// Returns the 1-based menu position of a slot.
    pub fn position(&self, slot: TimeSlot) -> Option<usize> {
        self.slots.iter().position(|s| *s == slot).map(|i| i + 1)
    }

    pub fn contains(&self, slot: TimeSlot) -> bool {
        self.slots.contains(&slot)
    }

    /// Splits the table into (morning, afternoon) while keeping menu numbers.
    pub fn grouped(&self) -> (Vec<(usize, TimeSlot)>, Vec<(usize, TimeSlot)>) {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (i + 1, *slot))
            .partition(|(_, slot)| slot.is_morning())
    }
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::half_hourly()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_hourly_table_spans_six_to_half_past_six() {
        let table = SlotTable::half_hourly();
        assert_eq!(table.len(), 26);
        assert_eq!(table.by_index(1).unwrap().to_string(), "06:00");
        assert_eq!(table.by_index(26).unwrap().to_string(), "18:30");
    }

    #[test]
    fn by_index_is_one_based_and_bounded() {
        let table = SlotTable::half_hourly();
        assert!(table.by_index(0).is_none());
        assert!(table.by_index(27).is_none());
        assert_eq!(table.by_index(5).unwrap().to_string(), "08:00");
    }

    #[test]
    fn position_mirrors_by_index() {
        let table = SlotTable::half_hourly();
        let slot: TimeSlot = "08:00".parse().unwrap();
        assert_eq!(table.position(slot), Some(5));
    }

    #[test]
    fn parses_hh_mm_and_rejects_garbage() {
        assert_eq!("09:30".parse::<TimeSlot>().unwrap().to_string(), "09:30");
        assert!("9h30".parse::<TimeSlot>().is_err());
        assert!("25:00".parse::<TimeSlot>().is_err());
    }

    #[test]
    fn grouped_splits_at_noon_and_keeps_numbers() {
        let (morning, afternoon) = SlotTable::half_hourly().grouped();
        assert_eq!(morning.len(), 12);
        assert_eq!(afternoon.len(), 14);
        assert_eq!(afternoon[0].0, 13);
        assert_eq!(afternoon[0].1.to_string(), "12:00");
    }

    #[test]
    fn new_sorts_and_dedups() {
        let a = TimeSlot::from_hm(9, 0).unwrap();
        let b = TimeSlot::from_hm(7, 30).unwrap();
        let table = SlotTable::new(vec![a, b, a]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.by_index(1), Some(b));
    }

    #[test]
    fn serializes_as_string() {
        let slot = TimeSlot::from_hm(14, 30).unwrap();
        assert_eq!(serde_json::to_string(&slot).unwrap(), "\"14:30\"");
        let back: TimeSlot = serde_json::from_str("\"14:30\"").unwrap();
        assert_eq!(back, slot);
    }
}
