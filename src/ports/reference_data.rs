//! Reference Data Port - Read-only catalogs for the booking flow.

use crate::domain::catalog::{Facility, Practitioner, SlotTable};

/// Immutable catalog of facilities, their practitioners and bookable slots.
///
/// Shared by every conversation; implementations must be safe to read
/// concurrently and never change after construction.
pub trait ReferenceData: Send + Sync {
    fn facilities(&self) -> &[Facility];

    /// Practitioners at a facility; empty for unknown facilities.
    fn practitioners(&self, facility_id: &str) -> &[Practitioner];

    fn time_slots(&self) -> &SlotTable;

    fn facility(&self, facility_id: &str) -> Option<&Facility> {
        self.facilities().iter().find(|f| f.id == facility_id)
    }

    fn practitioner(&self, facility_id: &str, practitioner_id: &str) -> Option<&Practitioner> {
        self.practitioners(facility_id)
            .iter()
            .find(|p| p.id == practitioner_id)
    }
}
