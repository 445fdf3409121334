//! Catalog module - Facilities, practitioners and bookable slots.

mod facility;
mod selection;
mod time_slot;

pub use facility::{Facility, Practitioner};
pub use selection::{numbered_menu, select_by_index_or_name, Named};
pub use time_slot::{SlotTable, TimeSlot};
