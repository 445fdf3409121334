//! Built-in facility and practitioner catalog.

use std::collections::HashMap;

use crate::domain::catalog::{Facility, Practitioner, SlotTable};
use crate::ports::ReferenceData;

/// Catalog held entirely in memory and fixed at construction.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    facilities: Vec<Facility>,
    practitioners: HashMap<String, Vec<Practitioner>>,
    slots: SlotTable,
}

impl StaticCatalog {
    pub fn new(
        facilities: Vec<Facility>,
        practitioners: HashMap<String, Vec<Practitioner>>,
        slots: SlotTable,
    ) -> Self {
        Self {
            facilities,
            practitioners,
            slots,
        }
    }

    /// The four Ho Chi Minh City hospitals the assistant books for.
    pub fn builtin() -> Self {
        let facilities = vec![
            Facility::new(
                "H001",
                "Bệnh viện Chợ Rẫy",
                "201B Nguyễn Chí Thanh, Quận 5, TP.HCM",
                "028 3855 4137",
            ),
            Facility::new(
                "H002",
                "Bệnh viện Đại học Y Dược",
                "215 Hồng Bàng, Quận 5, TP.HCM",
                "028 3855 2222",
            ),
            Facility::new(
                "H003",
                "Bệnh viện Nhi Đồng 1",
                "341 Sư Vạn Hạnh, Quận 10, TP.HCM",
                "028 3865 3333",
            ),
            Facility::new(
                "H004",
                "Bệnh viện Thống Nhất",
                "1 Lý Thường Kiệt, Quận 10, TP.HCM",
                "028 3865 4444",
            ),
        ];

        let roster = |entries: &[(&str, &str, &str)]| {
            entries
                .iter()
                .map(|(id, name, phone)| Practitioner::new(*id, *name, *phone))
                .collect::<Vec<_>>()
        };

        let practitioners = HashMap::from([
            (
                "H001".to_string(),
                roster(&[
                    ("DOC001", "BS. Nguyễn Văn A", "0901234567"),
                    ("DOC002", "BS. Trần Thị B", "0902345678"),
                    ("DOC003", "BS. Lê Văn C", "0903456789"),
                ]),
            ),
            (
                "H002".to_string(),
                roster(&[
                    ("DOC004", "BS. Phạm Thị D", "0904567890"),
                    ("DOC005", "BS. Hoàng Văn E", "0905678901"),
                    ("DOC006", "BS. Võ Thị F", "0906789012"),
                ]),
            ),
            (
                "H003".to_string(),
                roster(&[
                    ("DOC007", "BS. Đặng Văn G", "0907890123"),
                    ("DOC008", "BS. Bùi Thị H", "0908901234"),
                ]),
            ),
            (
                "H004".to_string(),
                roster(&[
                    ("DOC009", "BS. Ngô Văn I", "0909012345"),
                    ("DOC010", "BS. Dương Thị K", "0910123456"),
                ]),
            ),
        ]);

        Self::new(facilities, practitioners, SlotTable::half_hourly())
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ReferenceData for StaticCatalog {
    fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    fn practitioners(&self, facility_id: &str) -> &[Practitioner] {
        self.practitioners
            .get(facility_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn time_slots(&self) -> &SlotTable {
        &self.slots
    }
}
