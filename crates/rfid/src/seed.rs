//! Starter tags and readers. Timestamps that were "now" in the dashboard's
//! mock data are taken from the caller.

use chrono::{DateTime, TimeZone, Utc};

use wms_core::{LocationId, ProductId, ReaderId, TagId};

use crate::reader::{ReaderStatus, ReaderType, RfidReader};
use crate::tag::{LastScan, RfidTag, TagStatus};

fn tag(
    id: &str,
    code: &str,
    product: &str,
    location: &str,
    reader: &str,
    site: &str,
    now: DateTime<Utc>,
) -> RfidTag {
    RfidTag {
        id: TagId::from(id),
        tag_code: code.to_string(),
        product_id: ProductId::from(product),
        status: TagStatus::Active,
        location_id: Some(LocationId::from(location)),
        last_scan: Some(LastScan {
            reader_id: ReaderId::from(reader),
            timestamp: now,
            location: site.to_string(),
        }),
        registered_at: now,
    }
}

/// Tag `"2"` points at `rack-b-3`, which is not a seeded location.
pub fn tags(now: DateTime<Utc>) -> Vec<RfidTag> {
    vec![
        tag("1", "RFID-001-AJI", "1", "rack-a-1", "reader-1", "Warehouse Zone A", now),
        tag("2", "RFID-002-AJI", "2", "rack-b-3", "reader-2", "Warehouse Zone B", now),
    ]
}

pub fn readers(now: DateTime<Utc>) -> Vec<RfidReader> {
    let serviced = |m, d| Utc.with_ymd_and_hms(2023, m, d, 0, 0, 0).single();
    vec![
        RfidReader {
            id: ReaderId::from("reader-1"),
            name: "RFID Gate 1".to_string(),
            reader_type: ReaderType::Fixed,
            location: "Warehouse Entrance".to_string(),
            status: ReaderStatus::Active,
            last_maintenance: serviced(12, 15),
            last_active: Some(now),
        },
        RfidReader {
            id: ReaderId::from("reader-2"),
            name: "Handheld Scanner 1".to_string(),
            reader_type: ReaderType::Handheld,
            location: "Inventory Control".to_string(),
            status: ReaderStatus::Active,
            last_maintenance: serviced(11, 20),
            last_active: Some(now),
        },
    ]
}
