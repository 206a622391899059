//! RFID tags and readers.
pub mod reader;
pub mod seed;
pub mod tag;

pub use reader::{ReaderDraft, ReaderRegistry, ReaderStatus, ReaderType, RfidReader};
pub use tag::{LastScan, RfidTag, TagRegistry, TagStatus};

use chrono::{DateTime, Utc};
use wms_core::DomainResult;

/// Registries preloaded with the starter tags and readers.
pub fn seeded(now: DateTime<Utc>) -> DomainResult<(TagRegistry, ReaderRegistry)> {
    let mut tags = TagRegistry::new();
    for tag in seed::tags(now) {
        tags.insert(tag)?;
    }
    let mut readers = ReaderRegistry::new();
    for reader in seed::readers(now) {
        readers.insert(reader)?;
    }
    Ok((tags, readers))
}
