//! Warehouse layout domain: locations, their capacity, and derived zone
//! utilization.
//!
//! Pure in-memory domain logic (no IO, no storage). Occupancy is an
//! independently edited field: recording goods movements elsewhere never
//! changes it.

pub mod location;
pub mod registry;
pub mod seed;
pub mod zone;

pub use location::{
    Extents, Location, LocationDraft, LocationPatch, LocationType, Position, utilization_percent,
};
pub use registry::LocationRegistry;
pub use zone::{
    CapacityTotals, CodePrefix, FirstChar, ZoneKey, ZoneKeyKind, ZoneStatistics, zone_statistics,
};
