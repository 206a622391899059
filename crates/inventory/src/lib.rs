//! Goods movements and operational alerts.
//!
//! Both logs are plain in-memory collections; they hold identifiers of
//! locations, products and tags but never dereference them. Cross-registry
//! checks belong to the composition root.

pub mod alert;
pub mod movement;
pub mod seed;

pub use alert::{Alert, AlertDraft, AlertLog, AlertType, Severity};
pub use movement::{
    Movement, MovementDraft, MovementFilter, MovementLog, MovementPatch, MovementQuery,
    MovementSearch, MovementSort, MovementSortKey, MovementStatus, MovementType,
};

use chrono::{DateTime, Utc};
use wms_core::DomainResult;

/// Logs preloaded with the starter intake movement and its alert.
pub fn seeded(now: DateTime<Utc>) -> DomainResult<(MovementLog, AlertLog)> {
    let mut movements = MovementLog::new();
    for movement in seed::movements(now) {
        movements.insert(movement)?;
    }
    let mut alerts = AlertLog::new();
    for alert in seed::alerts(now) {
        alerts.insert(alert)?;
    }
    Ok((movements, alerts))
}
