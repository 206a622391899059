//! Starter movement and alert, stamped with the caller's clock.

use chrono::{DateTime, Utc};

use wms_core::{AlertId, LocationId, MovementId, ProductId, TagId, UserId};

use crate::alert::{Alert, AlertType, Severity};
use crate::movement::{Movement, MovementDraft};

pub fn movements(now: DateTime<Utc>) -> Vec<Movement> {
    let intake = MovementDraft::inbound(
        TagId::from("1"),
        ProductId::from("1"),
        LocationId::from("rack-a-1"),
        10,
        UserId::from("1"),
    )
    .with_notes("Regular inventory intake");
    vec![Movement::from_draft(MovementId::from("mov-1"), intake, now)]
}

pub fn alerts(now: DateTime<Utc>) -> Vec<Alert> {
    vec![Alert {
        id: AlertId::from("alert-1"),
        alert_type: AlertType::Unauthorized,
        severity: Severity::High,
        message: "Unauthorized movement detected for product AJI-MSG-001".to_string(),
        product_id: Some(ProductId::from("1")),
        location_id: None,
        rfid_tag_id: Some(TagId::from("1")),
        timestamp: now,
        resolved: false,
        resolved_by: None,
        resolved_at: None,
    }]
}
