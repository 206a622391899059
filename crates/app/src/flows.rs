//! Operations that span several registries.
//!
//! Every flow requires a signed-in session and records the session user on
//! the movements it creates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wms_core::{
    DomainError, DomainResult, LocationId, Page, Pagination, ProductId, ReaderId, TagId, UserId,
};
use wms_inventory::{
    Alert, AlertDraft, AlertType, Movement, MovementDraft, MovementQuery, MovementSearch, Severity,
};
use wms_rfid::{LastScan, RfidTag};

use crate::app::WarehouseApp;

/// Goods-in form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsReceipt {
    pub product_id: ProductId,
    pub tag_id: TagId,
    pub to_location_id: LocationId,
    pub quantity: u64,
    #[serde(default)]
    pub batch_number: Option<String>,
}

/// Goods-out form. The source is wherever the tag currently sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsDispatch {
    pub tag_id: TagId,
    pub quantity: u64,
    pub destination: String,
    pub reason: String,
}

/// Result of a recorded movement, plus the capacity alert it triggered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementOutcome {
    pub movement: Movement,
    pub capacity_alert: Option<Alert>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanOutcome {
    pub tag: RfidTag,
    /// Raised when the scanned tag is not active.
    pub alert: Option<Alert>,
}

impl WarehouseApp {
    pub fn receive_goods(
        &mut self,
        receipt: GoodsReceipt,
        now: DateTime<Utc>,
    ) -> DomainResult<MovementOutcome> {
        let user_id = self.session_user()?;
        self.products.get_by_id(&receipt.product_id)?;
        let tag = self.tags.get_by_id(&receipt.tag_id)?;
        if tag.product_id != receipt.product_id {
            return Err(DomainError::validation(format!(
                "tag {} belongs to product {}, not {}",
                tag.tag_code, tag.product_id, receipt.product_id
            )));
        }
        let destination = self.locations.get_by_id(&receipt.to_location_id)?;
        if !destination.location_type.is_storage() {
            return Err(DomainError::validation(format!(
                "goods can only be received into rack or staging locations, {} is {}",
                destination.code,
                destination.location_type.as_str()
            )));
        }

        let mut draft = MovementDraft::inbound(
            receipt.tag_id.clone(),
            receipt.product_id.clone(),
            receipt.to_location_id.clone(),
            receipt.quantity,
            user_id,
        );
        if let Some(batch) = receipt
            .batch_number
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
        {
            draft = draft.with_notes(format!("Batch: {batch}"));
        }
        draft.validate()?;

        let capacity_alert = self.check_capacity(
            &receipt.to_location_id,
            receipt.quantity,
            Some(&receipt.product_id),
            &receipt.tag_id,
            now,
        )?;
        let movement = self.movements.record(draft, now)?;
        self.tags.assign_location(&receipt.tag_id, Some(receipt.to_location_id))?;

        tracing::info!(
            movement_id = %movement.id,
            tag_id = %receipt.tag_id,
            quantity = movement.quantity,
            "goods received"
        );
        Ok(MovementOutcome {
            movement,
            capacity_alert,
        })
    }

    pub fn dispatch_goods(
        &mut self,
        dispatch: GoodsDispatch,
        now: DateTime<Utc>,
    ) -> DomainResult<Movement> {
        let user_id = self.session_user()?;
        let tag = self.tags.get_by_id(&dispatch.tag_id)?;
        let from = tag.location_id.clone().ok_or_else(|| {
            DomainError::validation(format!("tag {} is not at any location", tag.tag_code))
        })?;

        let draft = MovementDraft::outbound(
            dispatch.tag_id.clone(),
            tag.product_id.clone(),
            from,
            dispatch.quantity,
            user_id,
        )
        .with_notes(format!(
            "Destination: {}, Reason: {}",
            dispatch.destination.trim(),
            dispatch.reason.trim()
        ));
        let movement = self.movements.record(draft, now)?;
        self.tags.assign_location(&dispatch.tag_id, None)?;

        tracing::info!(movement_id = %movement.id, tag_id = %dispatch.tag_id, "goods dispatched");
        Ok(movement)
    }

    pub fn transfer_goods(
        &mut self,
        tag_id: &TagId,
        to_location_id: &LocationId,
        quantity: u64,
        now: DateTime<Utc>,
    ) -> DomainResult<MovementOutcome> {
        let user_id = self.session_user()?;
        let tag = self.tags.get_by_id(tag_id)?;
        let from = tag.location_id.clone().ok_or_else(|| {
            DomainError::validation(format!("tag {} is not at any location", tag.tag_code))
        })?;
        let product_id = tag.product_id.clone();
        self.locations.get_by_id(to_location_id)?;

        let draft = MovementDraft::transfer(
            tag_id.clone(),
            product_id.clone(),
            from,
            to_location_id.clone(),
            quantity,
            user_id,
        );
        // Shape errors (same source and destination) surface before any alert.
        draft.validate()?;

        let capacity_alert =
            self.check_capacity(to_location_id, quantity, Some(&product_id), tag_id, now)?;
        let movement = self.movements.record(draft, now)?;
        self.tags.assign_location(tag_id, Some(to_location_id.clone()))?;

        tracing::info!(
            movement_id = %movement.id,
            tag_id = %tag_id,
            to = %to_location_id,
            "goods transferred"
        );
        Ok(MovementOutcome {
            movement,
            capacity_alert,
        })
    }

    pub fn scan_tag(
        &mut self,
        tag_id: &TagId,
        reader_id: &ReaderId,
        now: DateTime<Utc>,
    ) -> DomainResult<ScanOutcome> {
        self.session_user()?;
        let reader = self.readers.get_by_id(reader_id)?;
        if !reader.can_scan() {
            return Err(DomainError::validation(format!(
                "reader {} cannot scan while {:?}",
                reader.name, reader.status
            )));
        }
        let site = reader.location.clone();
        self.tags.get_by_id(tag_id)?;

        self.readers.touch(reader_id, now)?;
        let tag = self.tags.record_scan(
            tag_id,
            LastScan {
                reader_id: reader_id.clone(),
                timestamp: now,
                location: site,
            },
        )?;

        let alert = if tag.is_active() {
            None
        } else {
            let sku = self
                .products
                .get(&tag.product_id)
                .map(|p| p.sku.clone())
                .unwrap_or_else(|| tag.product_id.to_string());
            let mut draft = AlertDraft::new(
                AlertType::Unauthorized,
                Severity::High,
                format!("Unauthorized movement detected for product {sku}"),
            )
            .for_product(tag.product_id.clone())
            .for_tag(tag.id.clone());
            if let Some(location_id) = &tag.location_id {
                draft = draft.at_location(location_id.clone());
            }
            Some(self.alerts.create(draft, now)?)
        };

        tracing::debug!(
            tag_id = %tag_id,
            reader_id = %reader_id,
            alerted = alert.is_some(),
            "tag scanned"
        );
        Ok(ScanOutcome { tag, alert })
    }

    /// One `expired` alert per product past its expiry date (as of `now`'s UTC
    /// day) that has no open expiry alert yet.
    pub fn raise_expiry_alerts(&mut self, now: DateTime<Utc>) -> DomainResult<Vec<Alert>> {
        self.session_user()?;
        let today = now.date_naive();
        let due: Vec<AlertDraft> = self
            .products
            .expired_as_of(today)
            .into_iter()
            .filter(|p| !self.alerts.has_unresolved(AlertType::Expired, &p.id))
            .map(|p| {
                let expired_on = p.expiry_date.map(|d| d.to_string()).unwrap_or_default();
                AlertDraft::new(
                    AlertType::Expired,
                    Severity::Medium,
                    format!("Product {} ({}) expired on {expired_on}", p.sku, p.name),
                )
                .for_product(p.id.clone())
            })
            .collect();

        due.into_iter().map(|draft| self.alerts.create(draft, now)).collect()
    }

    pub fn register_tag(
        &mut self,
        product_id: &ProductId,
        tag_code: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<RfidTag> {
        self.session_user()?;
        self.products.get_by_id(product_id)?;
        self.tags.register(product_id.clone(), tag_code, now)
    }

    /// Movement query with free-text search over movement ids and product
    /// names/SKUs.
    pub fn search_movements(
        &self,
        term: &str,
        mut query: MovementQuery,
    ) -> DomainResult<Page<Movement>> {
        self.session_user()?;
        if !term.trim().is_empty() {
            query.filter.search = Some(MovementSearch {
                term: term.to_string(),
                product_ids: self.products.matching_ids(term),
            });
        }
        Ok(self.movements.query(&query))
    }

    pub fn search_tags(&self, term: &str, pagination: Pagination) -> DomainResult<Page<RfidTag>> {
        self.session_user()?;
        let products = self.products.matching_ids(term);
        Ok(self.tags.search(term, &products, pagination))
    }

    pub(crate) fn session_user(&self) -> DomainResult<UserId> {
        Ok(self.session.require_user()?.id.clone())
    }

    /// Read-only: raises a `capacity` alert when `quantity` more units would
    /// push the destination past the warning threshold. Never blocks.
    fn check_capacity(
        &mut self,
        location_id: &LocationId,
        quantity: u64,
        product_id: Option<&ProductId>,
        tag_id: &TagId,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<Alert>> {
        let location = self.locations.get_by_id(location_id)?;
        let projected = location.occupied.saturating_add(quantity);
        let percent = if location.capacity == 0 {
            if projected == 0 { 0.0 } else { f64::INFINITY }
        } else {
            projected as f64 / location.capacity as f64 * 100.0
        };
        if percent <= self.capacity_warning_percent {
            return Ok(None);
        }

        let severity = if projected > location.capacity {
            Severity::High
        } else {
            Severity::Medium
        };
        let message = format!(
            "Location {} would hold {projected} of {} units ({percent:.1}% of capacity)",
            location.code, location.capacity
        );
        let mut draft = AlertDraft::new(AlertType::Capacity, severity, message)
            .at_location(location_id.clone())
            .for_tag(tag_id.clone());
        if let Some(product_id) = product_id {
            draft = draft.for_product(product_id.clone());
        }
        Ok(Some(self.alerts.create(draft, now)?))
    }
}
