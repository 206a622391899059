use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wms_core::{
    DomainError, DomainResult, Entity, EntityList, LocationId, Page, Pagination, ProductId,
    ReaderId, TagId, ensure_not_blank,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStatus {
    Active,
    Inactive,
    Pending,
}

/// Most recent read of a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastScan {
    pub reader_id: ReaderId,
    pub timestamp: DateTime<Utc>,
    /// Site label of the reader at scan time.
    pub location: String,
}

/// An RFID tag attached to a product.
///
/// `tag_code` is the identifier printed on/encoded in the physical tag;
/// `id` is the registry key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfidTag {
    pub id: TagId,
    pub tag_code: String,
    pub product_id: ProductId,
    pub status: TagStatus,
    pub location_id: Option<LocationId>,
    pub last_scan: Option<LastScan>,
    pub registered_at: DateTime<Utc>,
}

impl Entity for RfidTag {
    type Id = TagId;
    const KIND: &'static str = "rfid tag";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl RfidTag {
    pub fn is_active(&self) -> bool {
        self.status == TagStatus::Active
    }
}

/// Registry of RFID tags.
///
/// # Invariants
/// - Tag codes are unique (case-insensitive) and non-blank.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: EntityList<RfidTag>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn list(&self) -> &[RfidTag] {
        self.tags.as_slice()
    }

    /// Register a new, active tag for `product_id`.
    ///
    /// Product existence is the caller's concern (the catalog lives elsewhere).
    pub fn register(
        &mut self,
        product_id: ProductId,
        tag_code: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<RfidTag> {
        self.insert(RfidTag {
            id: TagId::generate(),
            tag_code: tag_code.into().trim().to_string(),
            product_id,
            status: TagStatus::Active,
            location_id: None,
            last_scan: None,
            registered_at: now,
        })
    }

    pub fn insert(&mut self, tag: RfidTag) -> DomainResult<RfidTag> {
        ensure_not_blank("tag code", &tag.tag_code)?;
        if let Some(existing) = self.find_by_code(&tag.tag_code) {
            return Err(DomainError::conflict(format!(
                "tag code {} is already registered as {}",
                tag.tag_code, existing.id
            )));
        }
        let created = self.tags.push(tag)?.clone();
        tracing::debug!(tag_id = %created.id, tag_code = %created.tag_code, "rfid tag registered");
        Ok(created)
    }

    /// Mark a tag inactive. Deactivating an inactive tag is a no-op.
    pub fn deactivate(&mut self, id: &TagId) -> DomainResult<RfidTag> {
        self.set_status(id, TagStatus::Inactive)
    }

    pub fn activate(&mut self, id: &TagId) -> DomainResult<RfidTag> {
        self.set_status(id, TagStatus::Active)
    }

    pub fn assign_location(
        &mut self,
        id: &TagId,
        location_id: Option<LocationId>,
    ) -> DomainResult<RfidTag> {
        self.modify(id, |tag| tag.location_id = location_id)
    }

    pub fn record_scan(&mut self, id: &TagId, scan: LastScan) -> DomainResult<RfidTag> {
        self.modify(id, |tag| tag.last_scan = Some(scan))
    }

    pub fn delete(&mut self, id: &TagId) -> DomainResult<RfidTag> {
        self.tags.remove(id)
    }

    pub fn get(&self, id: &TagId) -> Option<&RfidTag> {
        self.tags.get(id)
    }

    pub fn get_by_id(&self, id: &TagId) -> DomainResult<&RfidTag> {
        self.tags.get_required(id)
    }

    pub fn find_by_code(&self, tag_code: &str) -> Option<&RfidTag> {
        let tag_code = tag_code.trim();
        self.tags.find(|t| t.tag_code.eq_ignore_ascii_case(tag_code))
    }

    pub fn active_count(&self) -> usize {
        self.tags.iter().filter(|t| t.is_active()).count()
    }

    pub fn for_product(&self, product_id: &ProductId) -> Vec<&RfidTag> {
        self.tags.iter().filter(|t| &t.product_id == product_id).collect()
    }

    /// Tags whose code contains `term` (case-insensitive) or that belong to one
    /// of `matching_products`. A blank term returns everything.
    pub fn search(
        &self,
        term: &str,
        matching_products: &[ProductId],
        pagination: Pagination,
    ) -> Page<RfidTag> {
        let term = term.trim().to_lowercase();
        let hits = self
            .tags
            .iter()
            .filter(|t| {
                term.is_empty()
                    || t.tag_code.to_lowercase().contains(&term)
                    || matching_products.contains(&t.product_id)
            })
            .cloned()
            .collect();
        pagination.apply(hits)
    }

    fn set_status(&mut self, id: &TagId, status: TagStatus) -> DomainResult<RfidTag> {
        let tag = self.modify(id, |tag| tag.status = status)?;
        tracing::debug!(tag_id = %id, ?status, "rfid tag status changed");
        Ok(tag)
    }

    fn modify(&mut self, id: &TagId, f: impl FnOnce(&mut RfidTag)) -> DomainResult<RfidTag> {
        let updated = self.tags.replace_with(id, |current| {
            let mut next = current.clone();
            f(&mut next);
            Ok(next)
        })?;
        Ok(updated.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
    }

    fn registry() -> TagRegistry {
        let mut registry = TagRegistry::new();
        for tag in crate::seed::tags(now()) {
            registry.insert(tag).unwrap();
        }
        registry
    }

    #[test]
    fn register_starts_active_and_unplaced() {
        let mut registry = registry();
        let tag = registry.register(ProductId::from("1"), " AJINO-000123 ", now()).unwrap();

        assert_eq!(tag.status, TagStatus::Active);
        assert_eq!(tag.tag_code, "AJINO-000123");
        assert!(tag.location_id.is_none());
        assert!(tag.last_scan.is_none());
        assert_eq!(tag.registered_at, now());
        assert_eq!(registry.active_count(), 3);
    }

    #[test]
    fn duplicate_tag_code_conflicts() {
        let mut registry = registry();
        let err = registry.register(ProductId::from("2"), "rfid-001-aji", now()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn blank_tag_code_is_rejected() {
        let mut registry = TagRegistry::new();
        assert!(matches!(
            registry.register(ProductId::from("1"), "  ", now()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn deactivate_is_idempotent_and_reports_missing() {
        let mut registry = registry();
        let id = TagId::from("1");
        assert_eq!(registry.deactivate(&id).unwrap().status, TagStatus::Inactive);
        assert_eq!(registry.deactivate(&id).unwrap().status, TagStatus::Inactive);
        assert_eq!(registry.active_count(), 1);

        assert!(registry.deactivate(&TagId::from("ghost")).unwrap_err().is_not_found());
    }

    #[test]
    fn scans_and_placement_are_recorded() {
        let mut registry = registry();
        let id = TagId::from("2");
        registry.assign_location(&id, Some(LocationId::from("rack-b-1"))).unwrap();
        let scanned = registry
            .record_scan(
                &id,
                LastScan {
                    reader_id: ReaderId::from("reader-2"),
                    timestamp: now(),
                    location: "Inventory Control".to_string(),
                },
            )
            .unwrap();

        assert_eq!(scanned.location_id, Some(LocationId::from("rack-b-1")));
        assert_eq!(scanned.last_scan.unwrap().reader_id, ReaderId::from("reader-2"));
    }

    #[test]
    fn search_by_code_or_product() {
        let registry = registry();
        let by_code = registry.search("002", &[], Pagination::default());
        assert_eq!(by_code.total, 1);
        assert_eq!(by_code.items[0].id, TagId::from("2"));

        let by_product = registry.search("msg 1kg", &[ProductId::from("1")], Pagination::default());
        assert_eq!(by_product.total, 1);
        assert_eq!(by_product.items[0].id, TagId::from("1"));

        assert_eq!(registry.search("", &[], Pagination::page(1, 20)).total, 2);
        assert_eq!(registry.for_product(&ProductId::from("2")).len(), 1);
    }
}
