use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use wms_core::{
    DomainError, DomainResult, Entity, EntityList, LocationId, MovementId, Page, Pagination,
    ProductId, SortDirection, TagId, UserId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    In,
    Out,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementStatus {
    Pending,
    Completed,
    Cancelled,
    Failed,
}

impl MovementStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementStatus::Pending => "pending",
            MovementStatus::Completed => "completed",
            MovementStatus::Cancelled => "cancelled",
            MovementStatus::Failed => "failed",
        }
    }
}

/// A recorded goods movement (inbound, outbound, or between locations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub rfid_tag_id: TagId,
    pub product_id: ProductId,
    pub from_location_id: Option<LocationId>,
    pub to_location_id: Option<LocationId>,
    pub quantity: u64,
    pub status: MovementStatus,
    pub timestamp: DateTime<Utc>,
    pub user_id: UserId,
    pub notes: Option<String>,
}

impl Entity for Movement {
    type Id = MovementId;
    const KIND: &'static str = "movement";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Movement {
    pub fn from_draft(id: MovementId, draft: MovementDraft, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            movement_type: draft.movement_type,
            rfid_tag_id: draft.rfid_tag_id,
            product_id: draft.product_id,
            from_location_id: draft.from_location_id,
            to_location_id: draft.to_location_id,
            quantity: draft.quantity,
            status: draft.status,
            timestamp,
            user_id: draft.user_id,
            notes: draft.notes,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_shape(
            self.movement_type,
            self.quantity,
            self.from_location_id.as_ref(),
            self.to_location_id.as_ref(),
        )
    }

    /// Either endpoint equals `location_id`.
    pub fn touches(&self, location_id: &LocationId) -> bool {
        self.from_location_id.as_ref() == Some(location_id)
            || self.to_location_id.as_ref() == Some(location_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementDraft {
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub rfid_tag_id: TagId,
    pub product_id: ProductId,
    #[serde(default)]
    pub from_location_id: Option<LocationId>,
    #[serde(default)]
    pub to_location_id: Option<LocationId>,
    pub quantity: u64,
    pub status: MovementStatus,
    pub user_id: UserId,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Shape rules: `in` needs a destination, `out` needs a source, and a
/// `transfer` needs two distinct endpoints. Quantity is never zero.
fn validate_shape(
    movement_type: MovementType,
    quantity: u64,
    from: Option<&LocationId>,
    to: Option<&LocationId>,
) -> DomainResult<()> {
    if quantity == 0 {
        return Err(DomainError::validation("quantity must be greater than zero"));
    }
    match (movement_type, from, to) {
        (MovementType::In, _, None) => {
            Err(DomainError::validation("inbound movement requires a destination"))
        }
        (MovementType::Out, None, _) => {
            Err(DomainError::validation("outbound movement requires a source"))
        }
        (MovementType::Transfer, Some(from), Some(to)) if from == to => Err(
            DomainError::validation(format!("transfer source and destination are both {from}")),
        ),
        (MovementType::Transfer, None, _) | (MovementType::Transfer, _, None) => {
            Err(DomainError::validation("transfer requires both a source and a destination"))
        }
        _ => Ok(()),
    }
}

impl MovementDraft {
    pub fn validate(&self) -> DomainResult<()> {
        validate_shape(
            self.movement_type,
            self.quantity,
            self.from_location_id.as_ref(),
            self.to_location_id.as_ref(),
        )
    }

    pub fn inbound(
        tag: TagId,
        product: ProductId,
        to: LocationId,
        quantity: u64,
        user: UserId,
    ) -> Self {
        Self::base(MovementType::In, tag, product, None, Some(to), quantity, user)
    }

    pub fn outbound(
        tag: TagId,
        product: ProductId,
        from: LocationId,
        quantity: u64,
        user: UserId,
    ) -> Self {
        Self::base(MovementType::Out, tag, product, Some(from), None, quantity, user)
    }

    pub fn transfer(
        tag: TagId,
        product: ProductId,
        from: LocationId,
        to: LocationId,
        quantity: u64,
        user: UserId,
    ) -> Self {
        Self::base(MovementType::Transfer, tag, product, Some(from), Some(to), quantity, user)
    }

    pub fn with_status(mut self, status: MovementStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    fn base(
        movement_type: MovementType,
        rfid_tag_id: TagId,
        product_id: ProductId,
        from_location_id: Option<LocationId>,
        to_location_id: Option<LocationId>,
        quantity: u64,
        user_id: UserId,
    ) -> Self {
        Self {
            movement_type,
            rfid_tag_id,
            product_id,
            from_location_id,
            to_location_id,
            quantity,
            status: MovementStatus::Completed,
            user_id,
            notes: None,
        }
    }
}

/// Partial movement update. Endpoints use a nested option so a patch can clear
/// one (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementPatch {
    pub quantity: Option<u64>,
    pub status: Option<MovementStatus>,
    pub from_location_id: Option<Option<LocationId>>,
    pub to_location_id: Option<Option<LocationId>>,
    pub notes: Option<Option<String>>,
}

impl MovementPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn status(mut self, status: MovementStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn quantity(mut self, quantity: u64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn to_location(mut self, to: Option<LocationId>) -> Self {
        self.to_location_id = Some(to);
        self
    }

    pub fn apply_to(&self, current: &Movement) -> Movement {
        let mut next = current.clone();
        if let Some(quantity) = self.quantity {
            next.quantity = quantity;
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(from) = &self.from_location_id {
            next.from_location_id = from.clone();
        }
        if let Some(to) = &self.to_location_id {
            next.to_location_id = to.clone();
        }
        if let Some(notes) = &self.notes {
            next.notes = notes.clone();
        }
        next
    }
}

/// Free-text movement search, pre-resolved against the product catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementSearch {
    pub term: String,
    /// Products whose name/SKU matched `term`.
    #[serde(default)]
    pub product_ids: Vec<ProductId>,
}

impl MovementSearch {
    fn matches(&self, movement: &Movement) -> bool {
        let term = self.term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        movement.id.as_str().to_lowercase().contains(&term)
            || self.product_ids.contains(&movement.product_id)
    }
}

/// Filter criteria for movement queries. Every populated field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementFilter {
    pub movement_type: Option<MovementType>,
    pub status: Option<MovementStatus>,
    /// Matches movements into or out of this location.
    pub location_id: Option<LocationId>,
    /// Inclusive lower bound.
    pub occurred_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub occurred_before: Option<DateTime<Utc>>,
    pub search: Option<MovementSearch>,
}

impl MovementFilter {
    pub fn of_type(movement_type: MovementType) -> Self {
        Self {
            movement_type: Some(movement_type),
            ..Self::default()
        }
    }

    pub fn matches(&self, movement: &Movement) -> bool {
        self.movement_type.is_none_or(|t| movement.movement_type == t)
            && self.status.is_none_or(|s| movement.status == s)
            && self.location_id.as_ref().is_none_or(|l| movement.touches(l))
            && self.occurred_after.is_none_or(|after| movement.timestamp >= after)
            && self.occurred_before.is_none_or(|before| movement.timestamp <= before)
            && self.search.as_ref().is_none_or(|s| s.matches(movement))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementSortKey {
    #[default]
    Timestamp,
    Quantity,
    /// Alphabetical by status name.
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovementSort {
    pub key: MovementSortKey,
    pub direction: SortDirection,
}

impl MovementSort {
    pub fn new(key: MovementSortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    fn compare(&self, a: &Movement, b: &Movement) -> core::cmp::Ordering {
        let ordering = match self.key {
            MovementSortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
            MovementSortKey::Quantity => a.quantity.cmp(&b.quantity),
            MovementSortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        };
        self.direction.apply(ordering)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementQuery {
    pub filter: MovementFilter,
    pub sort: MovementSort,
    pub pagination: Pagination,
}

impl MovementQuery {
    pub fn new(filter: MovementFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn sorted_by(mut self, sort: MovementSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }
}

/// Append-mostly log of goods movements.
///
/// # Invariants
/// - Every stored movement satisfies [`Movement::validate`].
#[derive(Debug, Clone, Default)]
pub struct MovementLog {
    movements: EntityList<Movement>,
}

impl MovementLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    pub fn list(&self) -> &[Movement] {
        self.movements.as_slice()
    }

    pub fn record(&mut self, draft: MovementDraft, now: DateTime<Utc>) -> DomainResult<Movement> {
        self.insert(Movement::from_draft(MovementId::generate(), draft, now))
    }

    pub fn insert(&mut self, movement: Movement) -> DomainResult<Movement> {
        movement.validate()?;
        let recorded = self.movements.push(movement)?.clone();
        tracing::debug!(
            movement_id = %recorded.id,
            movement_type = ?recorded.movement_type,
            quantity = recorded.quantity,
            "movement recorded"
        );
        Ok(recorded)
    }

    pub fn update(&mut self, id: &MovementId, patch: MovementPatch) -> DomainResult<Movement> {
        let updated = self
            .movements
            .replace_with(id, |current| {
                let next = patch.apply_to(current);
                next.validate()?;
                Ok(next)
            })?
            .clone();
        tracing::debug!(movement_id = %id, status = ?updated.status, "movement updated");
        Ok(updated)
    }

    pub fn delete(&mut self, id: &MovementId) -> DomainResult<Movement> {
        let removed = self.movements.remove(id)?;
        tracing::debug!(movement_id = %id, "movement deleted");
        Ok(removed)
    }

    pub fn get(&self, id: &MovementId) -> Option<&Movement> {
        self.movements.get(id)
    }

    pub fn get_by_id(&self, id: &MovementId) -> DomainResult<&Movement> {
        self.movements.get_required(id)
    }

    pub fn pending_count(&self) -> usize {
        self.movements
            .iter()
            .filter(|m| m.status == MovementStatus::Pending)
            .count()
    }

    /// Movements of `movement_type` on the UTC calendar day `date`.
    pub fn count_on(&self, movement_type: MovementType, date: NaiveDate) -> usize {
        self.movements
            .iter()
            .filter(|m| m.movement_type == movement_type && m.timestamp.date_naive() == date)
            .count()
    }

    pub fn query(&self, query: &MovementQuery) -> Page<Movement> {
        let mut hits: Vec<Movement> = self
            .movements
            .iter()
            .filter(|m| query.filter.matches(m))
            .cloned()
            .collect();
        // Stable: ties keep log order.
        hits.sort_by(|a, b| query.sort.compare(a, b));
        query.pagination.apply(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn loc(id: &str) -> LocationId {
        LocationId::from(id)
    }

    fn inbound(qty: u64) -> MovementDraft {
        MovementDraft::inbound(
            TagId::from("1"),
            ProductId::from("1"),
            loc("rack-a-1"),
            qty,
            UserId::from("1"),
        )
    }

    fn sample_log() -> MovementLog {
        let mut log = MovementLog::new();
        log.record(inbound(10), t(8)).unwrap();
        log.record(
            MovementDraft::outbound(
                TagId::from("2"),
                ProductId::from("2"),
                loc("rack-b-1"),
                4,
                UserId::from("1"),
            )
            .with_status(MovementStatus::Pending),
            t(9),
        )
        .unwrap();
        log.record(
            MovementDraft::transfer(
                TagId::from("1"),
                ProductId::from("1"),
                loc("rack-a-1"),
                loc("rack-b-1"),
                25,
                UserId::from("1"),
            )
            .with_status(MovementStatus::Failed),
            t(10),
        )
        .unwrap();
        log
    }

    #[test]
    fn record_assigns_id_and_timestamp() {
        let mut log = MovementLog::new();
        let movement = log.record(inbound(10).with_notes("Batch: B1"), t(8)).unwrap();
        assert!(movement.id.as_str().starts_with("mov-"));
        assert_eq!(movement.timestamp, t(8));
        assert_eq!(movement.status, MovementStatus::Completed);
        assert_eq!(log.get_by_id(&movement.id).unwrap().notes.as_deref(), Some("Batch: B1"));
    }

    #[test]
    fn shape_rules_are_enforced() {
        let mut log = MovementLog::new();
        let user = UserId::from("1");

        let mut no_destination = inbound(1);
        no_destination.to_location_id = None;
        assert!(matches!(log.record(no_destination, t(8)), Err(DomainError::Validation(_))));

        let mut no_source = MovementDraft::outbound(
            TagId::from("1"),
            ProductId::from("1"),
            loc("rack-a-1"),
            1,
            user.clone(),
        );
        no_source.from_location_id = None;
        assert!(matches!(log.record(no_source, t(8)), Err(DomainError::Validation(_))));

        let same_place = MovementDraft::transfer(
            TagId::from("1"),
            ProductId::from("1"),
            loc("rack-a-1"),
            loc("rack-a-1"),
            1,
            user,
        );
        assert!(matches!(log.record(same_place, t(8)), Err(DomainError::Validation(_))));

        assert!(matches!(log.record(inbound(0), t(8)), Err(DomainError::Validation(_))));
        assert!(log.is_empty());
    }

    #[test]
    fn update_revalidates_and_leaves_state_on_error() {
        let mut log = sample_log();
        let id = log.list()[0].id.clone();

        let err = log.update(&id, MovementPatch::default().to_location(None)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(log.get_by_id(&id).unwrap().to_location_id, Some(loc("rack-a-1")));

        let cancelled = log
            .update(&id, MovementPatch::default().status(MovementStatus::Cancelled))
            .unwrap();
        assert_eq!(cancelled.status, MovementStatus::Cancelled);

        let ghost = MovementId::from("mov-ghost");
        let err = log.update(&ghost, MovementPatch::default().quantity(3)).unwrap_err();
        assert!(err.is_not_found());
        assert!(log.delete(&ghost).unwrap_err().is_not_found());
    }

    #[test]
    fn counts_by_day_and_status() {
        let log = sample_log();
        let day = t(0).date_naive();
        assert_eq!(log.count_on(MovementType::In, day), 1);
        assert_eq!(log.count_on(MovementType::Out, day), 1);
        assert_eq!(log.count_on(MovementType::In, day + Duration::days(1)), 0);
        assert_eq!(log.pending_count(), 1);
    }

    #[test]
    fn default_query_is_newest_first() {
        let log = sample_log();
        let page = log.query(&MovementQuery::default());
        let hours: Vec<_> = page.items.iter().map(|m| m.timestamp).collect();
        assert_eq!(hours, vec![t(10), t(9), t(8)]);
        assert_eq!(page.total, 3);
        assert!(!page.has_more);
    }

    #[test]
    fn filters_combine() {
        let log = sample_log();

        let into_or_out_of_b1 = MovementFilter {
            location_id: Some(loc("rack-b-1")),
            ..MovementFilter::default()
        };
        assert_eq!(log.query(&MovementQuery::new(into_or_out_of_b1)).total, 2);

        let window = MovementFilter {
            occurred_after: Some(t(9)),
            occurred_before: Some(t(9)),
            ..MovementFilter::default()
        };
        let page = log.query(&MovementQuery::new(window));
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].movement_type, MovementType::Out);

        let failed_transfers = MovementFilter {
            status: Some(MovementStatus::Failed),
            ..MovementFilter::of_type(MovementType::Transfer)
        };
        assert_eq!(log.query(&MovementQuery::new(failed_transfers)).total, 1);
    }

    #[test]
    fn search_matches_id_or_resolved_products() {
        let mut log = sample_log();
        log.insert(Movement::from_draft(MovementId::from("mov-1"), inbound(3), t(7))).unwrap();

        let by_id = MovementFilter {
            search: Some(MovementSearch {
                term: "MOV-1".to_string(),
                product_ids: vec![],
            }),
            ..MovementFilter::default()
        };
        assert_eq!(log.query(&MovementQuery::new(by_id)).total, 1);

        let by_product = MovementFilter {
            search: Some(MovementSearch {
                term: "500g".to_string(),
                product_ids: vec![ProductId::from("2")],
            }),
            ..MovementFilter::default()
        };
        let page = log.query(&MovementQuery::new(by_product));
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].product_id, ProductId::from("2"));
    }

    #[test]
    fn sorts_by_quantity_and_status() {
        let log = sample_log();

        let by_qty = MovementQuery::default()
            .sorted_by(MovementSort::new(MovementSortKey::Quantity, SortDirection::Asc));
        let quantities: Vec<_> = log.query(&by_qty).items.iter().map(|m| m.quantity).collect();
        assert_eq!(quantities, vec![4, 10, 25]);

        let by_status = MovementQuery::default()
            .sorted_by(MovementSort::new(MovementSortKey::Status, SortDirection::Asc));
        let statuses: Vec<_> = log.query(&by_status).items.iter().map(|m| m.status).collect();
        assert_eq!(
            statuses,
            vec![MovementStatus::Completed, MovementStatus::Failed, MovementStatus::Pending]
        );
    }

    #[test]
    fn pages_through_results() {
        let mut log = MovementLog::new();
        for i in 0..45u32 {
            log.record(inbound(u64::from(i) + 1), t(0) + Duration::minutes(i64::from(i))).unwrap();
        }
        let page = log.query(&MovementQuery::default().paginate(Pagination::page(3, 20)));
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total, 45);
        assert_eq!(page.page_count(), 3);
        assert!(!page.has_more);
        // Newest first, so the last page holds the five oldest.
        assert_eq!(page.items.last().map(|m| m.quantity), Some(1));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn movement_strategy() -> impl Strategy<Value = (u8, u64, u8, u32)> {
            (0u8..3, 1u64..500, 0u8..4, 0u32..48)
        }

        fn build(kind: u8, qty: u64, status: u8) -> MovementDraft {
            let user = UserId::from("1");
            let draft = match kind {
                0 => inbound(qty),
                1 => MovementDraft::outbound(
                    TagId::from("1"),
                    ProductId::from("1"),
                    loc("rack-a-1"),
                    qty,
                    user,
                ),
                _ => MovementDraft::transfer(
                    TagId::from("1"),
                    ProductId::from("1"),
                    loc("rack-a-1"),
                    loc("rack-b-1"),
                    qty,
                    user,
                ),
            };
            draft.with_status(match status {
                0 => MovementStatus::Pending,
                1 => MovementStatus::Completed,
                2 => MovementStatus::Cancelled,
                _ => MovementStatus::Failed,
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                .. ProptestConfig::default()
            })]

            #[test]
            fn query_pages_partition_filtered_results(
                entries in prop::collection::vec(movement_strategy(), 0..60),
                per_page in 1u32..15,
                kind in prop::option::of(0u8..3),
            ) {
                let mut log = MovementLog::new();
                for (k, qty, status, minutes) in &entries {
                    let at = t(0) + Duration::minutes(i64::from(*minutes));
                    log.record(build(*k, *qty, *status), at).unwrap();
                }

                let filter = MovementFilter {
                    movement_type: kind.map(|k| match k {
                        0 => MovementType::In,
                        1 => MovementType::Out,
                        _ => MovementType::Transfer,
                    }),
                    ..MovementFilter::default()
                };
                let expected = log.list().iter().filter(|m| filter.matches(m)).count() as u64;

                let mut seen = 0u64;
                let mut page_no = 1;
                let mut previous: Option<DateTime<Utc>> = None;
                loop {
                    let query = MovementQuery::new(filter.clone())
                        .paginate(Pagination::page(page_no, per_page));
                    let page = log.query(&query);
                    prop_assert_eq!(page.total, expected);
                    for m in &page.items {
                        prop_assert!(filter.matches(m));
                        if let Some(prev) = previous {
                            prop_assert!(m.timestamp <= prev);
                        }
                        previous = Some(m.timestamp);
                    }
                    seen += page.items.len() as u64;
                    if !page.has_more {
                        break;
                    }
                    page_no += 1;
                }
                prop_assert_eq!(seen, expected);
            }
        }
    }
}
