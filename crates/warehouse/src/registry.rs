use std::collections::BTreeMap;
use std::sync::Arc;

use wms_core::{DomainError, DomainResult, EntityList, ExpectedVersion, LocationId};

use crate::location::{Location, LocationDraft, LocationPatch};
use crate::seed;
use crate::zone::{self, CapacityTotals, FirstChar, ZoneKey, ZoneStatistics};

/// Authoritative set of locations plus the current selection.
///
/// # Invariants
/// - Every stored location satisfies [`Location::validate`].
/// - Location ids and codes are unique.
/// - The selection, when set, refers to a stored location.
pub struct LocationRegistry {
    locations: EntityList<Location>,
    selected: Option<LocationId>,
    zone_key: Arc<dyn ZoneKey>,
}

impl core::fmt::Debug for LocationRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocationRegistry")
            .field("locations", &self.locations.len())
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl Default for LocationRegistry {
    fn default() -> Self {
        Self::new(FirstChar)
    }
}

impl LocationRegistry {
    /// Empty registry grouping zones with `zone_key`.
    pub fn new(zone_key: impl ZoneKey + 'static) -> Self {
        Self {
            locations: EntityList::new(),
            selected: None,
            zone_key: Arc::new(zone_key),
        }
    }

    /// Registry pre-populated with the fixture layout from [`seed::locations`].
    pub fn seeded(zone_key: impl ZoneKey + 'static) -> DomainResult<Self> {
        let mut registry = Self::new(zone_key);
        for location in seed::locations() {
            registry.insert(location)?;
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn list(&self) -> &[Location] {
        self.locations.as_slice()
    }

    /// Create a location with a freshly generated id.
    pub fn add(&mut self, draft: LocationDraft) -> DomainResult<Location> {
        let location = Location::from_draft(LocationId::generate(), draft);
        self.insert(location)
    }

    /// Insert a fully-formed location (caller-chosen id, e.g. fixtures).
    pub fn insert(&mut self, mut location: Location) -> DomainResult<Location> {
        location.name = location.name.trim().to_string();
        location.code = location.code.trim().to_string();
        location.validate()?;
        self.ensure_code_free(&location.code, None)?;

        let created = self.locations.push(location)?.clone();
        tracing::debug!(location_id = %created.id, code = %created.code, "location added");
        Ok(created)
    }

    /// Merge `patch` into the location with `id`.
    ///
    /// A missing id is `NotFound`. A patch that changes no field (including an
    /// empty one) leaves the version alone. Codes and names are stored trimmed
    /// and codes compare case-insensitively. The merged location is validated before it replaces the old
    /// one, so a rejected patch leaves the registry untouched.
    pub fn update(&mut self, id: &LocationId, patch: LocationPatch) -> DomainResult<Location> {
        self.update_checked(id, ExpectedVersion::Any, patch)
    }

    /// [`update`](Self::update) guarded by an optimistic version check.
    pub fn update_checked(
        &mut self,
        id: &LocationId,
        expected: ExpectedVersion,
        patch: LocationPatch,
    ) -> DomainResult<Location> {
        let current = self.locations.get_required(id)?;
        expected.check(current.version)?;

        if patch.is_empty() {
            return Ok(current.clone());
        }

        if let Some(code) = &patch.code {
            self.ensure_code_free(code, Some(id))?;
        }

        let updated = self
            .locations
            .replace_with(id, |current| {
                let next = patch.apply_to(current);
                next.validate()?;
                Ok(next)
            })?
            .clone();

        tracing::debug!(location_id = %id, version = updated.version, "location updated");
        Ok(updated)
    }

    /// Remove the location with `id`, clearing the selection if it pointed there.
    pub fn delete(&mut self, id: &LocationId) -> DomainResult<Location> {
        let removed = self.locations.remove(id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        tracing::debug!(location_id = %id, "location deleted");
        Ok(removed)
    }

    /// Set (or clear, with `None`) the selected location.
    ///
    /// An unknown id clears the selection instead of failing.
    pub fn select(&mut self, id: Option<&LocationId>) -> Option<&Location> {
        self.selected = id.filter(|id| self.locations.contains(id)).cloned();
        self.selected()
    }

    pub fn selected(&self) -> Option<&Location> {
        self.selected.as_ref().and_then(|id| self.locations.get(id))
    }

    pub fn selected_id(&self) -> Option<&LocationId> {
        self.selected.as_ref()
    }

    /// Lookup that reports a miss as `NotFound`.
    pub fn get_by_id(&self, id: &LocationId) -> DomainResult<&Location> {
        self.locations.get_required(id)
    }

    pub fn get(&self, id: &LocationId) -> Option<&Location> {
        self.locations.get(id)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Location> {
        let code = code.trim();
        self.locations.find(|l| l.code.eq_ignore_ascii_case(code))
    }

    /// Case-insensitive substring search over name and code. A blank term
    /// matches everything.
    pub fn search(&self, term: &str) -> Vec<&Location> {
        let term = term.trim().to_lowercase();
        self.locations
            .iter()
            .filter(|l| {
                term.is_empty()
                    || l.name.to_lowercase().contains(&term)
                    || l.code.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Locations that can receive put-away goods.
    pub fn storage_locations(&self) -> Vec<&Location> {
        self.locations
            .iter()
            .filter(|l| l.location_type.is_storage())
            .collect()
    }

    pub fn totals(&self) -> CapacityTotals {
        self.locations.iter().collect()
    }

    /// Whole-warehouse utilization in percent; 0 when total capacity is 0.
    pub fn capacity_utilization(&self) -> f64 {
        self.totals().utilization()
    }

    /// Per-zone statistics using the registry's zone key.
    pub fn zone_statistics(&self) -> BTreeMap<String, ZoneStatistics> {
        zone::zone_statistics(&self.locations, self.zone_key.as_ref())
    }

    /// Per-zone statistics using an explicit zone key.
    pub fn zone_statistics_by(&self, key: &dyn ZoneKey) -> BTreeMap<String, ZoneStatistics> {
        zone::zone_statistics(&self.locations, key)
    }

    fn ensure_code_free(&self, code: &str, owner: Option<&LocationId>) -> DomainResult<()> {
        let code = code.trim();
        match self.locations.find(|l| l.code.eq_ignore_ascii_case(code)) {
            Some(existing) if Some(&existing.id) != owner => Err(DomainError::conflict(format!(
                "location code {code} is already used by {}",
                existing.id
            ))),
            _ => Ok(()),
        }
    }
}
