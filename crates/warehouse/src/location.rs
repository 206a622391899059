use serde::{Deserialize, Serialize};

use wms_core::{DomainError, DomainResult, Entity, LocationId, ensure_finite, ensure_not_blank};

/// Kind of location. Only affects display and goods-in eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Rack,
    Aisle,
    Zone,
    Staging,
    Receiving,
    Shipping,
}

impl LocationType {
    /// Whether goods can be put away into this kind of location.
    pub fn is_storage(self) -> bool {
        matches!(self, LocationType::Rack | LocationType::Staging)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::Rack => "rack",
            LocationType::Aisle => "aisle",
            LocationType::Zone => "zone",
            LocationType::Staging => "staging",
            LocationType::Receiving => "receiving",
            LocationType::Shipping => "shipping",
        }
    }
}

impl core::fmt::Display for LocationType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout position. Coordinates may be negative (areas left of the origin).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Layout extents; rendering only, no packing semantics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extents {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Extents {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

/// A named, coded spatial unit within the warehouse.
///
/// # Invariants
/// - `occupied <= capacity`
/// - `name` and `code` are non-blank
/// - geometry is finite; extents are non-negative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub capacity: u64,
    pub occupied: u64,
    pub position: Position,
    pub extents: Extents,
    /// Starts at 1, +1 per effective update.
    pub version: u64,
}

impl Entity for Location {
    type Id = LocationId;
    const KIND: &'static str = "location";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Location {
    pub fn from_draft(id: LocationId, draft: LocationDraft) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            code: draft.code.trim().to_string(),
            location_type: draft.location_type,
            capacity: draft.capacity,
            occupied: draft.occupied,
            position: draft.position,
            extents: draft.extents,
            version: 1,
        }
    }

    /// Free units left before the location is full.
    pub fn available(&self) -> u64 {
        self.capacity.saturating_sub(self.occupied)
    }

    /// Occupied share of capacity in percent; 0 for zero-capacity locations.
    pub fn utilization(&self) -> f64 {
        utilization_percent(self.occupied, self.capacity)
    }

    /// The creation-time fields of this location (everything but id/version).
    pub fn to_draft(&self) -> LocationDraft {
        LocationDraft {
            name: self.name.clone(),
            code: self.code.clone(),
            location_type: self.location_type,
            capacity: self.capacity,
            occupied: self.occupied,
            position: self.position,
            extents: self.extents,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        ensure_not_blank("name", &self.name)?;
        ensure_not_blank("code", &self.code)?;

        if self.occupied > self.capacity {
            return Err(DomainError::validation(format!(
                "occupied ({}) exceeds capacity ({}) for location {}",
                self.occupied, self.capacity, self.code
            )));
        }

        let Position { x, y, z } = self.position;
        ensure_finite("x", x, false)?;
        ensure_finite("y", y, false)?;
        ensure_finite("z", z, false)?;

        let Extents {
            width,
            height,
            depth,
        } = self.extents;
        ensure_finite("width", width, true)?;
        ensure_finite("height", height, true)?;
        ensure_finite("depth", depth, true)?;

        Ok(())
    }
}

/// All location fields except `id` and `version` (creation input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDraft {
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub capacity: u64,
    pub occupied: u64,
    pub position: Position,
    pub extents: Extents,
}

impl LocationDraft {
    /// Minimal draft: empty location at the origin with unit extents.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        location_type: LocationType,
        capacity: u64,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            location_type,
            capacity,
            occupied: 0,
            position: Position::default(),
            extents: Extents::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_occupied(mut self, occupied: u64) -> Self {
        self.occupied = occupied;
        self
    }

    pub fn with_position(mut self, x: f64, y: f64, z: f64) -> Self {
        self.position = Position::new(x, y, z);
        self
    }

    pub fn with_extents(mut self, width: f64, height: f64, depth: f64) -> Self {
        self.extents = Extents::new(width, height, depth);
        self
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub location_type: Option<LocationType>,
    pub capacity: Option<u64>,
    pub occupied: Option<u64>,
    pub position: Option<Position>,
    pub extents: Option<Extents>,
}

impl LocationPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn location_type(mut self, location_type: LocationType) -> Self {
        self.location_type = Some(location_type);
        self
    }

    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn occupied(mut self, occupied: u64) -> Self {
        self.occupied = Some(occupied);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn extents(mut self, extents: Extents) -> Self {
        self.extents = Some(extents);
        self
    }

    /// Produce the merged location. Identity is preserved and the version is
    /// bumped only when a field actually changes; validation is left to the
    /// caller.
    pub fn apply_to(&self, current: &Location) -> Location {
        let mut next = current.clone();
        if let Some(name) = &self.name {
            next.name = name.trim().to_string();
        }
        if let Some(code) = &self.code {
            next.code = code.trim().to_string();
        }
        if let Some(location_type) = self.location_type {
            next.location_type = location_type;
        }
        if let Some(capacity) = self.capacity {
            next.capacity = capacity;
        }
        if let Some(occupied) = self.occupied {
            next.occupied = occupied;
        }
        if let Some(position) = self.position {
            next.position = position;
        }
        if let Some(extents) = self.extents {
            next.extents = extents;
        }
        if next.to_draft() != current.to_draft() {
            next.version = current.version + 1;
        }
        next
    }
}

/// `occupied / capacity * 100`, guarded against zero capacity.
pub fn utilization_percent(occupied: u64, capacity: u64) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    (occupied as f64 / capacity as f64) * 100.0
}
