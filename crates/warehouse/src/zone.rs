//! Zone grouping: derived, never stored.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use wms_core::DomainError;

use crate::location::{Location, utilization_percent};

/// Extracts the zone key from a location code.
///
/// Closures `Fn(&str) -> String` implement this too, so callers can inject an
/// ad-hoc rule without declaring a type.
pub trait ZoneKey: Send + Sync {
    fn zone_of(&self, code: &str) -> String;
}

impl<F> ZoneKey for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn zone_of(&self, code: &str) -> String {
        self(code)
    }
}

/// First character of the code: `"A-1"` -> `"A"`, `"REC-1"` -> `"R"`.
///
/// Merges multi-letter prefixes that share an initial (`REC-*` and `RES-*`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstChar;

impl ZoneKey for FirstChar {
    fn zone_of(&self, code: &str) -> String {
        code.trim().chars().next().map(String::from).unwrap_or_default()
    }
}

/// Segment before the first `-`: `"REC-1"` -> `"REC"`. Codes without a
/// delimiter form their own zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodePrefix;

impl ZoneKey for CodePrefix {
    fn zone_of(&self, code: &str) -> String {
        let code = code.trim();
        code.split_once('-')
            .map(|(prefix, _)| prefix)
            .unwrap_or(code)
            .to_string()
    }
}

/// Named zone strategies, selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneKeyKind {
    #[default]
    FirstChar,
    CodePrefix,
}

impl ZoneKey for ZoneKeyKind {
    fn zone_of(&self, code: &str) -> String {
        match self {
            ZoneKeyKind::FirstChar => FirstChar.zone_of(code),
            ZoneKeyKind::CodePrefix => CodePrefix.zone_of(code),
        }
    }
}

impl FromStr for ZoneKeyKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-char" | "first_char" => Ok(ZoneKeyKind::FirstChar),
            "code-prefix" | "code_prefix" => Ok(ZoneKeyKind::CodePrefix),
            other => Err(DomainError::validation(format!(
                "unknown zone key strategy '{other}' (expected first-char or code-prefix)"
            ))),
        }
    }
}

/// Aggregated capacity for one zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatistics {
    pub capacity: u64,
    pub occupied: u64,
    pub utilization: f64,
}

/// Summed capacity over a set of locations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityTotals {
    pub capacity: u64,
    pub occupied: u64,
}

impl CapacityTotals {
    pub fn add(&mut self, location: &Location) {
        self.capacity = self.capacity.saturating_add(location.capacity);
        self.occupied = self.occupied.saturating_add(location.occupied);
    }

    pub fn utilization(&self) -> f64 {
        utilization_percent(self.occupied, self.capacity)
    }
}

impl<'a> FromIterator<&'a Location> for CapacityTotals {
    fn from_iter<I: IntoIterator<Item = &'a Location>>(iter: I) -> Self {
        let mut totals = CapacityTotals::default();
        for location in iter {
            totals.add(location);
        }
        totals
    }
}

/// Group `locations` by `key` and derive per-zone utilization.
pub fn zone_statistics<'a, I>(locations: I, key: &dyn ZoneKey) -> BTreeMap<String, ZoneStatistics>
where
    I: IntoIterator<Item = &'a Location>,
{
    let mut groups: BTreeMap<String, CapacityTotals> = BTreeMap::new();
    for location in locations {
        groups.entry(key.zone_of(&location.code)).or_default().add(location);
    }

    groups
        .into_iter()
        .map(|(zone, totals)| {
            (
                zone,
                ZoneStatistics {
                    capacity: totals.capacity,
                    occupied: totals.occupied,
                    utilization: totals.utilization(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{LocationDraft, LocationType};
    use wms_core::LocationId;

    fn loc(id: &str, code: &str, capacity: u64, occupied: u64) -> Location {
        Location::from_draft(
            LocationId::from(id),
            LocationDraft::new(id, code, LocationType::Rack, capacity).with_occupied(occupied),
        )
    }

    #[test]
    fn first_char_and_prefix_keys() {
        assert_eq!(FirstChar.zone_of("A-1"), "A");
        assert_eq!(FirstChar.zone_of("REC-1"), "R");
        assert_eq!(CodePrefix.zone_of("REC-1"), "REC");
        assert_eq!(CodePrefix.zone_of("A-12"), "A");
        assert_eq!(CodePrefix.zone_of("DOCK"), "DOCK");
    }

    #[test]
    fn groups_by_first_char() {
        let locations = [
            loc("a1", "A-1", 1000, 700),
            loc("a2", "A-2", 1000, 850),
            loc("b1", "B-1", 1500, 900),
        ];

        let stats = zone_statistics(&locations, &FirstChar);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats["A"].capacity, 2000);
        assert_eq!(stats["A"].occupied, 1550);
        assert!((stats["A"].utilization - 77.5).abs() < 1e-9);
        assert_eq!(stats["B"].capacity, 1500);
        assert_eq!(stats["B"].occupied, 900);
    }

    #[test]
    fn zero_capacity_zone_has_zero_utilization() {
        let locations = [loc("z", "Z-1", 0, 0)];
        let stats = zone_statistics(&locations, &FirstChar);
        assert_eq!(stats["Z"].utilization, 0.0);
    }

    #[test]
    fn closures_are_zone_keys() {
        let locations = [loc("a1", "a-1", 10, 1), loc("a2", "A-2", 10, 1)];
        let upper = |code: &str| FirstChar.zone_of(code).to_ascii_uppercase();
        let stats = zone_statistics(&locations, &upper);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats["A"].capacity, 20);
    }

    #[test]
    fn parses_strategy_names() {
        assert_eq!("first-char".parse::<ZoneKeyKind>().unwrap(), ZoneKeyKind::FirstChar);
        assert_eq!("Code_Prefix".parse::<ZoneKeyKind>().unwrap(), ZoneKeyKind::CodePrefix);
        assert!("by-aisle".parse::<ZoneKeyKind>().is_err());
    }
}
