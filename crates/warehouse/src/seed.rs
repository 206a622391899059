//! Fixture layout the dashboard starts with: four racks in zones A and B,
//! one receiving area and one shipping area.

use wms_core::LocationId;

use crate::location::{Location, LocationDraft, LocationType};

fn fixture(id: &str, draft: LocationDraft) -> Location {
    Location::from_draft(LocationId::from(id), draft)
}

pub fn locations() -> Vec<Location> {
    vec![
        fixture(
            "rack-a-1",
            LocationDraft::new("Rack A-1", "A-1", LocationType::Rack, 1000)
                .with_occupied(700)
                .with_position(0.0, 0.0, 0.0)
                .with_extents(2.0, 3.0, 1.0),
        ),
        fixture(
            "rack-a-2",
            LocationDraft::new("Rack A-2", "A-2", LocationType::Rack, 1000)
                .with_occupied(850)
                .with_position(3.0, 0.0, 0.0)
                .with_extents(2.0, 3.0, 1.0),
        ),
        fixture(
            "rack-b-1",
            LocationDraft::new("Rack B-1", "B-1", LocationType::Rack, 1500)
                .with_occupied(900)
                .with_position(0.0, 0.0, 5.0)
                .with_extents(3.0, 4.0, 1.0),
        ),
        fixture(
            "rack-b-2",
            LocationDraft::new("Rack B-2", "B-2", LocationType::Rack, 1500)
                .with_occupied(1200)
                .with_position(4.0, 0.0, 5.0)
                .with_extents(3.0, 4.0, 1.0),
        ),
        fixture(
            "receiving-1",
            LocationDraft::new("Receiving Area 1", "REC-1", LocationType::Receiving, 2000)
                .with_occupied(500)
                .with_position(-5.0, 0.0, 0.0)
                .with_extents(4.0, 1.0, 4.0),
        ),
        fixture(
            "shipping-1",
            LocationDraft::new("Shipping Area 1", "SHIP-1", LocationType::Shipping, 2000)
                .with_occupied(300)
                .with_position(-5.0, 0.0, 5.0)
                .with_extents(4.0, 1.0, 4.0),
        ),
    ]
}
