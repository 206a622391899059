use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wms_core::DomainResult;
use wms_inventory::{Alert, MovementType};
use wms_warehouse::ZoneStatistics;

use crate::app::WarehouseApp;

/// How many alerts the dashboard lists.
pub const RECENT_ALERTS: usize = 5;

/// Labelled value for charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_products: usize,
    pub total_rfid_tags: usize,
    pub active_rfid_tags: usize,
    pub active_alerts: usize,
    pub movements_in_today: usize,
    pub movements_out_today: usize,
    pub pending_movements: usize,
    /// Warehouse-wide utilization, percent.
    pub stock_utilization: f64,
    /// One point per zone, labelled "Zone X", valued at its utilization.
    pub zones: Vec<ChartPoint>,
    pub recent_alerts: Vec<Alert>,
}

/// Chart series for zone utilization, in zone order.
pub fn zone_chart(stats: &BTreeMap<String, ZoneStatistics>) -> Vec<ChartPoint> {
    stats
        .iter()
        .map(|(zone, s)| ChartPoint {
            name: format!("Zone {zone}"),
            value: s.utilization,
        })
        .collect()
}

impl WarehouseApp {
    /// Headline counters; "today" is `now`'s UTC calendar day.
    pub fn dashboard_summary(&self, now: DateTime<Utc>) -> DomainResult<DashboardSummary> {
        self.session_user()?;
        let today = now.date_naive();
        Ok(DashboardSummary {
            total_products: self.products.len(),
            total_rfid_tags: self.tags.len(),
            active_rfid_tags: self.tags.active_count(),
            active_alerts: self.alerts.unresolved_count(),
            movements_in_today: self.movements.count_on(MovementType::In, today),
            movements_out_today: self.movements.count_on(MovementType::Out, today),
            pending_movements: self.movements.pending_count(),
            stock_utilization: self.locations.capacity_utilization(),
            zones: zone_chart(&self.locations.zone_statistics()),
            recent_alerts: self.alerts.recent(RECENT_ALERTS).into_iter().cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_labels_follow_zone_order() {
        let mut stats = BTreeMap::new();
        stats.insert(
            "B".to_string(),
            ZoneStatistics {
                capacity: 100,
                occupied: 50,
                utilization: 50.0,
            },
        );
        stats.insert(
            "A".to_string(),
            ZoneStatistics {
                capacity: 10,
                occupied: 1,
                utilization: 10.0,
            },
        );
        let chart = zone_chart(&stats);
        assert_eq!(
            chart,
            vec![
                ChartPoint {
                    name: "Zone A".to_string(),
                    value: 10.0
                },
                ChartPoint {
                    name: "Zone B".to_string(),
                    value: 50.0
                },
            ]
        );
    }
}
