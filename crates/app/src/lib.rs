//! `wms-app`: composition root wiring the warehouse registries together,
//! plus configuration and the dashboard read model.

pub mod app;
pub mod config;
pub mod dashboard;
pub mod flows;

pub use app::WarehouseApp;
pub use config::{AppConfig, ConfigError};
pub use dashboard::{ChartPoint, DashboardSummary};
pub use flows::{GoodsDispatch, GoodsReceipt, MovementOutcome, ScanOutcome};
