use anyhow::Context;
use chrono::Utc;

use wms_app::{AppConfig, WarehouseApp};

fn main() -> anyhow::Result<()> {
    wms_observability::init();
    let config = AppConfig::from_env().context("failed to load configuration")?;

    let now = Utc::now();
    let mut app = WarehouseApp::build(&config, now).context("failed to build warehouse state")?;

    app.login_with(&config.credentials, now)
        .context("configured credentials were rejected")?;

    let raised = app.raise_expiry_alerts(now).context("failed to raise expiry alerts")?;
    tracing::info!(count = raised.len(), "expiry alerts raised");

    let summary = app.dashboard_summary(now)?;
    let zones = app.locations().zone_statistics();
    let report = serde_json::json!({
        "summary": summary,
        "zones": zones,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
