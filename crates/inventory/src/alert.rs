use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wms_core::{
    AlertId, DomainError, DomainResult, Entity, EntityList, LocationId, ProductId, TagId, UserId,
    ensure_not_blank,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Unauthorized,
    Missing,
    Expired,
    LowStock,
    System,
    /// Projected occupancy crossed the configured warning threshold.
    Capacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,
    pub product_id: Option<ProductId>,
    pub location_id: Option<LocationId>,
    pub rfid_tag_id: Option<TagId>,
    pub timestamp: DateTime<Utc>,
    pub resolved: bool,
    pub resolved_by: Option<UserId>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Entity for Alert {
    type Id = AlertId;
    const KIND: &'static str = "alert";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertDraft {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub location_id: Option<LocationId>,
    #[serde(default)]
    pub rfid_tag_id: Option<TagId>,
}

impl AlertDraft {
    pub fn new(alert_type: AlertType, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            alert_type,
            severity,
            message: message.into(),
            product_id: None,
            location_id: None,
            rfid_tag_id: None,
        }
    }

    pub fn for_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn at_location(mut self, location_id: LocationId) -> Self {
        self.location_id = Some(location_id);
        self
    }

    pub fn for_tag(mut self, tag_id: TagId) -> Self {
        self.rfid_tag_id = Some(tag_id);
        self
    }
}

/// Alert inbox. Alerts are never deleted, only resolved.
#[derive(Debug, Clone, Default)]
pub struct AlertLog {
    alerts: EntityList<Alert>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn list(&self) -> &[Alert] {
        self.alerts.as_slice()
    }

    pub fn create(&mut self, draft: AlertDraft, now: DateTime<Utc>) -> DomainResult<Alert> {
        self.insert(Alert {
            id: AlertId::generate(),
            alert_type: draft.alert_type,
            severity: draft.severity,
            message: draft.message,
            product_id: draft.product_id,
            location_id: draft.location_id,
            rfid_tag_id: draft.rfid_tag_id,
            timestamp: now,
            resolved: false,
            resolved_by: None,
            resolved_at: None,
        })
    }

    pub fn insert(&mut self, alert: Alert) -> DomainResult<Alert> {
        ensure_not_blank("alert message", &alert.message)?;
        let created = self.alerts.push(alert)?.clone();
        tracing::warn!(
            alert_id = %created.id,
            alert_type = ?created.alert_type,
            severity = ?created.severity,
            message = %created.message,
            "alert raised"
        );
        Ok(created)
    }

    /// Resolve an open alert. Resolving twice is a conflict.
    pub fn resolve(
        &mut self,
        id: &AlertId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<Alert> {
        let resolved = self
            .alerts
            .replace_with(id, |current| {
                if current.resolved {
                    return Err(DomainError::conflict(format!("alert {id} is already resolved")));
                }
                let mut next = current.clone();
                next.resolved = true;
                next.resolved_by = Some(user_id);
                next.resolved_at = Some(now);
                Ok(next)
            })?
            .clone();
        tracing::info!(alert_id = %id, "alert resolved");
        Ok(resolved)
    }

    pub fn get(&self, id: &AlertId) -> Option<&Alert> {
        self.alerts.get(id)
    }

    pub fn get_by_id(&self, id: &AlertId) -> DomainResult<&Alert> {
        self.alerts.get_required(id)
    }

    pub fn unresolved(&self) -> Vec<&Alert> {
        self.alerts.iter().filter(|a| !a.resolved).collect()
    }

    pub fn unresolved_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.resolved).count()
    }

    /// The `n` newest alerts, newest first.
    pub fn recent(&self, n: usize) -> Vec<&Alert> {
        let mut alerts: Vec<&Alert> = self.alerts.iter().collect();
        // Stable sort keeps later insertions first among equal timestamps.
        alerts.reverse();
        alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        alerts.truncate(n);
        alerts
    }

    pub fn has_unresolved(&self, alert_type: AlertType, product_id: &ProductId) -> bool {
        self.alerts.iter().any(|a| {
            !a.resolved && a.alert_type == alert_type && a.product_id.as_ref() == Some(product_id)
        })
    }
}
