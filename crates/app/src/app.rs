use chrono::{DateTime, Utc};

use wms_auth::{AuthSession, Credentials, User};
use wms_core::DomainResult;
use wms_inventory::{AlertLog, MovementLog};
use wms_products::ProductCatalog;
use wms_rfid::{ReaderRegistry, TagRegistry};
use wms_warehouse::LocationRegistry;

use crate::config::AppConfig;

/// Composition root: every registry plus the login session.
///
/// Registries are independent; the flows in [`crate::flows`] are the only
/// place that checks references across them.
#[derive(Debug)]
pub struct WarehouseApp {
    pub(crate) locations: LocationRegistry,
    pub(crate) products: ProductCatalog,
    pub(crate) tags: TagRegistry,
    pub(crate) readers: ReaderRegistry,
    pub(crate) movements: MovementLog,
    pub(crate) alerts: AlertLog,
    pub(crate) session: AuthSession,
    pub(crate) capacity_warning_percent: f64,
}

impl WarehouseApp {
    pub fn new(config: &AppConfig) -> DomainResult<Self> {
        Self::build(config, Utc::now())
    }

    /// Like [`WarehouseApp::new`], stamping seed records with `now`.
    pub fn build(config: &AppConfig, now: DateTime<Utc>) -> DomainResult<Self> {
        let session = AuthSession::new(config.credentials.clone());

        let app = if config.seed {
            let (tags, readers) = wms_rfid::seeded(now)?;
            let (movements, alerts) = wms_inventory::seeded(now)?;
            Self {
                locations: LocationRegistry::seeded(config.zone_key)?,
                products: ProductCatalog::seeded()?,
                tags,
                readers,
                movements,
                alerts,
                session,
                capacity_warning_percent: config.capacity_warning_percent,
            }
        } else {
            Self {
                locations: LocationRegistry::new(config.zone_key),
                products: ProductCatalog::new(),
                tags: TagRegistry::new(),
                readers: ReaderRegistry::new(),
                movements: MovementLog::new(),
                alerts: AlertLog::new(),
                session,
                capacity_warning_percent: config.capacity_warning_percent,
            }
        };

        tracing::info!(
            seeded = config.seed,
            zone_key = ?config.zone_key,
            locations = app.locations.len(),
            products = app.products.len(),
            "warehouse app ready"
        );
        Ok(app)
    }

    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<&User> {
        self.session.login(username, password, now)
    }

    pub fn login_with(
        &mut self,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> DomainResult<&User> {
        self.session.login_with(credentials, now)
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn capacity_warning_percent(&self) -> f64 {
        self.capacity_warning_percent
    }

    pub fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    pub fn locations_mut(&mut self) -> &mut LocationRegistry {
        &mut self.locations
    }

    pub fn products(&self) -> &ProductCatalog {
        &self.products
    }

    pub fn products_mut(&mut self) -> &mut ProductCatalog {
        &mut self.products
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut TagRegistry {
        &mut self.tags
    }

    pub fn readers(&self) -> &ReaderRegistry {
        &self.readers
    }

    pub fn readers_mut(&mut self) -> &mut ReaderRegistry {
        &mut self.readers
    }

    pub fn movements(&self) -> &MovementLog {
        &self.movements
    }

    pub fn movements_mut(&mut self) -> &mut MovementLog {
        &mut self.movements
    }

    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    pub fn alerts_mut(&mut self) -> &mut AlertLog {
        &mut self.alerts
    }
}
