//! Environment-driven configuration.

use wms_auth::Credentials;
use wms_core::ensure_not_blank;
use wms_warehouse::ZoneKeyKind;

pub const ADMIN_USERNAME_ENV: &str = "WMS_ADMIN_USERNAME";
pub const ADMIN_PASSWORD_ENV: &str = "WMS_ADMIN_PASSWORD";
pub const ZONE_KEY_ENV: &str = "WMS_ZONE_KEY";
pub const CAPACITY_WARNING_ENV: &str = "WMS_CAPACITY_WARNING_PERCENT";
pub const SEED_ENV: &str = "WMS_SEED";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The single account the session accepts.
    pub credentials: Credentials,
    pub zone_key: ZoneKeyKind,
    /// Projected utilization (percent of capacity) above which inbound and
    /// transfer movements raise a capacity alert.
    pub capacity_warning_percent: f64,
    /// Preload the starter layout, catalog, tags and logs.
    pub seed: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::insecure_default(),
            zone_key: ZoneKeyKind::default(),
            capacity_warning_percent: 100.0,
            seed: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset variables take defaults;
    /// set but malformed ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let credentials = match (lookup(ADMIN_USERNAME_ENV), lookup(ADMIN_PASSWORD_ENV)) {
            (None, None) => {
                tracing::warn!(
                    "{ADMIN_USERNAME_ENV}/{ADMIN_PASSWORD_ENV} not set; using insecure dev default"
                );
                defaults.credentials
            }
            (username, password) => {
                let username = username.unwrap_or_else(|| "admin".to_string());
                let password = password.unwrap_or_else(|| {
                    tracing::warn!("{ADMIN_PASSWORD_ENV} not set; using insecure dev default");
                    "admin".to_string()
                });
                ensure_not_blank("username", &username)
                    .map_err(|e| ConfigError::invalid(ADMIN_USERNAME_ENV, &username, e))?;
                ensure_not_blank("password", &password)
                    .map_err(|e| ConfigError::invalid(ADMIN_PASSWORD_ENV, "<redacted>", e))?;
                Credentials::new(username.clone(), password)
                    .map_err(|e| ConfigError::invalid(ADMIN_USERNAME_ENV, &username, e))?
            }
        };

        let zone_key = match lookup(ZONE_KEY_ENV) {
            Some(raw) => raw
                .parse::<ZoneKeyKind>()
                .map_err(|e| ConfigError::invalid(ZONE_KEY_ENV, &raw, e))?,
            None => defaults.zone_key,
        };

        let capacity_warning_percent = match lookup(CAPACITY_WARNING_ENV) {
            Some(raw) => {
                let value = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| ConfigError::invalid(CAPACITY_WARNING_ENV, &raw, e))?;
                if !value.is_finite() || value <= 0.0 {
                    return Err(ConfigError::invalid(
                        CAPACITY_WARNING_ENV,
                        &raw,
                        "must be a finite number greater than zero",
                    ));
                }
                value
            }
            None => defaults.capacity_warning_percent,
        };

        let seed = match lookup(SEED_ENV) {
            Some(raw) => raw
                .trim()
                .to_ascii_lowercase()
                .parse::<bool>()
                .map_err(|e| ConfigError::invalid(SEED_ENV, &raw, e))?,
            None => defaults.seed,
        };

        Ok(Self {
            credentials,
            zone_key,
            capacity_warning_percent,
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.credentials.matches("admin", "admin"));
        assert_eq!(config.zone_key, ZoneKeyKind::FirstChar);
        assert_eq!(config.capacity_warning_percent, 100.0);
        assert!(config.seed);
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            (ADMIN_USERNAME_ENV, "operator"),
            (ADMIN_PASSWORD_ENV, "s3cret"),
            (ZONE_KEY_ENV, "code-prefix"),
            (CAPACITY_WARNING_ENV, "85.5"),
            (SEED_ENV, "FALSE"),
        ]))
        .unwrap();

        assert!(config.credentials.matches("operator", "s3cret"));
        assert!(!config.credentials.matches("admin", "admin"));
        assert_eq!(config.zone_key, ZoneKeyKind::CodePrefix);
        assert_eq!(config.capacity_warning_percent, 85.5);
        assert!(!config.seed);
    }

    #[test]
    fn rejects_malformed_values() {
        for (var, value) in [
            (ZONE_KEY_ENV, "by-aisle"),
            (CAPACITY_WARNING_ENV, "lots"),
            (CAPACITY_WARNING_ENV, "0"),
            (CAPACITY_WARNING_ENV, "-10"),
            (CAPACITY_WARNING_ENV, "inf"),
            (SEED_ENV, "maybe"),
            (ADMIN_USERNAME_ENV, "  "),
        ] {
            let err = AppConfig::from_lookup(lookup(&[(var, value)])).unwrap_err();
            let ConfigError::Invalid { var: reported, .. } = err;
            assert_eq!(reported, var, "{value}");
        }
    }

    #[test]
    fn blank_password_is_reported_against_its_own_variable() {
        let err = AppConfig::from_lookup(lookup(&[
            (ADMIN_USERNAME_ENV, "operator"),
            (ADMIN_PASSWORD_ENV, "   "),
        ]))
        .unwrap_err();
        let ConfigError::Invalid { var, value, .. } = err;
        assert_eq!(var, ADMIN_PASSWORD_ENV);
        assert_ne!(value, "operator");
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn captured_logs(f: impl FnOnce()) -> String {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn insecure_default_credentials_emit_a_warning() {
        let logs = captured_logs(|| {
            AppConfig::from_lookup(lookup(&[])).unwrap();
        });
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("insecure dev default"), "{logs}");

        let quiet = captured_logs(|| {
            AppConfig::from_lookup(lookup(&[
                (ADMIN_USERNAME_ENV, "operator"),
                (ADMIN_PASSWORD_ENV, "s3cret"),
            ]))
            .unwrap();
        });
        assert!(!quiet.contains("insecure"), "{quiet}");
    }
}
