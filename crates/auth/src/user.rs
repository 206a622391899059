//! Session user and the credential it is unlocked with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wms_core::{DomainResult, UserId, ensure_not_blank};

use crate::Role;

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// The built-in operator account.
    pub fn administrator(username: impl Into<String>) -> Self {
        Self {
            id: UserId::from("1"),
            username: username.into(),
            name: "Admin Utama".to_string(),
            role: Role::Admin,
            email: "admin@ajinomoto.co.id".to_string(),
            last_login: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Credentials
// ─────────────────────────────────────────────────────────────────────────────

/// Username/password pair accepted by the session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> DomainResult<Self> {
        let username = username.into();
        let password = password.into();
        ensure_not_blank("username", &username)?;
        ensure_not_blank("password", &password)?;
        Ok(Self { username, password })
    }

    /// The dashboard's out-of-the-box `admin`/`admin` account.
    pub fn insecure_default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Exact comparison; usernames are case-sensitive.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
