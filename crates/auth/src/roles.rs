use serde::{Deserialize, Serialize};

/// Dashboard role. Roles are labels only; every authenticated user may call
/// every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Warehouse,
    Supervisor,
    #[default]
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Warehouse => "warehouse",
            Role::Supervisor => "supervisor",
            Role::Staff => "staff",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Role {
    type Err = wms_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "warehouse" => Ok(Role::Warehouse),
            "supervisor" => Ok(Role::Supervisor),
            "staff" => Ok(Role::Staff),
            other => Err(wms_core::DomainError::validation(format!("unknown role: {other}"))),
        }
    }
}
