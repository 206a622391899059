//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are opaque strings: seed fixtures use readable ids such as
//! `"rack-a-1"`, while registries mint `<prefix>-<uuidv7>` ids on creation.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! string_id {
    ($(#[$meta:meta])* $t:ident, $prefix:literal, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(String);

        impl $t {
            /// Prefix used for generated identifiers.
            pub const PREFIX: &'static str = $prefix;

            /// Mint a fresh identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn generate() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::now_v7().simple()))
            }

            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim().is_empty() {
                    return Err(DomainError::validation(format!("{} cannot be empty", $name)));
                }
                Ok(Self(s.to_string()))
            }
        }
    };
}

string_id!(
    /// Identifier of a storage or operational location.
    LocationId, "loc", "LocationId"
);
string_id!(
    /// Identifier of a catalog product.
    ProductId, "prod", "ProductId"
);
string_id!(
    /// Registry identifier of an RFID tag (not the printed tag code).
    TagId, "tag", "TagId"
);
string_id!(
    /// Identifier of an RFID reader.
    ReaderId, "reader", "ReaderId"
);
string_id!(
    /// Identifier of a recorded goods movement.
    MovementId, "mov", "MovementId"
);
string_id!(
    /// Identifier of an alert.
    AlertId, "alert", "AlertId"
);
string_id!(
    /// Identifier of a user (actor identity).
    UserId, "user", "UserId"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_prefix_and_are_unique() {
        let a = LocationId::generate();
        let b = LocationId::generate();
        assert!(a.as_str().starts_with("loc-"));
        assert_ne!(a, b);
        assert!(MovementId::generate().as_str().starts_with("mov-"));
    }

    #[test]
    fn parse_rejects_blank() {
        assert!("".parse::<TagId>().is_err());
        assert_eq!("rack-a-1".parse::<LocationId>().unwrap(), LocationId::from("rack-a-1"));
    }

    #[test]
    fn serializes_transparently() {
        let id = ReaderId::from("reader-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"reader-1\"");
    }
}
