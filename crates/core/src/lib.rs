//! `wms-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the shared error taxonomy, identifier newtypes, the entity collection every
//! registry is built on, and list-query helpers.

pub mod entity;
pub mod error;
pub mod id;
pub mod list;
pub mod query;
pub mod version;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, ensure_finite, ensure_not_blank};
pub use id::{AlertId, LocationId, MovementId, ProductId, ReaderId, TagId, UserId};
pub use list::EntityList;
pub use query::{Page, Pagination, SortDirection};
pub use version::ExpectedVersion;
