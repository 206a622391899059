//! `wms-auth`: single-account login session for the dashboard.
//!
//! No HTTP, tokens, or storage: the session holds one configured credential.

pub mod roles;
pub mod session;
pub mod user;

pub use roles::Role;
pub use session::AuthSession;
pub use user::{Credentials, User};
