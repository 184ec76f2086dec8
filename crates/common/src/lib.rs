//! Shared types: player identities and membership roles.

pub mod types;

pub use types::{PlayerId, Role, RoleParseError};
