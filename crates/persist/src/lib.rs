//! Persistence: full-state YAML documents for the namespace registry.
//!
//! # Invariants
//! - A document restores to a registry only if every namespace satisfies the
//!   owner invariant and names are unique; anything else is a load failure.
//! - Saves replace the previous file atomically (write temp, then rename).

pub mod document;
pub mod store;

pub use document::{NamespaceDocument, RegistryDocument};
pub use store::{RegistryStore, StoreError};
