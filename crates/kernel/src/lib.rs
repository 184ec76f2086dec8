//! Namespace kernel: authoritative registry of namespaces and their members.
//!
//! # Invariants
//! - Every namespace's owner is a member with the Admin role, for its whole lifetime.
//! - Namespace names are unique within a registry.
//! - Every membership mutation is gated on the sender being an Admin of the
//!   target namespace, checked against the current member map.

pub mod error;
pub mod namespace;
pub mod registry;

pub use error::RegistryError;
pub use namespace::Namespace;
pub use registry::{MAX_UNIQUE_NAME_ATTEMPTS, Registry};
