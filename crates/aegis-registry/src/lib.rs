//! Aegis Registry - Durable Revocation
//!
//! The registry is the protocol's only mutable shared state: a monotonic set
//! of revoked capsule ids, backed by an append-only JSONL log that is
//! replayed at startup. There is no un-revoke.

#![forbid(unsafe_code)]

/// Revocation registry errors
pub mod error;

/// Append-only revocation registry
pub mod revocation;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, error::RegistryError>;

// === Public API Re-exports ===

pub use error::RegistryError;
pub use revocation::RevocationRegistry;
