//! Aegis Engine - Verification & Scope Enforcement
//!
//! The policy half of the consent-capsule protocol: the token verification
//! pipeline, the content classifier, the enforcement decision tree, and the
//! `ConsentEngine` facade that ties them to an issuer identity and a
//! revocation registry.
//!
//! Embedding programs hold one [`ConsentEngine`] per deployment and call
//! three operations: [`ConsentEngine::issue`], [`ConsentEngine::decide`],
//! and [`ConsentEngine::revoke`].

#![forbid(unsafe_code)]

/// Content classification
pub mod classify;

/// Deployment configuration
pub mod config;

/// Scope enforcement decision tree
pub mod enforce;

/// Engine-level errors
pub mod error;

/// Consent engine facade
pub mod service;

/// Token verification pipeline
pub mod verify;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, error::EngineError>;

// === Public API Re-exports ===

pub use classify::ContentClassifier;
pub use config::{ClassifierConfig, EngineConfig};
pub use error::EngineError;
pub use service::{ConsentEngine, IssueParams, IssuedCapsule};
pub use verify::verify_token;

// Request/decision vocabulary comes from aegis-core; re-exported so callers
// of the facade need only this crate.
pub use aegis_core::decision::{ConsentGrant, DenyReason, EnforcementDecision, EnforcementRequest};
