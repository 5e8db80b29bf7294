//! Aegis Core - Consent Capsule Model
//!
//! Foundational types for the consent-capability protocol: identifiers,
//! scoped permissions, the capsule payload with its builder, the canonical
//! encoding and signed token wire format, the enforcement decision
//! vocabulary, and the verification error taxonomy.
//!
//! This crate is pure data and codecs. Key material and signing live in
//! `aegis-crypto`, durable revocation in `aegis-registry`, and the policy
//! engine in `aegis-engine`.

#![forbid(unsafe_code)]

/// Capsule, subject, holder, platform, and issuer identifiers
pub mod identifiers;

/// Scope categories and per-category decisions
pub mod scope;

/// Capsule payload and builder
pub mod capsule;

/// Canonical encoding and the token wire format
pub mod codec;

/// Enforcement requests and decisions
pub mod decision;

/// Verification and payload error taxonomy
pub mod error;

/// Time sources
pub mod time;

// === Public API Re-exports ===

pub use capsule::{Capsule, CapsuleBuilder, ADULT_ACK_KEY};
pub use codec::{CapsuleToken, TOKEN_SEPARATOR};
pub use decision::{ConsentGrant, DenyReason, EnforcementDecision, EnforcementRequest};
pub use error::{CapsuleError, VerificationError, VerificationErrorKind};
pub use identifiers::{CapsuleId, HolderId, IssuerId, PlatformId, SubjectId};
pub use scope::{ContentCategory, Scope, ScopeCategory, ScopeDecision};
pub use time::{Clock, FixedClock, SystemClock};
