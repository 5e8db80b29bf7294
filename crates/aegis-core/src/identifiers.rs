//! Identifier types used across the capsule protocol
//!
//! All identifiers are opaque strings at the wire level; the newtypes keep
//! them from being mixed up at call sites. None of them carry structure the
//! core inspects: a subject identifier is whatever the external provider
//! produced, and a platform identifier is whatever the deployment configured.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a consent capsule.
///
/// Assigned once at issuance and never reused. The revocation registry is
/// keyed by this value, so uniqueness is what makes revocation precise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapsuleId(String);

impl CapsuleId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, globally unique identifier (UUIDv4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapsuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CapsuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CapsuleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Opaque identifier of the identity a capsule governs.
///
/// Produced by an external subject-identifier provider from raw biometric
/// input; the core never inspects its internal structure. Requesters and
/// friends-allowlist entries live in the same identifier space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the identifier is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of the party authorized to present a capsule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderId(String);

impl HolderId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for HolderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for HolderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a platform a capsule is valid for.
///
/// A capsule's audience lists these; the checking deployment compares its
/// own configured identifier against that list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformId(String);

impl PlatformId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the identifier is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlatformId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PlatformId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Stable public identifier of an issuer.
///
/// Derived deterministically from the issuer's public key (a tagged hex
/// encoding), so two deployments never collide and holders can pin the
/// issuer they trust.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuerId(String);

impl IssuerId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssuerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IssuerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for IssuerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_capsule_ids_are_unique() {
        let a = CapsuleId::generate();
        let b = CapsuleId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn identifiers_serialize_transparently() {
        let subject = SubjectId::new("s-123");
        let json = serde_json::to_string(&subject).unwrap();
        assert_eq!(json, "\"s-123\"");

        let back: SubjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, subject);
    }

    #[test]
    fn display_shows_raw_value() {
        assert_eq!(PlatformId::new("platformX").to_string(), "platformX");
        assert_eq!(CapsuleId::new("c-1").to_string(), "c-1");
    }
}
