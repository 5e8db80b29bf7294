//! Consent capsule payload
//!
//! A capsule is the unsigned payload of a consent grant: who it governs, who
//! may present it, what it permits, where it is valid, and for how long. The
//! signed wire form is produced by the codec; this module only guards the
//! payload invariants.

use crate::error::CapsuleError;
use crate::identifiers::{CapsuleId, HolderId, IssuerId, PlatformId, SubjectId};
use crate::scope::Scope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key recording that the subject acknowledged 18+ content terms.
///
/// Informational only: enforcement decisions never read metadata.
pub const ADULT_ACK_KEY: &str = "adult_ack";

/// A scoped, time-bounded consent grant, prior to signing.
///
/// Field declaration order is the canonical wire order (`id`, `iss`, `sub`,
/// `holder`, `scope`, `price`, `friends`, `aud`, `iat`, `exp`, `meta`); the
/// codec relies on it, so fields must not be reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capsule {
    id: CapsuleId,
    #[serde(rename = "iss")]
    issuer: IssuerId,
    #[serde(rename = "sub")]
    subject: SubjectId,
    holder: HolderId,
    scope: Scope,
    #[serde(default)]
    price: u64,
    #[serde(default)]
    friends: Vec<SubjectId>,
    #[serde(rename = "aud")]
    audience: Vec<PlatformId>,
    #[serde(rename = "iat")]
    issued_at: u64,
    #[serde(rename = "exp")]
    expires_at: u64,
    #[serde(rename = "meta", default)]
    metadata: BTreeMap<String, String>,
}

impl Capsule {
    /// Start building a capsule.
    pub fn builder() -> CapsuleBuilder {
        CapsuleBuilder::default()
    }

    /// Unique identifier, assigned at issuance.
    pub fn id(&self) -> &CapsuleId {
        &self.id
    }

    /// Identifier of the issuing deployment.
    pub fn issuer(&self) -> &IssuerId {
        &self.issuer
    }

    /// Subject the capsule governs.
    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    /// Party authorized to present the capsule.
    pub fn holder(&self) -> &HolderId {
        &self.holder
    }

    /// Per-category permissions.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Advisory price in minor units. Passed through, never settled here.
    pub fn price(&self) -> u64 {
        self.price
    }

    /// Requesters allowed to act on the subject's behalf; empty means
    /// unrestricted.
    pub fn friends(&self) -> &[SubjectId] {
        &self.friends
    }

    /// Platforms the capsule is valid for.
    pub fn audience(&self) -> &[PlatformId] {
        &self.audience
    }

    /// Issuance time, Unix seconds.
    pub fn issued_at(&self) -> u64 {
        self.issued_at
    }

    /// Expiry time, Unix seconds. The boundary is inclusive: the capsule is
    /// already expired at exactly this instant.
    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    /// Opaque auxiliary metadata.
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// True once the validity window has ended (`now >= expires_at`).
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    /// True if `platform` appears in the audience.
    pub fn audience_contains(&self, platform: &PlatformId) -> bool {
        self.audience.contains(platform)
    }

    /// True if the capsule is bound to `subject`.
    pub fn governs(&self, subject: &SubjectId) -> bool {
        &self.subject == subject
    }

    /// Informational flag: did the subject acknowledge 18+ content terms
    /// when granting this capsule? Never consulted by enforcement.
    pub fn adult_acknowledged(&self) -> bool {
        self.metadata
            .get(ADULT_ACK_KEY)
            .is_some_and(|value| value == "true")
    }

    /// Check the payload invariants. Both the builder and the codec call
    /// this, so a `Capsule` in hand always satisfies them.
    pub(crate) fn validate(&self) -> Result<(), CapsuleError> {
        if self.expires_at <= self.issued_at {
            return Err(CapsuleError::InvalidValidity {
                issued_at: self.issued_at,
                expires_at: self.expires_at,
            });
        }
        Ok(())
    }
}

/// Builder for [`Capsule`].
///
/// `build` enforces the validity-window invariant and canonicalizes the
/// set-valued fields (friends and audience are sorted and deduplicated so
/// logically equal capsules encode to identical bytes).
#[derive(Debug, Default)]
pub struct CapsuleBuilder {
    id: Option<CapsuleId>,
    issuer: Option<IssuerId>,
    subject: Option<SubjectId>,
    holder: Option<HolderId>,
    scope: Scope,
    price: u64,
    friends: Vec<SubjectId>,
    audience: Vec<PlatformId>,
    issued_at: Option<u64>,
    expires_at: Option<u64>,
    metadata: BTreeMap<String, String>,
}

impl CapsuleBuilder {
    /// Set the capsule id.
    pub fn id(mut self, id: CapsuleId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the issuer identifier.
    pub fn issuer(mut self, issuer: IssuerId) -> Self {
        self.issuer = Some(issuer);
        self
    }

    /// Set the governed subject.
    pub fn subject(mut self, subject: SubjectId) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Set the authorized holder.
    pub fn holder(mut self, holder: HolderId) -> Self {
        self.holder = Some(holder);
        self
    }

    /// Set the scope.
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the advisory price in minor units.
    pub fn price(mut self, price: u64) -> Self {
        self.price = price;
        self
    }

    /// Add one allowed requester.
    pub fn friend(mut self, friend: SubjectId) -> Self {
        self.friends.push(friend);
        self
    }

    /// Replace the allowed-requester list.
    pub fn friends(mut self, friends: Vec<SubjectId>) -> Self {
        self.friends = friends;
        self
    }

    /// Replace the audience list.
    pub fn audience(mut self, audience: Vec<PlatformId>) -> Self {
        self.audience = audience;
        self
    }

    /// Add one platform to the audience.
    pub fn platform(mut self, platform: PlatformId) -> Self {
        self.audience.push(platform);
        self
    }

    /// Set the validity window, Unix seconds. `expires_at` must be strictly
    /// greater than `issued_at`.
    pub fn validity(mut self, issued_at: u64, expires_at: u64) -> Self {
        self.issued_at = Some(issued_at);
        self.expires_at = Some(expires_at);
        self
    }

    /// Add one metadata entry.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Finish building, checking required fields and invariants.
    pub fn build(self) -> Result<Capsule, CapsuleError> {
        let mut friends = self.friends;
        friends.sort();
        friends.dedup();

        let mut audience = self.audience;
        audience.sort();
        audience.dedup();

        let capsule = Capsule {
            id: self.id.ok_or(CapsuleError::MissingField { field: "id" })?,
            issuer: self
                .issuer
                .ok_or(CapsuleError::MissingField { field: "issuer" })?,
            subject: self
                .subject
                .ok_or(CapsuleError::MissingField { field: "subject" })?,
            holder: self
                .holder
                .ok_or(CapsuleError::MissingField { field: "holder" })?,
            scope: self.scope,
            price: self.price,
            friends,
            audience,
            issued_at: self
                .issued_at
                .ok_or(CapsuleError::MissingField { field: "issued_at" })?,
            expires_at: self
                .expires_at
                .ok_or(CapsuleError::MissingField { field: "expires_at" })?,
            metadata: self.metadata,
        };
        capsule.validate()?;
        Ok(capsule)
    }
}
