//! Enforcement requests and decisions.
//!
//! Every consent check takes one [`EnforcementRequest`] and terminates in
//! exactly one [`EnforcementDecision`]. Denials carry a machine-readable
//! [`DenyReason`]; callers branch on [`DenyReason::code`], which is a stable
//! string contract.

use crate::capsule::Capsule;
use crate::error::VerificationErrorKind;
use crate::identifiers::{CapsuleId, HolderId, SubjectId};
use crate::scope::Scope;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A request to generate content depicting `target_subject`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementRequest {
    /// Capsule token presented with the request, if any.
    pub token: Option<String>,
    /// Subject whose likeness the content would depict.
    pub target_subject: SubjectId,
    /// Who is asking, when known. Absent for anonymous checks.
    pub requester: Option<SubjectId>,
    /// The content description to classify.
    pub action: String,
}

impl EnforcementRequest {
    /// A tokenless, anonymous request.
    pub fn new(target_subject: SubjectId, action: impl Into<String>) -> Self {
        Self {
            token: None,
            target_subject,
            requester: None,
            action: action.into(),
        }
    }

    /// Attach a capsule token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Name the requester.
    pub fn with_requester(mut self, requester: SubjectId) -> Self {
        self.requester = Some(requester);
        self
    }
}

/// Why a consent check was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// No capsule token was presented.
    NoConsentCapsule,
    /// The presented token failed verification. The kind is attached for
    /// logging; the reason code stays `invalid_capsule` regardless.
    InvalidCapsule {
        /// Which verification step rejected the token.
        kind: VerificationErrorKind,
    },
    /// The subject asked to generate their own likeness with `self` denied.
    SelfGenerationDisabled,
    /// The requester is not in the capsule's friends allowlist.
    NotInFriendsAllowlist,
    /// The capsule explicitly denies artistic generation.
    ArtGenerationDenied,
    /// The capsule does not explicitly allow artistic generation.
    ArtNotExplicitlyAllowed,
    /// The capsule does not allow 18+ explicit content.
    ExplicitContentDenied,
    /// The capsule does not allow erotic content.
    EroticContentDenied,
}

impl DenyReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoConsentCapsule => "no_consent_capsule",
            Self::InvalidCapsule { .. } => "invalid_capsule",
            Self::SelfGenerationDisabled => "self_generation_disabled",
            Self::NotInFriendsAllowlist => "not_in_friends_allowlist",
            Self::ArtGenerationDenied => "art_generation_denied",
            Self::ArtNotExplicitlyAllowed => "art_not_explicitly_allowed",
            Self::ExplicitContentDenied => "explicit_content_denied",
            Self::EroticContentDenied => "erotic_content_denied",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapsule { kind } => write!(f, "{}: {kind}", self.code()),
            _ => f.write_str(self.code()),
        }
    }
}

/// What an allowed check hands back to the caller: the resolved terms of the
/// verified capsule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentGrant {
    /// Id of the capsule the grant came from.
    pub capsule_id: CapsuleId,
    /// Holder the capsule was issued to.
    pub holder: HolderId,
    /// Per-category permissions as granted.
    pub scope: Scope,
    /// Advisory price in minor units.
    pub price: u64,
}

/// Outcome of a consent check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementDecision {
    /// The action may proceed under the granted terms.
    Allow(ConsentGrant),
    /// The action must not proceed.
    Deny {
        /// Why it was refused.
        reason: DenyReason,
    },
}

impl EnforcementDecision {
    /// Allow, with the grant terms lifted from a verified capsule.
    pub fn granted(capsule: &Capsule) -> Self {
        Self::Allow(ConsentGrant {
            capsule_id: capsule.id().clone(),
            holder: capsule.holder().clone(),
            scope: capsule.scope().clone(),
            price: capsule.price(),
        })
    }

    /// Deny with the given reason.
    pub fn denied(reason: DenyReason) -> Self {
        Self::Deny { reason }
    }

    /// True if the action may proceed.
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    /// True if the action was refused.
    pub fn is_deny(&self) -> bool {
        !self.is_allow()
    }

    /// Stable machine-readable code: `consent_granted` or the deny code.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Allow(_) => "consent_granted",
            Self::Deny { reason } => reason.code(),
        }
    }

    /// The grant terms, if allowed.
    pub fn grant(&self) -> Option<&ConsentGrant> {
        match self {
            Self::Allow(grant) => Some(grant),
            Self::Deny { .. } => None,
        }
    }
}
