//! Scope enforcement
//!
//! The decision tree behind every consent check. Deterministic: the same
//! request against the same state always lands on the same decision, and
//! every path terminates in exactly one allow or deny.

use crate::classify::ContentClassifier;
use crate::verify;
use aegis_core::decision::{DenyReason, EnforcementDecision, EnforcementRequest};
use aegis_core::identifiers::PlatformId;
use aegis_core::scope::{ContentCategory, Scope, ScopeCategory};
use aegis_crypto::IssuerPublicKey;
use aegis_registry::RevocationRegistry;

/// Run one consent check. Never fails; every malformed input maps to a deny.
pub fn evaluate(
    request: &EnforcementRequest,
    classifier: &ContentClassifier,
    issuer_key: &IssuerPublicKey,
    registry: &RevocationRegistry,
    platform: &PlatformId,
    now: u64,
) -> EnforcementDecision {
    let category = classifier.classify(&request.action);

    // Every category is gated, artistic content included: no token, no
    // generation.
    let Some(token) = request.token.as_deref() else {
        return EnforcementDecision::denied(DenyReason::NoConsentCapsule);
    };

    let capsule = match verify::verify_token(
        token,
        &request.target_subject,
        platform,
        issuer_key,
        registry,
        now,
    ) {
        Ok(capsule) => capsule,
        Err(err) => {
            tracing::debug!(kind = %err.kind(), "capsule verification failed");
            return EnforcementDecision::denied(DenyReason::InvalidCapsule { kind: err.kind() });
        }
    };

    if let Some(requester) = &request.requester {
        if requester == &request.target_subject {
            if capsule.scope().denies(ScopeCategory::SelfGeneration) {
                return EnforcementDecision::denied(DenyReason::SelfGenerationDisabled);
            }
        } else if !capsule.friends().is_empty() && !capsule.friends().contains(requester) {
            return EnforcementDecision::denied(DenyReason::NotInFriendsAllowlist);
        }
    }

    if let Some(reason) = category_denial(category, capsule.scope()) {
        return EnforcementDecision::denied(reason);
    }

    EnforcementDecision::granted(&capsule)
}

/// Category gating. Each category is independent; absence of a grant is
/// always a deny.
fn category_denial(category: ContentCategory, scope: &Scope) -> Option<DenyReason> {
    match category {
        ContentCategory::Art => {
            if scope.denies(ScopeCategory::Art) {
                Some(DenyReason::ArtGenerationDenied)
            } else if !scope.allows(ScopeCategory::Art) {
                Some(DenyReason::ArtNotExplicitlyAllowed)
            } else {
                None
            }
        }
        ContentCategory::Explicit18 => {
            (!scope.allows(ScopeCategory::Explicit18)).then_some(DenyReason::ExplicitContentDenied)
        }
        ContentCategory::Erotic => {
            (!scope.allows(ScopeCategory::Erotic)).then_some(DenyReason::EroticContentDenied)
        }
    }
}
