//! Token verification pipeline
//!
//! A pure function over its inputs: no clock, no mutation, no I/O beyond the
//! registry membership read. Checks run in a fixed order and stop at the
//! first failure, so a caller observing an `Expired` error knows the
//! signature already verified.

use aegis_core::capsule::Capsule;
use aegis_core::codec::CapsuleToken;
use aegis_core::error::VerificationError;
use aegis_core::identifiers::{PlatformId, SubjectId};
use aegis_crypto::{IssuerPublicKey, IssuerSignature};
use aegis_registry::RevocationRegistry;

/// Verify a capsule token presented for `target_subject` on `platform`.
///
/// Order of checks:
/// 1. token structure, then payload decode (`Format`)
/// 2. signature over the exact received payload bytes (`Signature`)
/// 3. revocation (`Revoked`)
/// 4. expiry, inclusive boundary (`Expired`)
/// 5. audience membership (`Audience`)
/// 6. subject binding (`SubjectMismatch`)
///
/// Returns the decoded capsule on success.
pub fn verify_token(
    token: &str,
    target_subject: &SubjectId,
    platform: &PlatformId,
    issuer_key: &IssuerPublicKey,
    registry: &RevocationRegistry,
    now: u64,
) -> Result<Capsule, VerificationError> {
    let token: CapsuleToken = token.parse()?;
    let capsule = token.capsule()?;

    // Signature failures stay undifferentiated: malformed bytes and a wrong
    // signature must be indistinguishable to the presenter.
    let signature =
        IssuerSignature::from_slice(token.signature()).map_err(|_| VerificationError::Signature)?;
    issuer_key
        .verify(token.payload(), &signature)
        .map_err(|_| VerificationError::Signature)?;

    if registry.is_revoked(capsule.id()) {
        return Err(VerificationError::Revoked);
    }
    if capsule.is_expired(now) {
        return Err(VerificationError::Expired);
    }
    if !capsule.audience_contains(platform) {
        return Err(VerificationError::Audience);
    }
    if !capsule.governs(target_subject) {
        return Err(VerificationError::SubjectMismatch);
    }

    Ok(capsule)
}
