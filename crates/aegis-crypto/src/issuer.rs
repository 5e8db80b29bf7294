//! Issuer identity: ECDSA P-384 signing and verification
//!
//! Capsule tokens are signed with ECDSA over NIST P-384 (SHA-384 digest,
//! ≈192-bit security). Signatures travel as fixed-width 96-byte r‖s values;
//! the issuer is named by a deterministic `did:key:` identifier derived from
//! its public point.

use crate::error::CryptoError;
use crate::Result;
use aegis_core::identifiers::IssuerId;
use p384::ecdsa::signature::{Signer, Verifier};
use p384::ecdsa::{Signature, SigningKey, VerifyingKey};
use p384::SecretKey;
use rand::rngs::OsRng;
use std::fmt;

/// Fixed signature width: r‖s, 48 bytes each.
pub const SIGNATURE_LENGTH: usize = 96;

/// A P-384 ECDSA signature in fixed-width r‖s form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuerSignature([u8; SIGNATURE_LENGTH]);

impl IssuerSignature {
    /// Wrap raw signature bytes. Anything but exactly 96 bytes is rejected
    /// without further detail.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(CryptoError::SignatureInvalid);
        }
        let mut raw = [0u8; SIGNATURE_LENGTH];
        raw.copy_from_slice(bytes);
        Ok(Self(raw))
    }

    /// Signature bytes as a slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Signature bytes as an owned array.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0
    }
}

impl From<Signature> for IssuerSignature {
    fn from(signature: Signature) -> Self {
        let mut raw = [0u8; SIGNATURE_LENGTH];
        raw.copy_from_slice(&signature.to_bytes());
        Self(raw)
    }
}

/// The deployment's signing identity.
///
/// Immutable once constructed; signing needs only `&self`, so one instance
/// can be shared across threads behind an `Arc`.
pub struct IssuerIdentity {
    secret: SecretKey,
    signing_key: SigningKey,
}

impl IssuerIdentity {
    /// Generate a fresh keypair from the OS entropy source.
    pub fn generate() -> Self {
        Self::from_secret(SecretKey::random(&mut OsRng))
    }

    pub(crate) fn from_secret(secret: SecretKey) -> Self {
        let signing_key = SigningKey::from(&secret);
        Self {
            secret,
            signing_key,
        }
    }

    pub(crate) fn secret(&self) -> &SecretKey {
        &self.secret
    }

    /// Sign canonical payload bytes.
    pub fn sign(&self, payload: &[u8]) -> IssuerSignature {
        let signature: Signature = self.signing_key.sign(payload);
        IssuerSignature::from(signature)
    }

    /// The verifying half of this identity.
    pub fn public_key(&self) -> IssuerPublicKey {
        IssuerPublicKey {
            key: VerifyingKey::from(&self.signing_key),
        }
    }

    /// Deterministic `did:key:` identifier for this identity.
    pub fn public_identifier(&self) -> IssuerId {
        self.public_key().identifier()
    }
}

impl fmt::Debug for IssuerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuerIdentity")
            .field("issuer", &self.public_identifier())
            .finish_non_exhaustive()
    }
}

/// The public half of an issuer identity. Holders can pin one out of band
/// via its SEC1 byte form.
#[derive(Debug, Clone)]
pub struct IssuerPublicKey {
    key: VerifyingKey,
}

impl IssuerPublicKey {
    /// Check `signature` over `payload`. A failed check reports only that it
    /// failed, regardless of cause.
    pub fn verify(&self, payload: &[u8], signature: &IssuerSignature) -> Result<()> {
        let signature = Signature::from_slice(signature.as_bytes())
            .map_err(|_| CryptoError::SignatureInvalid)?;
        self.key
            .verify(payload, &signature)
            .map_err(|_| CryptoError::SignatureInvalid)
    }

    /// SEC1 compressed point bytes.
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        self.key.to_encoded_point(true).as_bytes().to_vec()
    }

    /// Rebuild a pinned key from SEC1 bytes, compressed or uncompressed.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        let key = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|err| CryptoError::invalid_public_key(err.to_string()))?;
        Ok(Self { key })
    }

    /// `did:key:` + lowercase hex of the SEC1 compressed point.
    pub fn identifier(&self) -> IssuerId {
        IssuerId::new(format!("did:key:{}", hex::encode(self.to_sec1_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn sign_verify_round_trip() {
        let identity = IssuerIdentity::generate();
        let signature = identity.sign(b"canonical payload");
        identity
            .public_key()
            .verify(b"canonical payload", &signature)
            .unwrap();
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let identity = IssuerIdentity::generate();
        let signature = identity.sign(b"canonical payload");
        let err = identity
            .public_key()
            .verify(b"canonical payloae", &signature)
            .unwrap_err();
        assert_matches!(err, CryptoError::SignatureInvalid);
    }

    #[test]
    fn foreign_key_fails_verification() {
        let identity = IssuerIdentity::generate();
        let other = IssuerIdentity::generate();
        let signature = identity.sign(b"payload");
        assert_matches!(
            other.public_key().verify(b"payload", &signature),
            Err(CryptoError::SignatureInvalid)
        );
    }

    #[test]
    fn signature_length_is_enforced() {
        assert_matches!(
            IssuerSignature::from_slice(&[0u8; 95]),
            Err(CryptoError::SignatureInvalid)
        );
        assert_matches!(
            IssuerSignature::from_slice(&[0u8; 97]),
            Err(CryptoError::SignatureInvalid)
        );
        assert!(IssuerSignature::from_slice(&[0u8; 96]).is_ok());
    }

    #[test]
    fn signature_bytes_round_trip() {
        let identity = IssuerIdentity::generate();
        let signature = identity.sign(b"payload");
        let restored = IssuerSignature::from_slice(signature.as_bytes()).unwrap();
        assert_eq!(restored, signature);
        assert_eq!(signature.to_bytes().len(), SIGNATURE_LENGTH);
    }

    #[test]
    fn identifier_is_did_key_hex_of_compressed_point() {
        let identity = IssuerIdentity::generate();
        let id = identity.public_identifier().to_string();

        let hex_part = id.strip_prefix("did:key:").unwrap();
        // compressed P-384 point: 1 tag byte + 48-byte x coordinate
        assert_eq!(hex_part.len(), 49 * 2);
        assert!(hex_part.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hex_part, hex_part.to_lowercase());

        // stable across calls, distinct across identities
        assert_eq!(identity.public_identifier(), identity.public_identifier());
        assert_ne!(
            identity.public_identifier(),
            IssuerIdentity::generate().public_identifier()
        );
    }

    #[test]
    fn sec1_bytes_round_trip_preserves_identity() {
        let identity = IssuerIdentity::generate();
        let public = identity.public_key();
        let pinned = IssuerPublicKey::from_sec1_bytes(&public.to_sec1_bytes()).unwrap();

        assert_eq!(pinned.identifier(), public.identifier());
        let signature = identity.sign(b"payload");
        pinned.verify(b"payload", &signature).unwrap();
    }

    #[test]
    fn garbage_sec1_bytes_are_rejected() {
        assert_matches!(
            IssuerPublicKey::from_sec1_bytes(&[0xff; 49]),
            Err(CryptoError::InvalidPublicKey { .. })
        );
    }
}
