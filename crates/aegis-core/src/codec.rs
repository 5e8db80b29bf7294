//! Canonical capsule encoding and the signed token wire format.
//!
//! The canonical form is compact JSON with a fixed field order (struct
//! declaration order; map-valued fields iterate in key order), so logically
//! equal capsules always serialize to identical bytes. Signatures are made
//! over exactly these bytes. The wire token is
//! `b64url(payload) "." b64url(signature)`, both segments unpadded.

use crate::capsule::Capsule;
use crate::error::{CapsuleError, VerificationError};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use std::fmt;
use std::str::FromStr;

/// Separator between the payload and signature segments of a token.
pub const TOKEN_SEPARATOR: char = '.';

/// Serialize a capsule to its canonical byte form, the exact bytes that get
/// signed and verified.
pub fn encode(capsule: &Capsule) -> Result<Vec<u8>, CapsuleError> {
    serde_json::to_vec(capsule).map_err(|err| CapsuleError::Serialize {
        reason: err.to_string(),
    })
}

/// Parse canonical bytes back into a capsule, re-checking the payload
/// invariants. Anything that is not a well-formed capsule is a format error.
pub fn decode(bytes: &[u8]) -> Result<Capsule, VerificationError> {
    let capsule: Capsule = serde_json::from_slice(bytes)
        .map_err(|err| VerificationError::format(format!("payload is not a capsule: {err}")))?;
    capsule
        .validate()
        .map_err(|err| VerificationError::format(err.to_string()))?;
    Ok(capsule)
}

/// A parsed wire token: raw payload bytes plus raw signature bytes.
///
/// Parsing only checks token structure. Whether the signature verifies, or
/// the payload is a valid capsule, is decided later in the verification
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapsuleToken {
    payload: Vec<u8>,
    signature: Vec<u8>,
}

impl CapsuleToken {
    /// Assemble a token from payload bytes and signature bytes.
    pub fn new(payload: Vec<u8>, signature: Vec<u8>) -> Self {
        Self { payload, signature }
    }

    /// The canonical payload bytes the signature covers.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The raw signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Decode the payload segment into a capsule.
    pub fn capsule(&self) -> Result<Capsule, VerificationError> {
        decode(&self.payload)
    }
}

impl fmt::Display for CapsuleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            URL_SAFE_NO_PAD.encode(&self.payload),
            TOKEN_SEPARATOR,
            URL_SAFE_NO_PAD.encode(&self.signature)
        )
    }
}

impl FromStr for CapsuleToken {
    type Err = VerificationError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut segments = token.split(TOKEN_SEPARATOR);
        let (payload_b64, signature_b64) = match (segments.next(), segments.next(), segments.next())
        {
            (Some(payload), Some(signature), None) => (payload, signature),
            _ => {
                return Err(VerificationError::format(
                    "token must be two `.`-separated segments",
                ))
            }
        };
        if payload_b64.is_empty() || signature_b64.is_empty() {
            return Err(VerificationError::format("token segment is empty"));
        }
        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| VerificationError::format("payload segment is not base64url"))?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| VerificationError::format("signature segment is not base64url"))?;
        Ok(Self { payload, signature })
    }
}
