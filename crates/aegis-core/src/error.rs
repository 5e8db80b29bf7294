//! Error taxonomy for capsule verification and construction
//!
//! Every verification failure is an expected, recoverable business outcome,
//! so this is a plain error enum rather than a panic path. The `Signature`
//! variant deliberately carries no detail: altered bytes, a wrong key, and
//! undecodable signature bytes all collapse into one indistinguishable
//! failure so callers cannot probe which cryptographic check rejected a
//! token.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a token failed verification.
///
/// Produced by the codec (`Format`) and by the verification engine (the
/// rest), in the engine's fixed short-circuit order: format, signature,
/// revocation, expiry, audience, subject binding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    /// The token or its payload could not be parsed.
    #[error("malformed token: {reason}")]
    Format {
        /// What failed to parse. For logs; callers branch on the kind.
        reason: String,
    },

    /// The signature check failed. No further detail is ever attached.
    #[error("invalid signature")]
    Signature,

    /// The capsule id is present in the revocation registry.
    #[error("capsule has been revoked")]
    Revoked,

    /// The capsule's validity window has ended (`now >= expires_at`).
    #[error("capsule has expired")]
    Expired,

    /// The checking platform is not in the capsule's audience.
    #[error("capsule is not valid for this platform")]
    Audience,

    /// The capsule governs a different subject than the request targets.
    #[error("capsule subject does not match the target subject")]
    SubjectMismatch,
}

impl VerificationError {
    /// Create a format error.
    pub fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
        }
    }

    /// Stable classification of this error.
    pub fn kind(&self) -> VerificationErrorKind {
        match self {
            Self::Format { .. } => VerificationErrorKind::Format,
            Self::Signature => VerificationErrorKind::Signature,
            Self::Revoked => VerificationErrorKind::Revoked,
            Self::Expired => VerificationErrorKind::Expired,
            Self::Audience => VerificationErrorKind::Audience,
            Self::SubjectMismatch => VerificationErrorKind::SubjectMismatch,
        }
    }
}

/// Machine-readable classification of a [`VerificationError`].
///
/// This is what travels inside deny decisions and log records; the error
/// itself stays in-process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationErrorKind {
    /// Token or payload did not parse.
    Format,
    /// Signature check failed.
    Signature,
    /// Capsule id is revoked.
    Revoked,
    /// Validity window has ended.
    Expired,
    /// Platform not in the capsule's audience.
    Audience,
    /// Capsule bound to a different subject.
    SubjectMismatch,
}

impl VerificationErrorKind {
    /// Stable snake_case code for logs and decision payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Signature => "signature",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
            Self::Audience => "audience",
            Self::SubjectMismatch => "subject_mismatch",
        }
    }
}

impl fmt::Display for VerificationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Failure to construct or canonically encode a capsule.
///
/// These surface at issuance time, never on the check path: a received
/// capsule violating the same rules is reported as a
/// [`VerificationError::Format`] by the codec instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapsuleError {
    /// A required builder field was never set.
    #[error("capsule is missing required field `{field}`")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },

    /// `expires_at` must be strictly greater than `issued_at`.
    #[error("invalid validity window: expires_at {expires_at} must exceed issued_at {issued_at}")]
    InvalidValidity {
        /// Issuance timestamp, Unix seconds.
        issued_at: u64,
        /// Expiry timestamp, Unix seconds.
        expires_at: u64,
    },

    /// Canonical encoding failed.
    #[error("capsule serialization failed: {reason}")]
    Serialize {
        /// Underlying serializer message.
        reason: String,
    },
}
