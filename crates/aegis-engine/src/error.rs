//! Engine-level errors
//!
//! Only startup and issuance problems surface as errors. Consent checks
//! never fail: every malformed input becomes a structured deny decision.

use aegis_core::error::CapsuleError;
use aegis_crypto::CryptoError;
use aegis_registry::RegistryError;

/// Failures building, configuring, or operating the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Issuance parameters violated an invariant.
    #[error("invalid issuance parameters: {reason}")]
    InvalidParams {
        /// Which parameter, and how it is wrong.
        reason: String,
    },

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {reason}")]
    Config {
        /// What failed, with the file path when one was involved.
        reason: String,
    },

    /// Key material problem.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Revocation log problem.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Capsule construction or encoding problem.
    #[error(transparent)]
    Capsule(#[from] CapsuleError),
}

impl EngineError {
    /// Invalid issuance parameters.
    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }

    /// Configuration problem.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
