//! Cryptographic operation errors

use std::path::{Path, PathBuf};

/// Failures in key handling and signature checking.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Key material on disk could not be read or written.
    #[error("key storage failed at {}: {reason}", .path.display())]
    KeyStorage {
        /// Key file the operation touched.
        path: PathBuf,
        /// Underlying io error message.
        reason: String,
    },

    /// PEM/PKCS#8 contents did not parse as a P-384 private key.
    #[error("invalid key material: {reason}")]
    InvalidKeyMaterial {
        /// Underlying parser message.
        reason: String,
    },

    /// Bytes did not decode as a SEC1 public point.
    #[error("invalid public key: {reason}")]
    InvalidPublicKey {
        /// Underlying decoder message.
        reason: String,
    },

    /// Signature bytes are malformed or do not verify. Deliberately carries
    /// no further detail.
    #[error("signature verification failed")]
    SignatureInvalid,
}

impl CryptoError {
    /// Key file read/write failure.
    pub fn key_storage(path: &Path, err: std::io::Error) -> Self {
        Self::KeyStorage {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    /// Unparseable private key material.
    pub fn invalid_key_material(reason: impl Into<String>) -> Self {
        Self::InvalidKeyMaterial {
            reason: reason.into(),
        }
    }

    /// Unparseable public key bytes.
    pub fn invalid_public_key(reason: impl Into<String>) -> Self {
        Self::InvalidPublicKey {
            reason: reason.into(),
        }
    }
}
