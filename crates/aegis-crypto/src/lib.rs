//! Aegis Crypto - Issuer Identity & Key Material
//!
//! ECDSA P-384 signing and verification for capsule tokens, durable PKCS#8
//! key storage, and subject identity derivation. This crate owns all key
//! material; nothing above it ever sees a private scalar.

#![forbid(unsafe_code)]

/// Cryptographic operation errors
pub mod error;

/// Issuer keypair, signatures, and `did:key:` identifiers
pub mod issuer;

/// Durable issuer key storage
pub mod keystore;

/// Subject identity derivation
pub mod subject;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, error::CryptoError>;

// === Public API Re-exports ===

pub use error::CryptoError;
pub use issuer::{IssuerIdentity, IssuerPublicKey, IssuerSignature, SIGNATURE_LENGTH};
pub use keystore::Keystore;
pub use subject::{DigestSubjectProvider, SubjectIdProvider};
