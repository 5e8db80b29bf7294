//! Subject identity derivation

use aegis_core::identifiers::SubjectId;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

/// Derives a stable subject identifier from raw reference media.
///
/// Deployments plug in their own extractor (face embeddings, perceptual
/// hashes); the protocol only requires the mapping to be deterministic and
/// collision resistant.
pub trait SubjectIdProvider: Send + Sync {
    /// Derive the subject id for `media`.
    fn derive_subject_id(&self, media: &[u8]) -> SubjectId;
}

/// Content-digest provider: BLAKE3 of the raw media, urlsafe-base64 encoded.
///
/// A stand-in for a real feature extractor. Any byte-level change yields a
/// different subject id, so it pins exact reference media rather than a
/// likeness.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestSubjectProvider;

impl SubjectIdProvider for DigestSubjectProvider {
    fn derive_subject_id(&self, media: &[u8]) -> SubjectId {
        let digest = blake3::hash(media);
        SubjectId::new(URL_SAFE_NO_PAD.encode(digest.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let provider = DigestSubjectProvider;
        assert_eq!(
            provider.derive_subject_id(b"reference portrait"),
            provider.derive_subject_id(b"reference portrait")
        );
    }

    #[test]
    fn distinct_media_get_distinct_ids() {
        let provider = DigestSubjectProvider;
        assert_ne!(
            provider.derive_subject_id(b"portrait a"),
            provider.derive_subject_id(b"portrait b")
        );
    }

    #[test]
    fn ids_are_compact_and_url_safe() {
        let id = DigestSubjectProvider.derive_subject_id(b"media");
        // 32-byte digest, unpadded base64
        assert_eq!(id.as_str().len(), 43);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
