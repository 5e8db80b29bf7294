//! Consent engine facade
//!
//! The collaborator surface a request layer talks to: `issue`, `decide`,
//! `revoke`. The engine owns the issuer identity, the revocation registry,
//! the classifier, and the deployment's platform identity. Decisions are
//! pure; the clock is consulted only here.

use crate::classify::ContentClassifier;
use crate::config::EngineConfig;
use crate::enforce;
use crate::error::EngineError;
use crate::Result;
use aegis_core::capsule::Capsule;
use aegis_core::codec::{self, CapsuleToken};
use aegis_core::decision::{EnforcementDecision, EnforcementRequest};
use aegis_core::identifiers::{CapsuleId, HolderId, IssuerId, PlatformId, SubjectId};
use aegis_core::scope::Scope;
use aegis_core::time::{Clock, SystemClock};
use aegis_crypto::{IssuerIdentity, IssuerPublicKey, Keystore};
use aegis_registry::RevocationRegistry;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Parameters for issuing one consent capsule.
#[derive(Debug, Clone)]
pub struct IssueParams {
    /// Subject granting consent over their likeness.
    pub subject: SubjectId,
    /// Party the capsule is issued to.
    pub holder: HolderId,
    /// Granted per-category permissions.
    pub scope: Scope,
    /// Platforms the capsule will be valid on.
    pub audience: Vec<PlatformId>,
    /// Advisory price in minor units.
    pub price: u64,
    /// Requesters allowed to act for the subject; empty means unrestricted.
    pub friends: Vec<SubjectId>,
    /// Validity window length in seconds; `None` uses the engine default.
    pub ttl_secs: Option<u64>,
    /// Opaque auxiliary metadata.
    pub metadata: BTreeMap<String, String>,
}

impl IssueParams {
    /// Parameters with everything optional left empty.
    pub fn new(subject: SubjectId, holder: HolderId) -> Self {
        Self {
            subject,
            holder,
            scope: Scope::new(),
            audience: Vec::new(),
            price: 0,
            friends: Vec::new(),
            ttl_secs: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Set the granted scope.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the audience.
    pub fn with_audience(mut self, audience: Vec<PlatformId>) -> Self {
        self.audience = audience;
        self
    }

    /// Set the advisory price.
    pub fn with_price(mut self, price: u64) -> Self {
        self.price = price;
        self
    }

    /// Set the friends allowlist.
    pub fn with_friends(mut self, friends: Vec<SubjectId>) -> Self {
        self.friends = friends;
        self
    }

    /// Override the validity window length.
    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = Some(ttl_secs);
        self
    }

    /// Add one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A freshly issued capsule: the signed token plus the payload it carries.
/// Callers keep the id if they want to revoke later.
#[derive(Debug, Clone)]
pub struct IssuedCapsule {
    /// Signed wire token.
    pub token: String,
    /// The issued payload.
    pub capsule: Capsule,
}

/// One deployment's consent engine.
pub struct ConsentEngine {
    issuer: Arc<IssuerIdentity>,
    issuer_key: IssuerPublicKey,
    registry: Arc<RevocationRegistry>,
    classifier: ContentClassifier,
    platform: PlatformId,
    default_ttl_secs: u64,
    clock: Arc<dyn Clock>,
}

impl ConsentEngine {
    /// Wire up an engine from deployment configuration: load or create the
    /// issuer key, replay the revocation log, build the classifier.
    pub fn open(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let issuer = Keystore::load_or_generate(&config.issuer_key_path())?;
        let registry = RevocationRegistry::open(&config.revocation_log_path())?;
        let engine = Self::new(
            Arc::new(issuer),
            Arc::new(registry),
            config.classifier.build(),
            config.platform_id.clone(),
            config.default_ttl_secs,
            Arc::new(SystemClock),
        );
        tracing::info!(
            issuer = %engine.issuer_identifier(),
            platform = %engine.platform,
            "consent engine ready"
        );
        Ok(engine)
    }

    /// Assemble an engine from explicit parts.
    pub fn new(
        issuer: Arc<IssuerIdentity>,
        registry: Arc<RevocationRegistry>,
        classifier: ContentClassifier,
        platform: PlatformId,
        default_ttl_secs: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let issuer_key = issuer.public_key();
        Self {
            issuer,
            issuer_key,
            registry,
            classifier,
            platform,
            default_ttl_secs,
            clock,
        }
    }

    /// Issue a signed consent capsule.
    pub fn issue(&self, params: IssueParams) -> Result<IssuedCapsule> {
        let ttl = params.ttl_secs.unwrap_or(self.default_ttl_secs);
        if ttl == 0 {
            return Err(EngineError::invalid_params("ttl must be positive"));
        }
        if params.subject.is_empty() {
            return Err(EngineError::invalid_params("subject must be non-empty"));
        }
        if params.audience.is_empty() {
            return Err(EngineError::invalid_params(
                "audience must name at least one platform",
            ));
        }

        let now = self.clock.unix_now();
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| EngineError::invalid_params("ttl overflows the validity window"))?;

        let mut builder = Capsule::builder()
            .id(CapsuleId::generate())
            .issuer(self.issuer.public_identifier())
            .subject(params.subject)
            .holder(params.holder)
            .scope(params.scope)
            .price(params.price)
            .friends(params.friends)
            .audience(params.audience)
            .validity(now, expires_at);
        for (key, value) in params.metadata {
            builder = builder.metadata(key, value);
        }
        let capsule = builder.build()?;

        let payload = codec::encode(&capsule)?;
        let signature = self.issuer.sign(&payload);
        let token = CapsuleToken::new(payload, signature.to_bytes().to_vec()).to_string();

        tracing::info!(
            capsule = %capsule.id(),
            subject = %capsule.subject(),
            holder = %capsule.holder(),
            expires_at = capsule.expires_at(),
            "issued consent capsule"
        );
        Ok(IssuedCapsule { token, capsule })
    }

    /// Run one consent check. Never fails; malformed inputs become denies.
    pub fn decide(&self, request: &EnforcementRequest) -> EnforcementDecision {
        let decision = enforce::evaluate(
            request,
            &self.classifier,
            &self.issuer_key,
            &self.registry,
            &self.platform,
            self.clock.unix_now(),
        );
        tracing::debug!(
            subject = %request.target_subject,
            decision = decision.reason_code(),
            "consent check"
        );
        decision
    }

    /// Revoke a capsule id. Durable before return; idempotent.
    pub fn revoke(&self, id: &CapsuleId) -> Result<()> {
        self.registry.revoke(id)?;
        tracing::info!(capsule = %id, "capsule revoked");
        Ok(())
    }

    /// This deployment's issuer identifier.
    pub fn issuer_identifier(&self) -> IssuerId {
        self.issuer.public_identifier()
    }

    /// The verifying half of the issuer key, for out-of-band pinning.
    pub fn issuer_public_key(&self) -> IssuerPublicKey {
        self.issuer_key.clone()
    }

    /// The platform this engine checks audiences against.
    pub fn platform(&self) -> &PlatformId {
        &self.platform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::scope::{ScopeCategory, ScopeDecision};
    use aegis_core::time::FixedClock;
    use assert_matches::assert_matches;

    fn engine_at(now: u64) -> ConsentEngine {
        ConsentEngine::new(
            Arc::new(IssuerIdentity::generate()),
            Arc::new(RevocationRegistry::ephemeral()),
            ContentClassifier::default(),
            PlatformId::new("platformX"),
            3_600,
            Arc::new(FixedClock::at(now)),
        )
    }

    fn art_params() -> IssueParams {
        IssueParams::new(SubjectId::new("s-1"), HolderId::new("h-1"))
            .with_scope(Scope::new().grant(ScopeCategory::Art, ScopeDecision::Allow))
            .with_audience(vec![PlatformId::new("platformX")])
    }

    #[test]
    fn issue_stamps_the_validity_window_from_the_clock() {
        let engine = engine_at(10_000);
        let issued = engine.issue(art_params().with_ttl_secs(60)).unwrap();

        assert_eq!(issued.capsule.issued_at(), 10_000);
        assert_eq!(issued.capsule.expires_at(), 10_060);
        assert_eq!(issued.capsule.issuer(), &engine.issuer_identifier());
    }

    #[test]
    fn issue_applies_the_default_ttl() {
        let engine = engine_at(10_000);
        let issued = engine.issue(art_params()).unwrap();
        assert_eq!(issued.capsule.expires_at(), 13_600);
    }

    #[test]
    fn issued_ids_are_unique() {
        let engine = engine_at(10_000);
        let first = engine.issue(art_params()).unwrap();
        let second = engine.issue(art_params()).unwrap();
        assert_ne!(first.capsule.id(), second.capsule.id());
    }

    #[test]
    fn issue_rejects_invalid_parameters() {
        let engine = engine_at(10_000);

        assert_matches!(
            engine.issue(art_params().with_ttl_secs(0)),
            Err(EngineError::InvalidParams { .. })
        );
        assert_matches!(
            engine.issue(art_params().with_audience(vec![])),
            Err(EngineError::InvalidParams { .. })
        );
        let empty_subject = IssueParams::new(SubjectId::new(""), HolderId::new("h-1"))
            .with_audience(vec![PlatformId::new("platformX")]);
        assert_matches!(
            engine.issue(empty_subject),
            Err(EngineError::InvalidParams { .. })
        );
        assert_matches!(
            engine.issue(art_params().with_ttl_secs(u64::MAX)),
            Err(EngineError::InvalidParams { .. })
        );
    }

    #[test]
    fn issued_tokens_verify_and_decide() {
        let engine = engine_at(10_000);
        let issued = engine.issue(art_params()).unwrap();

        let request = EnforcementRequest::new(SubjectId::new("s-1"), "a charcoal portrait")
            .with_token(issued.token);
        let decision = engine.decide(&request);
        assert!(decision.is_allow());
        assert_eq!(
            decision.grant().unwrap().capsule_id,
            *issued.capsule.id()
        );
    }

    #[test]
    fn revoke_is_effective_and_idempotent() {
        let engine = engine_at(10_000);
        let issued = engine.issue(art_params()).unwrap();

        engine.revoke(issued.capsule.id()).unwrap();
        engine.revoke(issued.capsule.id()).unwrap();

        let request = EnforcementRequest::new(SubjectId::new("s-1"), "a charcoal portrait")
            .with_token(issued.token);
        assert_eq!(engine.decide(&request).reason_code(), "invalid_capsule");
    }

    #[test]
    fn metadata_entries_travel_with_the_capsule() {
        let engine = engine_at(10_000);
        let issued = engine
            .issue(art_params().with_metadata(aegis_core::ADULT_ACK_KEY, "true"))
            .unwrap();
        assert!(issued.capsule.adult_acknowledged());
    }
}
