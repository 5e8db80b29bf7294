//! # Consent Flow Example
//!
//! An end-to-end walkthrough of the consent-capsule lifecycle using the
//! actual engine facade from aegis-engine.
//!
//! This example shows:
//! - Opening a `ConsentEngine` with durable state in a scratch directory
//! - Deriving a stable subject id from raw media bytes
//! - Issuing a signed capsule with a per-category scope and a friends list
//! - Running consent checks across content categories and requesters
//! - Revoking the capsule and watching every later check fail closed
//!
//! Run with: `cargo run -p consent-flow`

use aegis_core::{
    EnforcementDecision, EnforcementRequest, HolderId, PlatformId, Scope, ScopeCategory,
    ScopeDecision, SubjectId,
};
use aegis_crypto::{DigestSubjectProvider, SubjectIdProvider};
use aegis_engine::{ConsentEngine, EngineConfig, IssueParams};
use std::error::Error;

/// Print one decision the way a platform audit line would read.
fn report(label: &str, decision: &EnforcementDecision) {
    match decision.grant() {
        Some(grant) => println!(
            "  {label}: ALLOW ({}, capsule {}, price {})",
            decision.reason_code(),
            grant.capsule_id,
            grant.price
        ),
        None => println!("  {label}: DENY ({})", decision.reason_code()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Consent Flow: Capsule Lifecycle ===\n");

    // === Phase 1: Deployment setup ===
    // A platform runs one engine. State (issuer key, revocation log) lives
    // in a directory; a scratch directory keeps this demo self-contained.
    let state = tempfile::tempdir()?;
    let config = EngineConfig {
        platform_id: PlatformId::new("artstation-demo"),
        state_dir: state.path().to_path_buf(),
        ..EngineConfig::default()
    };
    let engine = ConsentEngine::open(&config)?;

    println!("Phase 1: Deployment setup");
    println!("  Platform: {}", engine.platform());
    println!("  Issuer:   {}\n", engine.issuer_identifier());

    // === Phase 2: Subject identity ===
    // The subject id is a digest of reference media, so any party holding
    // the same bytes derives the same id without coordination.
    let provider = DigestSubjectProvider;
    let sample_media: &[u8] = b"reference portrait, sitting, 2024-11-02";
    let subject = provider.derive_subject_id(sample_media);

    println!("Phase 2: Subject identity");
    println!("  Derived subject id: {subject}\n");

    // === Phase 3: Issuance ===
    // The subject consents to ordinary art, refuses erotic and explicit
    // depiction, and limits requesters to one trusted friend.
    let holder = HolderId::new("studio-pixelforge");
    let friend = SubjectId::new("friend-gallery-curator");
    let stranger = SubjectId::new("stranger-4096");

    let scope = Scope::new()
        .grant(ScopeCategory::Art, ScopeDecision::Allow)
        .grant(ScopeCategory::Erotic, ScopeDecision::Deny)
        .grant(ScopeCategory::Explicit18, ScopeDecision::Deny);

    let issued = engine.issue(
        IssueParams::new(subject.clone(), holder)
            .with_scope(scope)
            .with_audience(vec![config.platform_id.clone()])
            .with_friends(vec![friend.clone()])
            .with_price(2_500)
            .with_ttl_secs(600),
    )?;

    println!("Phase 3: Issuance");
    println!("  Capsule id: {}", issued.capsule.id());
    println!("  Expires at: {} (unix)", issued.capsule.expires_at());
    println!("  Token size: {} chars\n", issued.token.len());

    // === Phase 4: Consent checks ===
    println!("Phase 4: Consent checks");

    let art_by_subject = engine.decide(
        &EnforcementRequest::new(subject.clone(), "a watercolor landscape portrait")
            .with_token(issued.token.clone())
            .with_requester(subject.clone()),
    );
    report("subject requests art        ", &art_by_subject);
    assert!(art_by_subject.is_allow(), "subject's own art should pass");

    let art_by_friend = engine.decide(
        &EnforcementRequest::new(subject.clone(), "an oil portrait in autumn light")
            .with_token(issued.token.clone())
            .with_requester(friend.clone()),
    );
    report("friend requests art         ", &art_by_friend);
    assert!(art_by_friend.is_allow(), "allowlisted friend should pass");

    let art_by_stranger = engine.decide(
        &EnforcementRequest::new(subject.clone(), "a charcoal sketch")
            .with_token(issued.token.clone())
            .with_requester(stranger),
    );
    report("stranger requests art       ", &art_by_stranger);
    assert_eq!(art_by_stranger.reason_code(), "not_in_friends_allowlist");

    let erotic_by_friend = engine.decide(
        &EnforcementRequest::new(subject.clone(), "a boudoir photograph")
            .with_token(issued.token.clone())
            .with_requester(friend.clone()),
    );
    report("friend requests erotic      ", &erotic_by_friend);
    assert_eq!(erotic_by_friend.reason_code(), "erotic_content_denied");

    let explicit_by_friend = engine.decide(
        &EnforcementRequest::new(subject.clone(), "an uncensored photo set")
            .with_token(issued.token.clone())
            .with_requester(friend.clone()),
    );
    report("friend requests explicit    ", &explicit_by_friend);
    assert_eq!(explicit_by_friend.reason_code(), "explicit_content_denied");

    let no_token = engine.decide(&EnforcementRequest::new(
        subject.clone(),
        "a watercolor landscape portrait",
    ));
    report("no capsule presented        ", &no_token);
    assert_eq!(no_token.reason_code(), "no_consent_capsule");
    println!();

    // === Phase 5: Revocation ===
    // Revocation is durable before `revoke` returns and idempotent; every
    // check after it fails closed regardless of category or requester.
    println!("Phase 5: Revocation");
    engine.revoke(issued.capsule.id())?;
    engine.revoke(issued.capsule.id())?;

    let after_revoke = engine.decide(
        &EnforcementRequest::new(subject.clone(), "an oil portrait in autumn light")
            .with_token(issued.token.clone())
            .with_requester(friend),
    );
    report("friend re-requests art      ", &after_revoke);
    assert_eq!(after_revoke.reason_code(), "invalid_capsule");
    println!();

    println!("=== Consent flow complete: issue, check, revoke ===");
    Ok(())
}
