//! Scope vocabulary: recognized categories and per-category decisions
//!
//! Recognized categories are a closed enum so the enforcement gates stay
//! exhaustive at compile time, while the scope map itself is string-keyed so
//! capsules minted by newer deployments (with categories this build does not
//! know) still decode and re-encode losslessly. Any category the engine does
//! not recognize, or that is simply absent from a capsule's scope, resolves
//! to deny.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Permission categories recognized by the enforcement engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScopeCategory {
    /// Ordinary, non-sexualized depiction.
    #[serde(rename = "art")]
    Art,
    /// Suggestive but non-explicit depiction.
    #[serde(rename = "erotic")]
    Erotic,
    /// Explicit adult depiction.
    #[serde(rename = "explicit_18")]
    Explicit18,
    /// The subject generating content of themselves.
    #[serde(rename = "self")]
    SelfGeneration,
}

impl ScopeCategory {
    /// All recognized categories, in canonical order.
    pub const ALL: [ScopeCategory; 4] = [
        ScopeCategory::Art,
        ScopeCategory::Erotic,
        ScopeCategory::Explicit18,
        ScopeCategory::SelfGeneration,
    ];

    /// Stable wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeCategory::Art => "art",
            ScopeCategory::Erotic => "erotic",
            ScopeCategory::Explicit18 => "explicit_18",
            ScopeCategory::SelfGeneration => "self",
        }
    }

    /// Parse a wire name; unrecognized names return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "art" => Some(ScopeCategory::Art),
            "erotic" => Some(ScopeCategory::Erotic),
            "explicit_18" => Some(ScopeCategory::Explicit18),
            "self" => Some(ScopeCategory::SelfGeneration),
            _ => None,
        }
    }
}

impl fmt::Display for ScopeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-valued decision attached to a scope category.
///
/// Deliberately not a bool: the wire format is the literal strings `allow`
/// and `deny`, and anything else is a malformed capsule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeDecision {
    /// The category is permitted.
    Allow,
    /// The category is refused.
    Deny,
}

impl ScopeDecision {
    /// Stable wire name of the decision.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeDecision::Allow => "allow",
            ScopeDecision::Deny => "deny",
        }
    }

    /// True for [`ScopeDecision::Allow`].
    pub fn is_allow(&self) -> bool {
        matches!(self, ScopeDecision::Allow)
    }
}

impl fmt::Display for ScopeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category assigned to an action descriptor by the classifier.
///
/// Narrower than [`ScopeCategory`]: classification produces exactly one of
/// these three. `self` is a scope key governing who may request, never a
/// classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentCategory {
    /// Neither explicit nor erotic terms matched.
    #[serde(rename = "art")]
    Art,
    /// An erotic term matched (and no explicit term).
    #[serde(rename = "erotic")]
    Erotic,
    /// An explicit term matched; takes precedence over erotic.
    #[serde(rename = "explicit_18")]
    Explicit18,
}

impl ContentCategory {
    /// Stable wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::Art => "art",
            ContentCategory::Erotic => "erotic",
            ContentCategory::Explicit18 => "explicit_18",
        }
    }

    /// The scope key gating this content category.
    pub fn scope_category(&self) -> ScopeCategory {
        match self {
            ContentCategory::Art => ScopeCategory::Art,
            ContentCategory::Erotic => ScopeCategory::Erotic,
            ContentCategory::Explicit18 => ScopeCategory::Explicit18,
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category allow/deny permission set embedded in a capsule.
///
/// Backed by a `BTreeMap` so canonical encoding orders keys structurally.
/// Lookups of absent categories return `None`; enforcement treats that as
/// deny.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(BTreeMap<String, ScopeDecision>);

impl Scope {
    /// Empty scope: every category resolves to deny.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decision for a recognized category, consuming and returning
    /// the scope for chained construction.
    pub fn grant(mut self, category: ScopeCategory, decision: ScopeDecision) -> Self {
        self.0.insert(category.as_str().to_string(), decision);
        self
    }

    /// Add a decision under a raw key, for categories this build does not
    /// recognize. The enforcement engine will never consult such entries.
    pub fn grant_raw(mut self, category: impl Into<String>, decision: ScopeDecision) -> Self {
        self.0.insert(category.into(), decision);
        self
    }

    /// Set a decision in place.
    pub fn set(&mut self, category: ScopeCategory, decision: ScopeDecision) {
        self.0.insert(category.as_str().to_string(), decision);
    }

    /// The recorded decision for `category`, if any.
    pub fn decision(&self, category: ScopeCategory) -> Option<ScopeDecision> {
        self.0.get(category.as_str()).copied()
    }

    /// True only when `category` is explicitly allowed. Absence is deny.
    pub fn allows(&self, category: ScopeCategory) -> bool {
        self.decision(category) == Some(ScopeDecision::Allow)
    }

    /// True only when `category` is explicitly denied.
    pub fn denies(&self, category: ScopeCategory) -> bool {
        self.decision(category) == Some(ScopeDecision::Deny)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no category has a recorded decision.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in canonical key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ScopeDecision)> {
        self.0.iter().map(|(key, decision)| (key.as_str(), *decision))
    }
}
