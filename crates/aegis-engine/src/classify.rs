//! Content classification
//!
//! Maps a free-text content description onto a [`ContentCategory`] by
//! case-insensitive substring containment. Explicit terms take precedence
//! over erotic ones; term lists are deployment configuration.

use aegis_core::scope::ContentCategory;

/// Default terms that classify as 18+ explicit content.
pub const DEFAULT_EXPLICIT_TERMS: &[&str] = &[
    "nude",
    "naked",
    "nsfw",
    "porn",
    "sex",
    "explicit",
    "bare",
    "uncensored",
    "topless",
    "bottomless",
    "genital",
    "x-rated",
];

/// Default terms that classify as erotic (non-explicit) content.
pub const DEFAULT_EROTIC_TERMS: &[&str] = &[
    "lingerie", "bikini", "sensual", "erotic", "seductive", "bedroom", "boudoir",
];

/// Term-list content classifier.
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    explicit_terms: Vec<String>,
    erotic_terms: Vec<String>,
}

impl ContentClassifier {
    /// Build a classifier from term lists. Terms are normalized to
    /// lowercase; empty terms are dropped.
    pub fn new(explicit_terms: Vec<String>, erotic_terms: Vec<String>) -> Self {
        let normalize = |terms: Vec<String>| {
            terms
                .into_iter()
                .map(|term| term.to_lowercase())
                .filter(|term| !term.is_empty())
                .collect()
        };
        Self {
            explicit_terms: normalize(explicit_terms),
            erotic_terms: normalize(erotic_terms),
        }
    }

    /// Classify a content description. Explicit terms win over erotic;
    /// anything matching neither list is artistic.
    pub fn classify(&self, action: &str) -> ContentCategory {
        let action = action.to_lowercase();
        if self.matches(&self.explicit_terms, &action) {
            ContentCategory::Explicit18
        } else if self.matches(&self.erotic_terms, &action) {
            ContentCategory::Erotic
        } else {
            ContentCategory::Art
        }
    }

    fn matches(&self, terms: &[String], action: &str) -> bool {
        terms.iter().any(|term| action.contains(term.as_str()))
    }
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXPLICIT_TERMS.iter().map(|t| t.to_string()).collect(),
            DEFAULT_EROTIC_TERMS.iter().map(|t| t.to_string()).collect(),
        )
    }
}
