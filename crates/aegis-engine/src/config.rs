//! Engine configuration
//!
//! One TOML file per deployment. Everything except `platform_id` has a
//! default, so a minimal config is a single line.

use crate::classify::{ContentClassifier, DEFAULT_EROTIC_TERMS, DEFAULT_EXPLICIT_TERMS};
use crate::error::EngineError;
use crate::Result;
use aegis_core::identifiers::PlatformId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Issuer key file name under the state directory.
pub const ISSUER_KEY_FILE: &str = "issuer.pem";
/// Revocation log file name under the state directory.
pub const REVOCATION_LOG_FILE: &str = "revocations.jsonl";

fn default_state_dir() -> PathBuf {
    PathBuf::from("aegis-state")
}

fn default_ttl_secs() -> u64 {
    3_600
}

fn default_explicit_terms() -> Vec<String> {
    DEFAULT_EXPLICIT_TERMS.iter().map(|t| t.to_string()).collect()
}

fn default_erotic_terms() -> Vec<String> {
    DEFAULT_EROTIC_TERMS.iter().map(|t| t.to_string()).collect()
}

/// Classifier term lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Terms that classify a description as 18+ explicit.
    #[serde(default = "default_explicit_terms")]
    pub explicit_terms: Vec<String>,
    /// Terms that classify a description as erotic.
    #[serde(default = "default_erotic_terms")]
    pub erotic_terms: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            explicit_terms: default_explicit_terms(),
            erotic_terms: default_erotic_terms(),
        }
    }
}

impl ClassifierConfig {
    /// Build the classifier these lists describe.
    pub fn build(&self) -> ContentClassifier {
        ContentClassifier::new(self.explicit_terms.clone(), self.erotic_terms.clone())
    }
}

/// Deployment configuration for a [`crate::service::ConsentEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Identifier this deployment checks capsule audiences against.
    pub platform_id: PlatformId,
    /// Directory holding the issuer key and the revocation log.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Validity window applied when issuance does not name one, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
    /// Content classifier term lists.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            platform_id: PlatformId::new(""),
            state_dir: default_state_dir(),
            default_ttl_secs: default_ttl_secs(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            EngineError::config(format!("failed to read {}: {err}", path.display()))
        })?;
        let config: Self = toml::from_str(&raw).map_err(|err| {
            EngineError::config(format!("failed to parse {}: {err}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants a running engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.platform_id.is_empty() {
            return Err(EngineError::config("platform_id must be non-empty"));
        }
        if self.default_ttl_secs == 0 {
            return Err(EngineError::config("default_ttl_secs must be positive"));
        }
        Ok(())
    }

    /// Where the issuer key lives.
    pub fn issuer_key_path(&self) -> PathBuf {
        self.state_dir.join(ISSUER_KEY_FILE)
    }

    /// Where the revocation log lives.
    pub fn revocation_log_path(&self) -> PathBuf {
        self.state_dir.join(REVOCATION_LOG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: EngineConfig = toml::from_str(r#"platform_id = "platformX""#).unwrap();
        config.validate().unwrap();

        assert_eq!(config.platform_id, PlatformId::new("platformX"));
        assert_eq!(config.state_dir, PathBuf::from("aegis-state"));
        assert_eq!(config.default_ttl_secs, 3_600);
        assert!(config
            .classifier
            .explicit_terms
            .contains(&"nude".to_string()));
        assert!(config
            .classifier
            .erotic_terms
            .contains(&"lingerie".to_string()));
    }

    #[test]
    fn full_config_round_trips_through_toml() {
        let raw = r#"
            platform_id = "platformY"
            state_dir = "/var/lib/aegis"
            default_ttl_secs = 120

            [classifier]
            explicit_terms = ["forbidden"]
            erotic_terms = ["risque"]
        "#;
        let config: EngineConfig = toml::from_str(raw).unwrap();
        config.validate().unwrap();

        assert_eq!(config.state_dir, PathBuf::from("/var/lib/aegis"));
        assert_eq!(config.default_ttl_secs, 120);
        assert_eq!(config.classifier.explicit_terms, vec!["forbidden"]);
        assert_eq!(
            config.issuer_key_path(),
            PathBuf::from("/var/lib/aegis/issuer.pem")
        );
        assert_eq!(
            config.revocation_log_path(),
            PathBuf::from("/var/lib/aegis/revocations.jsonl")
        );
    }

    #[test]
    fn empty_platform_id_fails_validation() {
        let config = EngineConfig::default();
        assert_matches!(config.validate(), Err(EngineError::Config { .. }));
    }

    #[test]
    fn zero_ttl_fails_validation() {
        let config = EngineConfig {
            platform_id: PlatformId::new("platformX"),
            default_ttl_secs: 0,
            ..EngineConfig::default()
        };
        assert_matches!(config.validate(), Err(EngineError::Config { .. }));
    }

    #[test]
    fn load_from_file_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aegis.toml");
        std::fs::write(&path, "platform_id = \"platformX\"\n").unwrap();

        let config = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(config.platform_id, PlatformId::new("platformX"));

        std::fs::write(&path, "platform_id = \"\"\n").unwrap();
        assert_matches!(
            EngineConfig::load_from_file(&path),
            Err(EngineError::Config { .. })
        );

        assert_matches!(
            EngineConfig::load_from_file(&dir.path().join("missing.toml")),
            Err(EngineError::Config { .. })
        );
    }
}
