//! Configuration for the canonicalization pass.

use serde::{Deserialize, Serialize};

/// Errors produced while loading a [`CanonConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML source failed to parse or deserialize.
    #[error("invalid canonicalization config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Configuration controlling which canonicalization rules run.
///
/// Rules are identified by their kebab-case names (e.g.
/// `"xor-all-bits-set"`). Names that match no rule are ignored, so a config
/// written for a newer rule set still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonConfig {
    /// Rule names that should not be applied.
    pub disabled: Vec<String>,
}

impl CanonConfig {
    /// Parses a config from TOML source text.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }

    /// Returns `true` if the named rule is disabled.
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_disables_nothing() {
        let config = CanonConfig::default();
        assert!(!config.is_disabled("xor-all-bits-set"));
    }

    #[test]
    fn parse_from_toml() {
        let config =
            CanonConfig::from_toml_str("disabled = [\"not-of-eq\", \"not-of-neq\"]").unwrap();
        assert!(config.is_disabled("not-of-eq"));
        assert!(config.is_disabled("not-of-neq"));
        assert!(!config.is_disabled("bool-eq-to-xor"));
    }

    #[test]
    fn empty_toml_is_default() {
        let config = CanonConfig::from_toml_str("").unwrap();
        assert_eq!(config, CanonConfig::default());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(CanonConfig::from_toml_str("disabled = 3").is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let config = CanonConfig {
            disabled: vec!["bool-eq-to-xor".to_string()],
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: CanonConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
