//! Engine configuration.
//!
//! `EngineConfig` carries the three knobs of a generation run. It can be
//! built in code with the builder methods or loaded from TOML:
//!
//! ```
//! use combo_variants::core::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     card_limit = 4
//!     variant_limit = 500
//! "#).unwrap();
//!
//! assert_eq!(config.card_limit, 4);
//! assert_eq!(config.variant_limit, 500);
//! assert!(!config.allow_multiple_copies);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Parameters of a variant generation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of distinct ingredients (cards plus templates) in a
    /// variant. Becomes the `max_depth` of every variant set.
    pub card_limit: usize,

    /// Maximum estimated size of any intermediate variant set.
    /// Exceeding it aborts resolution of the current root combo.
    pub variant_limit: usize,

    /// Whether the same card may fill two requirement slots of a summed
    /// requirement (e.g. two copies of one card each producing a feature).
    pub allow_multiple_copies: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            card_limit: 5,
            variant_limit: 10_000,
            allow_multiple_copies: false,
        }
    }
}

impl EngineConfig {
    /// Create a default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the card limit.
    #[must_use]
    pub fn with_card_limit(mut self, limit: usize) -> Self {
        self.card_limit = limit;
        self
    }

    /// Set the variant limit.
    #[must_use]
    pub fn with_variant_limit(mut self, limit: usize) -> Self {
        self.variant_limit = limit;
        self
    }

    /// Allow or forbid multiple copies of the same card.
    #[must_use]
    pub fn with_multiple_copies(mut self, allow: bool) -> Self {
        self.allow_multiple_copies = allow;
        self
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file is unreadable, not valid TOML, or fails
    /// [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject limits that can never produce a variant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.card_limit == 0 {
            return Err(ConfigError::Invalid(
                "card_limit must be at least 1".to_string(),
            ));
        }
        if self.variant_limit == 0 {
            return Err(ConfigError::Invalid(
                "variant_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.card_limit, 5);
        assert_eq!(config.variant_limit, 10_000);
        assert!(!config.allow_multiple_copies);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::new()
            .with_card_limit(3)
            .with_variant_limit(50)
            .with_multiple_copies(true);

        assert_eq!(config.card_limit, 3);
        assert_eq!(config.variant_limit, 50);
        assert!(config.allow_multiple_copies);
    }

    #[test]
    fn test_zero_card_limit_rejected() {
        let err = EngineConfig::new().with_card_limit(0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_toml_rejects_zero_variant_limit() {
        let result = EngineConfig::from_toml_str("variant_limit = 0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_toml_parse_error() {
        let result = EngineConfig::from_toml_str("card_limit = \"many\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = EngineConfig::load("/nonexistent/engine.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
