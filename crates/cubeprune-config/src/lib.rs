//! Configuration for the cubeprune decoder search core.
//!
//! Load search and language-model settings from TOML or YAML files to tune
//! pruning without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use cubeprune_config::DecoderConfig;
//!
//! let config = DecoderConfig::from_toml_str(r#"
//!     [search]
//!     fuzz1 = 0.1
//!     fuzz2 = 0.2
//!     beam_size = 30
//!
//!     [language_model]
//!     order = 3
//!     weight = 1.0
//! "#).unwrap();
//!
//! assert_eq!(config.search.beam_size, Some(30));
//! ```
//!
//! Use defaults when no file is present:
//!
//! ```
//! use cubeprune_config::DecoderConfig;
//!
//! let config = DecoderConfig::load("decoder.toml").unwrap_or_default();
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level decoder configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DecoderConfig {
    /// Cube-pruning search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Language-model feature settings.
    #[serde(default)]
    pub language_model: LanguageModelConfig,
}

impl DecoderConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the pruning tolerances.
    pub fn with_fuzz(mut self, fuzz1: f64, fuzz2: f64) -> Self {
        self.search.fuzz1 = fuzz1;
        self.search.fuzz2 = fuzz2;
        self
    }

    /// Sets the cell beam capacity.
    pub fn with_beam_size(mut self, beam_size: usize) -> Self {
        self.search.beam_size = Some(beam_size);
        self
    }

    /// Validates cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for negative tolerances, a zero
    /// n-gram order, or a zero beam capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.fuzz1 < 0.0 || self.search.fuzz2 < 0.0 {
            return Err(ConfigError::Invalid(
                "fuzz tolerances must be non-negative".into(),
            ));
        }
        if self.language_model.order == 0 {
            return Err(ConfigError::Invalid(
                "language-model order must be at least 1".into(),
            ));
        }
        if self.search.beam_size == Some(0) {
            return Err(ConfigError::Invalid("beam size must be positive".into()));
        }
        Ok(())
    }
}

/// Cube-pruning search settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    /// Global-stop margin: once a popped candidate exceeds the cell's best
    /// cost by more than this, the rest of the frontier is discarded.
    #[serde(default = "default_fuzz1")]
    pub fuzz1: f64,

    /// Neighbor-admission margin: a generated neighbor enters the frontier
    /// only within the cell's best cost plus this tolerance.
    #[serde(default = "default_fuzz2")]
    pub fuzz2: f64,

    /// Cell beam capacity; `None` retains every submission.
    #[serde(default)]
    pub beam_size: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            fuzz1: default_fuzz1(),
            fuzz2: default_fuzz2(),
            beam_size: None,
        }
    }
}

fn default_fuzz1() -> f64 {
    0.1
}

fn default_fuzz2() -> f64 {
    0.1
}

/// Language-model feature settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LanguageModelConfig {
    /// Scoring n-gram order.
    #[serde(default = "default_order")]
    pub order: usize,

    /// Feature weight.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Default for LanguageModelConfig {
    fn default() -> Self {
        LanguageModelConfig {
            order: default_order(),
            weight: default_weight(),
        }
    }
}

fn default_order() -> usize {
    3
}

fn default_weight() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_parsing() {
        let toml = r#"
            [search]
            fuzz1 = 0.05
            fuzz2 = 0.2
            beam_size = 50

            [language_model]
            order = 4
            weight = 0.8
        "#;

        let config = DecoderConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.search.fuzz1, 0.05);
        assert_eq!(config.search.fuzz2, 0.2);
        assert_eq!(config.search.beam_size, Some(50));
        assert_eq!(config.language_model.order, 4);
        assert_eq!(config.language_model.weight, 0.8);
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
            search:
              fuzz1: 0.05
              fuzz2: 0.2
            language_model:
              order: 4
        "#;

        let config = DecoderConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.search.fuzz1, 0.05);
        assert_eq!(config.language_model.order, 4);
        assert_eq!(config.language_model.weight, 1.0);
    }

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::from_toml_str("").unwrap();
        assert_eq!(config.search.fuzz1, 0.1);
        assert_eq!(config.search.fuzz2, 0.1);
        assert_eq!(config.search.beam_size, None);
        assert_eq!(config.language_model.order, 3);
    }

    #[test]
    fn test_builder() {
        let config = DecoderConfig::new().with_fuzz(0.3, 0.6).with_beam_size(10);
        assert_eq!(config.search.fuzz1, 0.3);
        assert_eq!(config.search.fuzz2, 0.6);
        assert_eq!(config.search.beam_size, Some(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_fuzz() {
        let config = DecoderConfig::new().with_fuzz(-0.1, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_order() {
        let mut config = DecoderConfig::new();
        config.language_model.order = 0;
        assert!(config.validate().is_err());
    }
}
