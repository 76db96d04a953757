//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the analysis engine. Every tuning constant
//! the engine uses (confidence thresholds, tie tolerances, segmentation and
//! simplification knobs) lives here with a documented default, so tests and
//! deployments can substitute their own values instead of relying on magic
//! numbers.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Range checking with detailed error messages
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (highest priority)
//! 2. Configuration files
//! 3. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,no_run
//! use legal_doc_analyzer::config::Config;
//!
//! let config = Config::from_file("config.toml").unwrap();
//! println!("confidence floor: {}", config.classification.min_confidence_density);
//! ```

use crate::errors::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all engine settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Document classification behavior
    pub classification: ClassificationConfig,
    /// Clause segmentation behavior
    pub segmentation: SegmentationConfig,
    /// Text simplification behavior
    pub simplification: SimplificationConfig,
    /// Logging configuration (consumed by the driver binary)
    pub logging: LoggingConfig,
    /// Optional path to a pattern registry bundle; the compiled-in
    /// registry is used when absent
    pub registry_path: Option<PathBuf>,
}

/// Document classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Minimum normalized keyword density for a classification to stand;
    /// below this the result is forced to "Other Legal Document"
    pub min_confidence_density: f64,
    /// Candidates whose normalized score is within this distance of the
    /// top score are tie-broken by the fixed type priority order
    pub tie_tolerance: f64,
    /// Normalized density at which confidence saturates to 1.0
    pub confidence_saturation: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            // One weighted keyword hit per ~2000 words
            min_confidence_density: 0.0005,
            tie_tolerance: 0.0001,
            confidence_saturation: 0.02,
        }
    }
}

/// Clause segmentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Minimum number of structural markers (numbered sections, headings)
    /// required before structural splitting is used
    pub min_structural_markers: usize,
    /// Minimum clause size in characters when grouping sentence-level
    /// fallback units
    pub min_clause_chars: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_structural_markers: 2,
            min_clause_chars: 80,
        }
    }
}

/// Text simplification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplificationConfig {
    /// Sentences longer than this many words are split at conjunction
    /// boundaries
    pub max_sentence_words: usize,
    /// Enable the sentence-shortening pass (phrase replacement always runs)
    pub enable_sentence_splitting: bool,
}

impl Default for SimplificationConfig {
    fn default() -> Self {
        Self {
            max_sentence_words: 25,
            enable_sentence_splitting: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| AnalyzerError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| AnalyzerError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("LEGAL_ANALYZER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(path) = std::env::var("LEGAL_ANALYZER_REGISTRY_PATH") {
            self.registry_path = Some(PathBuf::from(path));
        }
        if let Ok(min_density) = std::env::var("LEGAL_ANALYZER_MIN_CONFIDENCE") {
            self.classification.min_confidence_density =
                min_density.parse().map_err(|_| AnalyzerError::Config {
                    message: "Invalid value in LEGAL_ANALYZER_MIN_CONFIDENCE".to_string(),
                })?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.classification.min_confidence_density < 0.0 {
            return Err(AnalyzerError::ValidationFailed {
                field: "classification.min_confidence_density".to_string(),
                reason: "Confidence floor cannot be negative".to_string(),
            });
        }

        if self.classification.tie_tolerance < 0.0 {
            return Err(AnalyzerError::ValidationFailed {
                field: "classification.tie_tolerance".to_string(),
                reason: "Tie tolerance cannot be negative".to_string(),
            });
        }

        if self.classification.confidence_saturation <= 0.0 {
            return Err(AnalyzerError::ValidationFailed {
                field: "classification.confidence_saturation".to_string(),
                reason: "Confidence saturation must be greater than zero".to_string(),
            });
        }

        if self.segmentation.min_structural_markers < 1 {
            return Err(AnalyzerError::ValidationFailed {
                field: "segmentation.min_structural_markers".to_string(),
                reason: "At least one structural marker must be required".to_string(),
            });
        }

        if self.segmentation.min_clause_chars == 0 {
            return Err(AnalyzerError::ValidationFailed {
                field: "segmentation.min_clause_chars".to_string(),
                reason: "Minimum clause size must be greater than zero".to_string(),
            });
        }

        if self.simplification.max_sentence_words == 0 {
            return Err(AnalyzerError::ValidationFailed {
                field: "simplification.max_sentence_words".to_string(),
                reason: "Sentence length threshold must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AnalyzerError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.classification.min_confidence_density > 0.0);
        assert!(config.registry_path.is_none());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = Config::default();
        config.simplification.max_sentence_words = 0;
        assert!(matches!(
            config.validate(),
            Err(AnalyzerError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[classification]\nmin_confidence_density = 0.001").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.classification.min_confidence_density, 0.001);
        // Untouched sections fall back to defaults
        assert_eq!(config.simplification.max_sentence_words, 25);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::from_file("definitely-not-a-config.toml").unwrap();
        assert_eq!(config.segmentation.min_structural_markers, 2);
    }
}
