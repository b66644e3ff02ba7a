use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default base confidence of the identifier matcher
pub const DEFAULT_IDENTIFIER_CONFIDENCE: f64 = 0.85;
pub const DEFAULT_NAME_CONFIDENCE: f64 = 0.80;
pub const DEFAULT_GENERATION_CONFIDENCE: f64 = 0.70;
pub const DEFAULT_EVIDENCE_BONUS: f64 = 0.05;
pub const DEFAULT_MAX_ALTERNATIVES: usize = 5;

/// Configuration for the matching pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Base score of candidates found by hardware identifier
    pub identifier_confidence: f64,
    /// Base score of candidates found by device type + generation or variant
    pub name_confidence: f64,
    /// Base score of candidates found by device type + generation or year
    pub generation_confidence: f64,
    /// Added per corroborating attribute (year, storage)
    pub evidence_bonus: f64,
    /// Alternate candidates carried in a flattened result
    pub max_alternatives: usize,
    /// Candidates scoring under this are dropped before selection
    pub min_score: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            identifier_confidence: DEFAULT_IDENTIFIER_CONFIDENCE,
            name_confidence: DEFAULT_NAME_CONFIDENCE,
            generation_confidence: DEFAULT_GENERATION_CONFIDENCE,
            evidence_bonus: DEFAULT_EVIDENCE_BONUS,
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
            min_score: 0.0,
        }
    }
}

impl MatchingConfig {
    /// Load a JSON config file; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        Ok(config.clamped())
    }

    /// Same config with every score forced into [0, 1]
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            identifier_confidence: self.identifier_confidence.clamp(0.0, 1.0),
            name_confidence: self.name_confidence.clamp(0.0, 1.0),
            generation_confidence: self.generation_confidence.clamp(0.0, 1.0),
            evidence_bonus: self.evidence_bonus.clamp(0.0, 1.0),
            max_alternatives: self.max_alternatives,
            min_score: self.min_score.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn with_max_alternatives(mut self, max_alternatives: usize) -> Self {
        self.max_alternatives = max_alternatives;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"name_confidence": 0.9, "max_alternatives": 2}}"#).unwrap();

        let config = MatchingConfig::load_from_file(file.path()).unwrap();
        assert!((config.name_confidence - 0.9).abs() < 0.001);
        assert_eq!(config.max_alternatives, 2);
        assert!((config.identifier_confidence - DEFAULT_IDENTIFIER_CONFIDENCE).abs() < 0.001);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"identifier_confidence": 1.7, "min_score": -0.3}}"#).unwrap();

        let config = MatchingConfig::load_from_file(file.path()).unwrap();
        assert!((config.identifier_confidence - 1.0).abs() < 0.001);
        assert!(config.min_score.abs() < 0.001);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        assert!(MatchingConfig::load_from_file(file.path()).is_err());
    }
}
