use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::features::ExtractedFeatures;
use crate::core::types::{CapacityId, MatchStrategy, ModelId};

/// A proposed catalog match: one capacity row of one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub capacity_id: CapacityId,
    pub model_id: ModelId,
    pub model_description: String,
    pub capacity_label: String,
    pub model_year: Option<u16>,

    /// Score in [0, 1]
    pub score: f64,

    pub strategy: MatchStrategy,

    /// Why this candidate was proposed (attribute -> matched value)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub evidence: BTreeMap<String, String>,

    /// Features parsed from the catalog description; what rules compare against
    #[serde(skip)]
    pub catalog_features: ExtractedFeatures,
}

impl MatchCandidate {
    /// Candidate with the catalog year folded into its parsed features
    pub fn new(
        capacity_id: CapacityId,
        model_id: ModelId,
        model_description: impl Into<String>,
        capacity_label: impl Into<String>,
        model_year: Option<u16>,
        strategy: MatchStrategy,
        mut catalog_features: ExtractedFeatures,
    ) -> Self {
        if let Some(year) = model_year {
            catalog_features.year = Some(year);
        }
        Self {
            capacity_id,
            model_id,
            model_description: model_description.into(),
            capacity_label: capacity_label.into(),
            model_year,
            score: 0.0,
            strategy,
            evidence: BTreeMap::new(),
            catalog_features,
        }
    }

    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_evidence(mut self, key: &str, value: impl Into<String>) -> Self {
        self.evidence.insert(key.to_string(), value.into());
        self
    }

    /// "iPhone 13 Pro 128 GB"
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.model_description, self.capacity_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_year_is_folded_into_features() {
        let candidate = MatchCandidate::new(
            CapacityId::new(10101),
            ModelId::new(101),
            "iPhone 13 Pro",
            "128 GB",
            Some(2021),
            MatchStrategy::Generation,
            ExtractedFeatures::new("iPhone 13 Pro"),
        );
        assert_eq!(candidate.catalog_features.year, Some(2021));
        assert_eq!(candidate.display_name(), "iPhone 13 Pro 128 GB");
    }

    #[test]
    fn test_score_is_clamped() {
        let candidate = MatchCandidate::new(
            CapacityId::new(1),
            ModelId::new(1),
            "iPad",
            "64 GB",
            None,
            MatchStrategy::Name,
            ExtractedFeatures::default(),
        )
        .with_score(1.4);
        assert!((candidate.score - 1.0).abs() < 0.001);
    }
}
