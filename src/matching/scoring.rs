use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::core::types::MatchStrategy;
use crate::matching::config::MatchingConfig;
use crate::parsing::patterns::parse_capacity_label;

/// Safely convert usize to f64 for score arithmetic
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Base score of a retrieval strategy
#[must_use]
pub fn base_score(strategy: MatchStrategy, config: &MatchingConfig) -> f64 {
    match strategy {
        MatchStrategy::Identifier => config.identifier_confidence,
        MatchStrategy::Name => config.name_confidence,
        MatchStrategy::Generation => config.generation_confidence,
    }
}

/// Attributes known on both sides that agree: year, storage
#[must_use]
pub fn corroborating_attributes(features: &ExtractedFeatures, candidate: &MatchCandidate) -> Vec<&'static str> {
    let mut agreed = Vec::new();
    if let (Some(wanted), Some(year)) = (features.year, candidate.model_year) {
        if wanted == year {
            agreed.push("year");
        }
    }
    if let (Some(wanted), Some(gb)) = (features.storage_gb, parse_capacity_label(&candidate.capacity_label)) {
        if wanted == gb {
            agreed.push("storage");
        }
    }
    agreed
}

/// Score of `candidate` in [0, 1]: strategy base plus a bonus per corroborating attribute
#[must_use]
pub fn calculate_score(
    features: &ExtractedFeatures,
    candidate: &MatchCandidate,
    config: &MatchingConfig,
) -> f64 {
    let bonus = count_to_f64(corroborating_attributes(features, candidate).len()) * config.evidence_bonus;
    (base_score(candidate.strategy, config) + bonus).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CapacityId, ModelId};

    fn candidate(strategy: MatchStrategy, year: Option<u16>, label: &str) -> MatchCandidate {
        MatchCandidate::new(
            CapacityId::new(10101),
            ModelId::new(101),
            "iPhone 13 Pro",
            label,
            year,
            strategy,
            ExtractedFeatures::new("iPhone 13 Pro"),
        )
    }

    fn features(year: Option<u16>, storage_gb: Option<u32>) -> ExtractedFeatures {
        let mut features = ExtractedFeatures::new("iPhone 13 Pro 128GB");
        features.year = year;
        features.storage_gb = storage_gb;
        features
    }

    #[test]
    fn test_base_scores_follow_strategy() {
        let config = MatchingConfig::default();
        let bare = features(None, None);
        let id = calculate_score(&bare, &candidate(MatchStrategy::Identifier, None, "128 GB"), &config);
        let name = calculate_score(&bare, &candidate(MatchStrategy::Name, None, "128 GB"), &config);
        let generation =
            calculate_score(&bare, &candidate(MatchStrategy::Generation, None, "128 GB"), &config);
        assert!((id - 0.85).abs() < 0.001);
        assert!((name - 0.80).abs() < 0.001);
        assert!((generation - 0.70).abs() < 0.001);
    }

    #[test]
    fn test_evidence_bonus() {
        let config = MatchingConfig::default();
        let c = candidate(MatchStrategy::Generation, Some(2021), "128 GB");

        let score = calculate_score(&features(Some(2021), Some(128)), &c, &config);
        assert!((score - 0.80).abs() < 0.001, "year and storage both agree: {score}");

        let score = calculate_score(&features(Some(2022), Some(128)), &c, &config);
        assert!((score - 0.75).abs() < 0.001, "only storage agrees: {score}");
    }

    #[test]
    fn test_score_is_clamped() {
        let config = MatchingConfig {
            identifier_confidence: 0.98,
            ..MatchingConfig::default()
        };
        let c = candidate(MatchStrategy::Identifier, Some(2023), "1 TB");
        let score = calculate_score(&features(Some(2023), Some(1024)), &c, &config);
        assert!((score - 1.0).abs() < 0.001);
    }
}
