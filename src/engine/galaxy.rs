use crate::catalog::CatalogReader;
use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::engine::selection::{preferred, prefer_oldest_within, TieBreak};
use crate::engine::FamilyEngine;
use crate::knowledge::GalaxyKnowledge;
use crate::matching::{GenerationMatcher, IdentifierMatcher, MatchingConfig, NameMatcher};
use crate::parsing::GalaxyExtractor;
use crate::rules::{RuleChain, CAPACITY, VARIANT, YEAR};

pub const RULES: RuleChain = RuleChain::new(&[VARIANT, YEAR, CAPACITY]);

/// Prefer the row carrying the same model code, then the shared oldest/base policy
#[must_use]
pub fn tie_break(tied: &[MatchCandidate], features: &ExtractedFeatures) -> TieBreak {
    let pool = match features.hardware_id.as_deref() {
        Some(code) => preferred(tied, |c| {
            c.catalog_features
                .hardware_id
                .as_deref()
                .is_some_and(|own| code.starts_with(own) || own.starts_with(code))
        }),
        None => (0..tied.len()).collect(),
    };
    prefer_oldest_within(tied, pool, features)
}

pub fn engine(catalog: &dyn CatalogReader, config: MatchingConfig) -> FamilyEngine<'_> {
    FamilyEngine::new(
        Box::new(GalaxyExtractor),
        Box::new(GalaxyKnowledge),
        vec![
            Box::new(IdentifierMatcher),
            Box::new(NameMatcher),
            Box::new(GenerationMatcher),
        ],
        RULES,
        tie_break,
        catalog,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::DeviceCatalog;
    use crate::core::input::MappingInput;
    use crate::core::types::{MatchStatus, MatchStrategy};
    use crate::engine::DeviceEngine;

    fn catalog() -> DeviceCatalog {
        DeviceCatalog::from_json(
            r#"{"version": "1.0.0", "created_at": "2025-01-01T00:00:00Z", "models": [
                {"id": 501, "family": "galaxy", "brand": "Samsung", "description": "Galaxy S23", "year": 2023,
                 "capacities": [{"id": 50101, "label": "128 GB"}, {"id": 50102, "label": "256 GB"}]},
                {"id": 502, "family": "galaxy", "brand": "Samsung", "description": "Galaxy S23 Ultra", "year": 2023,
                 "hardware_ids": ["SM-S918"], "capacities": [{"id": 50201, "label": "256 GB"}]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_model_code_alone() {
        let catalog = catalog();
        let engine = engine(&catalog, MatchingConfig::default());
        let result = engine.map(MappingInput::new("Samsung SM-S918B/DS 256GB").unwrap());
        assert_eq!(result.status, MatchStatus::Success);
        assert_eq!(result.model_id.map(|m| m.0), Some(502));
        assert_eq!(result.strategy, Some(MatchStrategy::Identifier));
    }

    #[test]
    fn test_name_match_excludes_ultra_for_the_regular_model() {
        let catalog = catalog();
        let engine = engine(&catalog, MatchingConfig::default());
        let result = engine.map(MappingInput::new("Samsung Galaxy S23 5G 256GB").unwrap());
        assert_eq!(result.status, MatchStatus::Success);
        assert_eq!(result.capacity_id.map(|c| c.0), Some(50102));
    }
}
