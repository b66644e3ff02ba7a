use crate::catalog::CatalogReader;
use crate::engine::{macbook, FamilyEngine};
use crate::knowledge::MacDesktopKnowledge;
use crate::matching::{GenerationMatcher, IdentifierMatcher, MatchingConfig, NameMatcher};
use crate::parsing::MacDesktopExtractor;
use crate::rules::{RuleChain, CAPACITY, CHIP, CORES, SCREEN, YEAR};

pub const RULES: RuleChain = RuleChain::new(&[YEAR, SCREEN, CHIP, CORES, CAPACITY]);

/// iMac, Mac mini, Mac Studio and Mac Pro
pub fn engine(catalog: &dyn CatalogReader, config: MatchingConfig) -> FamilyEngine<'_> {
    FamilyEngine::new(
        Box::new(MacDesktopExtractor),
        Box::new(MacDesktopKnowledge),
        vec![
            Box::new(IdentifierMatcher),
            Box::new(NameMatcher),
            Box::new(GenerationMatcher),
        ],
        RULES,
        macbook::tie_break,
        catalog,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::DeviceCatalog;
    use crate::core::input::MappingInput;
    use crate::core::types::MatchStatus;
    use crate::engine::DeviceEngine;

    fn catalog() -> DeviceCatalog {
        DeviceCatalog::from_json(
            r#"{"version": "1.0.0", "created_at": "2025-01-01T00:00:00Z", "models": [
                {"id": 401, "family": "mac_desktop", "description": "Mac Studio M2 Max", "year": 2023,
                 "hardware_ids": ["A2901"], "capacities": [{"id": 40101, "label": "512 GB"}]},
                {"id": 402, "family": "mac_desktop", "description": "Mac Studio M2 Ultra", "year": 2023,
                 "hardware_ids": ["A2901"], "capacities": [{"id": 40201, "label": "1 TB"}]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_shared_hardware_id_resolved_by_chip() {
        let catalog = catalog();
        let engine = engine(&catalog, MatchingConfig::default());
        let result = engine.map(MappingInput::new("Mac Studio M2 Ultra A2901 1TB").unwrap());
        assert_eq!(result.status, MatchStatus::Success);
        assert_eq!(result.model_id.map(|m| m.0), Some(402));
    }

    #[test]
    fn test_generation_fallback_by_year() {
        let catalog = catalog();
        let engine = engine(&catalog, MatchingConfig::default());
        let result = engine.map(MappingInput::new("Mac Studio 2023 512GB").unwrap());
        assert_eq!(result.status, MatchStatus::Success);
        assert_eq!(result.model_id.map(|m| m.0), Some(401));
    }
}
