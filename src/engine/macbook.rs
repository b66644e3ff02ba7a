use crate::catalog::CatalogReader;
use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::core::types::ChipTier;
use crate::engine::selection::{preferred, prefer_oldest_within, TieBreak};
use crate::engine::FamilyEngine;
use crate::knowledge::MacBookKnowledge;
use crate::matching::{GenerationMatcher, IdentifierMatcher, MatchingConfig, NameMatcher};
use crate::parsing::MacBookExtractor;
use crate::rules::{RuleChain, CAPACITY, CHIP, CORES, SCREEN, YEAR};

pub const RULES: RuleChain = RuleChain::new(&[YEAR, SCREEN, CHIP, CORES, CAPACITY]);

/// Without a named chip the base-tier chip is the base configuration.
/// Shared by the Mac desktop engine.
#[must_use]
pub fn tie_break(tied: &[MatchCandidate], features: &ExtractedFeatures) -> TieBreak {
    let pool = if features.explicit_chip().is_some() {
        (0..tied.len()).collect()
    } else {
        preferred(tied, |c| {
            c.catalog_features
                .cpu
                .map_or(true, |chip| chip.tier == ChipTier::Base)
        })
    };
    prefer_oldest_within(tied, pool, features)
}

pub fn engine(catalog: &dyn CatalogReader, config: MatchingConfig) -> FamilyEngine<'_> {
    FamilyEngine::new(
        Box::new(MacBookExtractor),
        Box::new(MacBookKnowledge),
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
