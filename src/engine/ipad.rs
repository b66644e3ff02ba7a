use crate::catalog::CatalogReader;
use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::engine::selection::{preferred, prefer_oldest_within, TieBreak};
use crate::engine::FamilyEngine;
use crate::knowledge::IPadKnowledge;
use crate::matching::{GenerationMatcher, IdentifierMatcher, MatchingConfig, NameMatcher};
use crate::parsing::IPadExtractor;
use crate::rules::{RuleChain, CAPACITY, CHIP, CONNECTIVITY, SCREEN, VARIANT, YEAR};

pub const RULES: RuleChain = RuleChain::new(&[YEAR, SCREEN, CHIP, CONNECTIVITY, VARIANT, CAPACITY]);

/// Unstated connectivity means Wi-Fi only; then the shared oldest/base policy
#[must_use]
pub fn tie_break(tied: &[MatchCandidate], features: &ExtractedFeatures) -> TieBreak {
    let pool = if features.connectivity_explicit {
        (0..tied.len()).collect()
    } else {
        preferred(tied, |c| !c.catalog_features.has_cellular)
    };
    prefer_oldest_within(tied, pool, features)
}

pub fn engine(catalog: &dyn CatalogReader, config: MatchingConfig) -> FamilyEngine<'_> {
    FamilyEngine::new(
        Box::new(IPadExtractor),
        Box::new(IPadKnowledge),
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
