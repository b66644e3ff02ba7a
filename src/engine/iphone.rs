use crate::catalog::CatalogReader;
use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::engine::selection::{preferred, prefer_oldest_within, TieBreak};
use crate::engine::FamilyEngine;
use crate::knowledge::IPhoneKnowledge;
use crate::matching::{GenerationMatcher, IdentifierMatcher, MatchingConfig};
use crate::parsing::patterns::has_word;
use crate::parsing::IPhoneExtractor;
use crate::rules::{RuleChain, CAPACITY, VARIANT, YEAR};

pub const RULES: RuleChain = RuleChain::new(&[YEAR, VARIANT, CAPACITY]);

/// Most specific first, so "xs" is not read as "x"
const X_SERIES: &[&str] = &["xs", "xr", "x"];

/// X, XS and XR share generation 10: prefer the row naming the same suffix,
/// then the shared oldest/base policy
#[must_use]
pub fn tie_break(tied: &[MatchCandidate], features: &ExtractedFeatures) -> TieBreak {
    let pool = match X_SERIES
        .iter()
        .find(|suffix| has_word(&features.original_text, suffix))
    {
        Some(suffix) => preferred(tied, |c| has_word(&c.model_description, suffix)),
        None => (0..tied.len()).collect(),
    };
    prefer_oldest_within(tied, pool, features)
}

/// Identifier, then generation: an iPhone name is fully determined by
/// generation and variant
pub fn engine(catalog: &dyn CatalogReader, config: MatchingConfig) -> FamilyEngine<'_> {
    FamilyEngine::new(
        Box::new(IPhoneExtractor),
        Box::new(IPhoneKnowledge),
        vec![Box::new(IdentifierMatcher), Box::new(GenerationMatcher)],
        RULES,
        tie_break,
        catalog,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CapacityId, MatchStrategy, ModelId};
    use crate::parsing::FeatureExtractor;

    fn candidate(model: u64, description: &str) -> MatchCandidate {
        MatchCandidate::new(
            CapacityId::new(model * 100 + 1),
            ModelId::new(model),
            description,
            "64 GB",
            Some(2018),
            MatchStrategy::Generation,
            IPhoneExtractor.describe(description),
        )
    }

    #[test]
    fn test_xs_and_xr_are_told_apart() {
        let tied = [candidate(110, "iPhone XR"), candidate(111, "iPhone XS")];
        let features = IPhoneExtractor.describe("iPhone XS 64GB");
        assert_eq!(tie_break(&tied, &features), TieBreak::Resolved(1));

        let features = IPhoneExtractor.describe("iPhone XR 64GB");
        assert_eq!(tie_break(&tied, &features), TieBreak::Resolved(0));
    }

    #[test]
    fn test_without_suffix_distinct_models_stay_tied() {
        let tied = [candidate(110, "iPhone XR"), candidate(111, "iPhone XS")];
        let features = IPhoneExtractor.describe("iPhone 64GB 2018");
        assert_eq!(tie_break(&tied, &features), TieBreak::Unresolved);
    }
}
