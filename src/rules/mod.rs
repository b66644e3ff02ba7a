//! Candidate filters, chained left to right in a family-specific order.
//!
//! Every rule is a pure `(candidates, features) -> candidates` function that
//! only removes. A rule whose feature is unknown on the input side returns the
//! candidates unchanged, and a candidate whose own value is unknown is kept:
//! missing information never rejects.
//!
//! When a rule empties the set the chain stops and records the rule's name.

pub mod capacity;
pub mod chip;
pub mod connectivity;
pub mod cores;
pub mod screen;
pub mod variant;
pub mod year;

use crate::core::candidate::MatchCandidate;
use crate::core::context::{MappingContext, META_ELIMINATED_BY};
use crate::core::features::ExtractedFeatures;

pub use capacity::CAPACITY;
pub use chip::CHIP;
pub use connectivity::CONNECTIVITY;
pub use cores::CORES;
pub use screen::SCREEN;
pub use variant::VARIANT;
pub use year::YEAR;

pub type RuleFn = fn(Vec<MatchCandidate>, &ExtractedFeatures) -> Vec<MatchCandidate>;

/// A named filter
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: RuleFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rule({})", self.name)
    }
}

/// Survivors of a chain run
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome {
    pub survivors: Vec<MatchCandidate>,
    /// Rule that removed the last candidate
    pub eliminated_by: Option<&'static str>,
}

/// Ordered rules for one family
#[derive(Debug, Clone, Copy)]
pub struct RuleChain {
    rules: &'static [Rule],
}

impl RuleChain {
    #[must_use]
    pub const fn new(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    /// Run every rule in order, stopping early once nothing is left
    pub fn run(
        &self,
        candidates: Vec<MatchCandidate>,
        features: &ExtractedFeatures,
        ctx: &mut MappingContext,
    ) -> ChainOutcome {
        let mut survivors = candidates;
        for rule in self.rules {
            let before = survivors.len();
            survivors = (rule.apply)(survivors, features);
            if survivors.len() != before {
                ctx.debug(format!(
                    "rule {}: {before} -> {} candidates",
                    rule.name,
                    survivors.len()
                ));
            }
            if survivors.is_empty() {
                ctx.info(format!("rule {} eliminated every candidate", rule.name));
                ctx.set_metadata(META_ELIMINATED_BY, rule.name);
                return ChainOutcome {
                    survivors,
                    eliminated_by: Some(rule.name),
                };
            }
        }
        ChainOutcome {
            survivors,
            eliminated_by: None,
        }
    }
}

/// Keep candidates for which `keep` holds
pub(crate) fn retain(
    mut candidates: Vec<MatchCandidate>,
    keep: impl Fn(&MatchCandidate) -> bool,
) -> Vec<MatchCandidate> {
    candidates.retain(|c| keep(c));
    candidates
}

/// Keep candidates for which `confirms` holds, unless none does.
///
/// Used for values a knowledge base inferred: they may narrow the set but
/// never empty it.
pub(crate) fn narrow(
    candidates: Vec<MatchCandidate>,
    confirms: impl Fn(&MatchCandidate) -> bool,
) -> Vec<MatchCandidate> {
    if candidates.iter().any(|c| confirms(c)) {
        retain(candidates, confirms)
    } else {
        candidates
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::candidate::MatchCandidate;
    use crate::core::features::ExtractedFeatures;
    use crate::core::types::{CapacityId, MatchStrategy, ModelId};
    use crate::parsing::FeatureExtractor;

    /// Candidate whose catalog features come from `extractor` parsing `description`
    pub fn candidate(
        extractor: &dyn FeatureExtractor,
        id: u64,
        description: &str,
        label: &str,
        year: Option<u16>,
    ) -> MatchCandidate {
        MatchCandidate::new(
            CapacityId::new(id),
            ModelId::new(id / 100),
            description,
            label,
            year,
            MatchStrategy::Generation,
            extractor.describe(description),
        )
    }

    pub fn ids(candidates: &[MatchCandidate]) -> Vec<u64> {
        candidates.iter().map(|c| c.capacity_id.0).collect()
    }

    pub fn features(extractor: &dyn FeatureExtractor, text: &str) -> ExtractedFeatures {
        extractor.describe(text)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{candidate, features, ids};
    use super::*;
    use crate::core::input::MappingInput;
    use crate::parsing::IPhoneExtractor;

    fn context() -> MappingContext {
        MappingContext::new(MappingInput::new("iPhone 13 Pro 512GB").unwrap())
    }

    fn pool() -> Vec<MatchCandidate> {
        vec![
            candidate(&IPhoneExtractor, 10101, "iPhone 13 Pro", "128 GB", Some(2021)),
            candidate(&IPhoneExtractor, 10102, "iPhone 13 Pro", "256 GB", Some(2021)),
            candidate(&IPhoneExtractor, 10201, "iPhone 13 Pro Max", "128 GB", Some(2021)),
        ]
    }

    #[test]
    fn test_chain_filters_in_order() {
        static CHAIN: RuleChain = RuleChain::new(&[YEAR, VARIANT, CAPACITY]);
        let outcome = CHAIN.run(pool(), &features(&IPhoneExtractor, "iPhone 13 Pro 256GB"), &mut context());
        assert_eq!(ids(&outcome.survivors), vec![10102]);
        assert_eq!(outcome.eliminated_by, None);
    }

    #[test]
    fn test_chain_stops_at_the_emptying_rule() {
        static CHAIN: RuleChain = RuleChain::new(&[VARIANT, CAPACITY, YEAR]);
        let mut ctx = context();
        let outcome = CHAIN.run(pool(), &features(&IPhoneExtractor, "iPhone 13 Pro 512GB"), &mut ctx);
        assert!(outcome.survivors.is_empty());
        assert_eq!(outcome.eliminated_by, Some("capacity"));
        assert_eq!(
            ctx.metadata(META_ELIMINATED_BY).and_then(|v| v.as_str()),
            Some("capacity")
        );
    }

    #[test]
    fn test_each_step_is_a_subset() {
        let features = features(&IPhoneExtractor, "iPhone 13 Pro Max 2021 128GB");
        let mut current = pool();
        for rule in [YEAR, VARIANT, CAPACITY] {
            let before = ids(&current);
            current = (rule.apply)(current, &features);
            assert!(
                ids(&current).iter().all(|id| before.contains(id)),
                "rule {} added a candidate",
                rule.name
            );
        }
        assert_eq!(ids(&current), vec![10201]);
    }
}
