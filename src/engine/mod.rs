//! Per-family mapping engines.
//!
//! An engine owns one family's extractor, knowledge base, matcher cascade,
//! rule chain and tie-break, and drives one input through the pipeline:
//!
//! ```text
//! Start -> Extracting -> Enriching -> Matching -> Filtering -> Selecting -> Success
//!              |                         |            |            |
//!              +-> Error                 +------------+------------+-> NoMatch
//!                                                                  |
//!                                                                  +-> Ambiguous
//! ```
//!
//! Matchers run strictly in priority order; the first one proposing candidates
//! wins. When the identifier matcher recognizes the model but not the
//! capacity, the cascade stops with `NoMatch`: a weaker matcher could only find
//! a *different* model sharing a name or generation.
//!
//! Every `map` call owns its context and features, so engines can be shared
//! between threads. A panic inside the pipeline is caught and reported as an
//! `INTERNAL_ERROR` result.

pub mod galaxy;
pub mod ipad;
pub mod iphone;
pub mod mac;
pub mod macbook;
pub mod selection;

use std::panic::{self, AssertUnwindSafe};

use crate::catalog::CatalogReader;
use crate::core::candidate::MatchCandidate;
use crate::core::context::{MappingContext, PipelineStage, META_MATCHER};
use crate::core::error::MappingError;
use crate::core::features::ExtractedFeatures;
use crate::core::input::MappingInput;
use crate::core::result::{CapacityGap, MatchResult};
use crate::core::types::DeviceFamily;
use crate::knowledge::KnowledgeBase;
use crate::matching::{Lookup, MatchEnv, Matcher, MatchingConfig};
use crate::parsing::FeatureExtractor;
use crate::rules::RuleChain;
use selection::{Selection, TieBreakFn};

/// One family's pipeline
pub trait DeviceEngine: Send + Sync {
    fn family(&self) -> DeviceFamily;

    /// Cheap detector used for routing
    fn can_handle(&self, input: &MappingInput) -> bool;

    /// Map one input. Never panics and never returns early without a result.
    fn map(&self, input: MappingInput) -> MatchResult;

    /// The extractor this engine parses text with
    fn extractor(&self) -> &dyn FeatureExtractor;
}

/// Pipeline end state, before the context is attached
enum Outcome {
    Success {
        best: MatchCandidate,
        ranked: Vec<MatchCandidate>,
        features: ExtractedFeatures,
    },
    NoMatch {
        features: ExtractedFeatures,
        candidates: Vec<MatchCandidate>,
        gap: Option<CapacityGap>,
    },
    Ambiguous {
        tied: Vec<MatchCandidate>,
        features: ExtractedFeatures,
    },
    Error {
        error: MappingError,
        features: ExtractedFeatures,
    },
}

/// Engine assembled from one family's parts
pub struct FamilyEngine<'a> {
    extractor: Box<dyn FeatureExtractor>,
    knowledge: Box<dyn KnowledgeBase>,
    matchers: Vec<Box<dyn Matcher>>,
    rules: RuleChain,
    tie_break: TieBreakFn,
    catalog: &'a dyn CatalogReader,
    config: MatchingConfig,
}

impl<'a> FamilyEngine<'a> {
    pub fn new(
        extractor: Box<dyn FeatureExtractor>,
        knowledge: Box<dyn KnowledgeBase>,
        matchers: Vec<Box<dyn Matcher>>,
        rules: RuleChain,
        tie_break: TieBreakFn,
        catalog: &'a dyn CatalogReader,
        config: MatchingConfig,
    ) -> Self {
        Self {
            extractor,
            knowledge,
            matchers,
            rules,
            tie_break,
            catalog,
            config,
        }
    }

    #[must_use]
    pub fn rules(&self) -> &RuleChain {
        &self.rules
    }

    fn run(&self, input: &MappingInput, ctx: &mut MappingContext) -> Outcome {
        ctx.enter(PipelineStage::Extracting);
        let features = match self.extractor.extract(input, ctx) {
            Ok(features) => features,
            Err(error) => {
                ctx.error(error.to_string());
                return Outcome::Error {
                    error,
                    features: ExtractedFeatures::new(input.model_name()),
                };
            }
        };

        ctx.enter(PipelineStage::Enriching);
        let features = self.knowledge.enrich(features, ctx);

        ctx.enter(PipelineStage::Matching);
        let env = MatchEnv {
            catalog: self.catalog,
            extractor: self.extractor.as_ref(),
            config: &self.config,
        };
        let mut candidates = Vec::new();
        for matcher in &self.matchers {
            match matcher.find_candidates(&features, &env, ctx) {
                Lookup::Candidates(found) if !found.is_empty() => {
                    ctx.info(format!(
                        "{} matcher proposed {} candidates",
                        matcher.strategy(),
                        found.len()
                    ));
                    ctx.set_metadata(META_MATCHER, matcher.strategy().as_str());
                    candidates = found;
                    break;
                }
                Lookup::Candidates(_) | Lookup::NotFound => {}
                Lookup::ModelFoundCapacityMissing {
                    models,
                    available_gb,
                } => {
                    ctx.info("model recognized without the requested capacity; not falling back");
                    let gap = CapacityGap {
                        model_ids: models,
                        available_gb,
                        requested_gb: features.storage_gb,
                    };
                    return Outcome::NoMatch {
                        features,
                        candidates: Vec::new(),
                        gap: Some(gap),
                    };
                }
                Lookup::Failed(error) => return Outcome::Error { error, features },
            }
        }
        if candidates.is_empty() {
            ctx.info("no matcher proposed candidates");
            return Outcome::NoMatch {
                features,
                candidates,
                gap: None,
            };
        }

        let min_score = self.config.min_score;
        let before = candidates.len();
        candidates.retain(|c| c.score >= min_score);
        if candidates.len() != before {
            ctx.debug(format!(
                "{} candidates under min score {min_score}",
                before - candidates.len()
            ));
        }

        ctx.enter(PipelineStage::Filtering);
        let outcome = self.rules.run(candidates, &features, ctx);

        ctx.enter(PipelineStage::Selecting);
        match selection::select(outcome.survivors, &features, self.tie_break) {
            Some(Selection::Selected { best, ranked }) => {
                ctx.info(format!(
                    "selected {} (score {:.2})",
                    best.display_name(),
                    best.score
                ));
                Outcome::Success {
                    best,
                    ranked,
                    features,
                }
            }
            Some(Selection::Ambiguous(tied)) => {
                ctx.warn(format!(
                    "{} candidates tied and the tie-break could not order them",
                    tied.len()
                ));
                Outcome::Ambiguous { tied, features }
            }
            None => Outcome::NoMatch {
                features,
                candidates: Vec::new(),
                gap: None,
            },
        }
    }
}

impl DeviceEngine for FamilyEngine<'_> {
    fn family(&self) -> DeviceFamily {
        self.extractor.family()
    }

    fn can_handle(&self, input: &MappingInput) -> bool {
        self.extractor.detects(&input.searchable_text())
    }

    fn map(&self, input: MappingInput) -> MatchResult {
        let mut ctx = MappingContext::new(input.clone());
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(&input, &mut ctx)))
            .unwrap_or_else(|payload| {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                ctx.error(format!("pipeline panicked: {message}"));
                Outcome::Error {
                    error: MappingError::Internal(message),
                    features: ExtractedFeatures::new(input.model_name()),
                }
            });

        match outcome {
            Outcome::Success {
                best,
                ranked,
                features,
            } => {
                ctx.enter(PipelineStage::Success);
                MatchResult::success(&best, ranked, features, ctx)
            }
            Outcome::NoMatch {
                features,
                candidates,
                gap,
            } => {
                ctx.enter(PipelineStage::NoMatch);
                let result = MatchResult::no_match(features, candidates, ctx);
                match gap {
                    Some(gap) => result.with_capacity_gap(gap),
                    None => result,
                }
            }
            Outcome::Ambiguous { tied, features } => {
                ctx.enter(PipelineStage::Ambiguous);
                MatchResult::ambiguous(tied, features, ctx)
            }
            Outcome::Error { error, features } => {
                ctx.enter(PipelineStage::Error);
                MatchResult::error(error, features, ctx)
            }
        }
    }

    fn extractor(&self) -> &dyn FeatureExtractor {
        self.extractor.as_ref()
    }
}

/// The five family engines, in routing order
#[must_use]
pub fn all_engines<'a>(
    catalog: &'a dyn CatalogReader,
    config: &MatchingConfig,
) -> Vec<Box<dyn DeviceEngine + 'a>> {
    vec![
        Box::new(ipad::engine(catalog, config.clone())),
        Box::new(iphone::engine(catalog, config.clone())),
        Box::new(macbook::engine(catalog, config.clone())),
        Box::new(mac::engine(catalog, config.clone())),
        Box::new(galaxy::engine(catalog, config.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::META_CAPACITY_MISSING;
    use crate::core::types::{MatchStatus, MatchStrategy};
    use crate::matching::test_support::catalog;

    #[test]
    fn test_generation_match_end_to_end() {
        let catalog = catalog();
        let engine = iphone::engine(&catalog, MatchingConfig::default());
        let result = engine.map(MappingInput::new("iPhone 13 Pro 128GB").unwrap());
        assert_eq!(result.status, MatchStatus::Success);
        assert_eq!(result.capacity_id.map(|c| c.0), Some(10101));
        assert_eq!(result.strategy, Some(MatchStrategy::Generation));
        assert!(result.score >= 0.7);
        assert_eq!(result.context.stage(), PipelineStage::Success);
        assert_eq!(
            result.context.metadata(META_MATCHER).and_then(|v| v.as_str()),
            Some("generation")
        );
    }

    #[test]
    fn test_recognized_model_without_capacity_does_not_fall_through() {
        let catalog = catalog();
        let engine = macbook::engine(&catalog, MatchingConfig::default());
        let result = engine.map(
            MappingInput::new("MacBook Pro 16\" M3 Max 16-Core CPU 40-Core GPU A2991 10/2023 8TB SSD")
                .unwrap(),
        );
        // Model 302 has 8 TB but is not the A2991 machine
        assert_eq!(result.status, MatchStatus::NoMatch);
        assert!(result.context.flag(META_CAPACITY_MISSING));
        let gap = result.capacity_gap.unwrap();
        assert_eq!(gap.requested_gb, Some(8192));
        assert_eq!(gap.available_gb, vec![1024, 4096]);
    }

    #[test]
    fn test_unstated_capacity_is_ambiguous() {
        let catalog = catalog();
        let engine = macbook::engine(&catalog, MatchingConfig::default());
        let result = engine.map(MappingInput::new("MacBook Pro 16 M3 Max A2991").unwrap());
        // Both capacities of the A2991 machine fit; none was stated
        assert_eq!(result.status, MatchStatus::Ambiguous);
        assert!(result.capacity_id.is_none());
        let mut tied: Vec<u64> = result.candidates.iter().map(|c| c.capacity_id.0).collect();
        tied.sort_unstable();
        assert_eq!(tied, vec![30101, 30102]);
        assert_eq!(result.context.stage(), PipelineStage::Ambiguous);
    }

    #[test]
    fn test_undetected_family_is_an_error() {
        let catalog = catalog();
        let engine = iphone::engine(&catalog, MatchingConfig::default());
        let result = engine.map(MappingInput::new("Galaxy S23 128GB").unwrap());
        assert_eq!(result.status, MatchStatus::Error);
        assert_eq!(result.error_code(), Some("UNDETECTED_DEVICE_TYPE"));
        assert_eq!(result.context.stage(), PipelineStage::Error);
    }

    #[test]
    fn test_stage_transitions_are_logged() {
        let catalog = catalog();
        let engine = iphone::engine(&catalog, MatchingConfig::default());
        let result = engine.map(MappingInput::new("iPhone 13 Pro 128GB").unwrap());
        let stages: Vec<_> = result
            .context
            .entries()
            .iter()
            .filter(|e| e.message.starts_with("entered stage"))
            .map(|e| e.stage)
            .collect();
        assert_eq!(
            stages,
            vec![
                PipelineStage::Extracting,
                PipelineStage::Enriching,
                PipelineStage::Matching,
                PipelineStage::Filtering,
                PipelineStage::Selecting,
                PipelineStage::Success,
            ]
        );
    }
}
