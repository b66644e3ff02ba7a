//! Retrieval strategies: features to catalog candidates.
//!
//! An engine runs its matchers strictly in priority order and stops at the
//! first one that proposes candidates:
//!
//! - [`IdentifierMatcher`]: unique hardware id, scoped to family and year
//! - [`NameMatcher`]: device type + generation or named variant
//! - [`GenerationMatcher`]: device type + generation or year
//!
//! A matcher never fails on "nothing found". What it found is a [`Lookup`],
//! which keeps "the model exists but lacks this capacity" apart from "no such
//! model": only the first one stops the cascade.
//!
//! ## Scoring
//!
//! Every candidate starts at its strategy's base confidence and gains
//! [`MatchingConfig::evidence_bonus`] per corroborating attribute (year,
//! storage). See [`scoring::calculate_score`].

pub mod config;
pub mod generation;
pub mod identifier;
pub mod name;
pub mod scoring;

use crate::catalog::{CatalogError, CatalogModel, CatalogReader};
use crate::core::candidate::MatchCandidate;
use crate::core::context::MappingContext;
use crate::core::error::MappingError;
use crate::core::features::ExtractedFeatures;
use crate::core::types::{MatchStrategy, ModelId};
use crate::parsing::FeatureExtractor;

pub use config::MatchingConfig;
pub use generation::GenerationMatcher;
pub use identifier::IdentifierMatcher;
pub use name::NameMatcher;

/// What a matcher found
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Proposed candidates, possibly none
    Candidates(Vec<MatchCandidate>),
    /// The hardware id located these models, but none has the requested capacity
    ModelFoundCapacityMissing {
        models: Vec<ModelId>,
        available_gb: Vec<u32>,
    },
    /// The strategy did not apply or nothing matched
    NotFound,
    /// The catalog could not be queried
    Failed(MappingError),
}

/// What a matcher may consult
#[derive(Clone, Copy)]
pub struct MatchEnv<'a> {
    pub catalog: &'a dyn CatalogReader,
    /// Parses catalog descriptions the same way as vendor text
    pub extractor: &'a dyn FeatureExtractor,
    pub config: &'a MatchingConfig,
}

/// One retrieval strategy
pub trait Matcher: Send + Sync {
    fn strategy(&self) -> MatchStrategy;

    fn find_candidates(
        &self,
        features: &ExtractedFeatures,
        env: &MatchEnv<'_>,
        ctx: &mut MappingContext,
    ) -> Lookup;
}

/// A catalog model with its description parsed by the family extractor
#[derive(Debug, Clone)]
pub struct ParsedModel {
    pub model: CatalogModel,
    pub features: ExtractedFeatures,
}

/// Parse every model description. Catalog hardware ids and years fill what
/// the description itself does not carry.
#[must_use]
pub fn parse_models(models: Vec<CatalogModel>, extractor: &dyn FeatureExtractor) -> Vec<ParsedModel> {
    models
        .into_iter()
        .map(|model| {
            let mut features = extractor.describe(&model.description);
            if features.hardware_id.is_none() {
                features.hardware_id = model.hardware_ids.first().cloned();
            }
            if let Some(year) = model.year {
                features.year = Some(year);
            }
            features.brand = Some(model.brand().to_string());
            ParsedModel { model, features }
        })
        .collect()
}

/// One scored candidate per capacity of each model, in catalog order
///
/// # Errors
///
/// Returns `CatalogError` when capacities cannot be read.
pub fn build_candidates(
    models: &[ParsedModel],
    strategy: MatchStrategy,
    features: &ExtractedFeatures,
    env: &MatchEnv<'_>,
) -> Result<Vec<MatchCandidate>, CatalogError> {
    let mut candidates = Vec::new();
    for parsed in models {
        for capacity in env.catalog.capacities_of(&parsed.model.id)? {
            let mut candidate = MatchCandidate::new(
                capacity.id,
                parsed.model.id,
                parsed.model.description.clone(),
                capacity.label,
                parsed.model.year,
                strategy,
                parsed.features.clone(),
            );
            candidate.score = scoring::calculate_score(features, &candidate, env.config);
            candidates.push(candidate);
        }
    }
    Ok(candidates)
}

/// Keep models for which `confirms` holds, unless none does.
///
/// Inferred features go through here: they may narrow what the stated ones
/// selected but never reject every model. Returns whether any model confirmed.
pub(crate) fn narrow_models(
    parsed: &mut Vec<ParsedModel>,
    confirms: impl Fn(&ParsedModel) -> bool,
) -> bool {
    let confirmed = parsed.iter().any(|p| confirms(p));
    if confirmed {
        parsed.retain(|p| confirms(p));
    }
    confirmed
}

/// Catalog failures become a `Failed` lookup and an error log entry
fn catalog_failure(error: CatalogError, ctx: &mut MappingContext) -> Lookup {
    ctx.error(format!("catalog query failed: {error}"));
    Lookup::Failed(MappingError::from(error))
}
