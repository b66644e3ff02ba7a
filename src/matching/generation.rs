use crate::catalog::ModelQuery;
use crate::core::context::MappingContext;
use crate::core::features::ExtractedFeatures;
use crate::core::types::MatchStrategy;
use crate::matching::{
    build_candidates, catalog_failure, narrow_models, parse_models, Lookup, MatchEnv, Matcher,
    ParsedModel,
};

/// Device type plus generation, falling back to the release year.
///
/// The weakest strategy: a stated generation must equal when both sides carry
/// one; without a generation a stated year must equal instead. Inferred
/// values only narrow to the models confirming them, and a lookup resting on
/// inferred values alone needs at least one confirmation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationMatcher;

fn fits(parsed: &ParsedModel, features: &ExtractedFeatures) -> bool {
    let catalog = &parsed.features;
    if catalog.device_type != features.device_type {
        return false;
    }
    let year = features.explicit_year();
    match (features.explicit_generation(), catalog.generation) {
        (Some(wanted), Some(own)) => wanted == own,
        (Some(_), None) => year
            .zip(parsed.model.year)
            .map_or(true, |(wanted, own)| wanted == own),
        (None, _) => year.map_or(true, |wanted| parsed.model.year == Some(wanted)),
    }
}

impl Matcher for GenerationMatcher {
    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::Generation
    }

    fn find_candidates(
        &self,
        features: &ExtractedFeatures,
        env: &MatchEnv<'_>,
        ctx: &mut MappingContext,
    ) -> Lookup {
        let (Some(family), Some(device_type)) = (features.family, features.device_type) else {
            ctx.debug("generation matcher: no device type");
            return Lookup::NotFound;
        };
        if features.generation.is_none() && features.year.is_none() {
            ctx.debug("generation matcher: neither generation nor year");
            return Lookup::NotFound;
        }

        let models = match env.catalog.find_models(&ModelQuery::for_family(family)) {
            Ok(models) => models,
            Err(e) => return catalog_failure(e, ctx),
        };
        let mut parsed: Vec<ParsedModel> = parse_models(models, env.extractor)
            .into_iter()
            .filter(|p| fits(p, features))
            .collect();

        let mut confirmed =
            features.explicit_generation().is_some() || features.explicit_year().is_some();
        if let Some(generation) = features.inferred_generation() {
            confirmed |= narrow_models(&mut parsed, |p| p.features.generation == Some(generation));
        }
        if let Some(year) = features.inferred_year() {
            confirmed |= narrow_models(&mut parsed, |p| p.model.year == Some(year));
        }
        if !confirmed {
            ctx.debug("generation matcher: no model confirms the inferred generation or year");
            return Lookup::NotFound;
        }
        if parsed.is_empty() {
            ctx.debug(format!("generation matcher: no {device_type} model fits"));
            return Lookup::NotFound;
        }

        match build_candidates(&parsed, MatchStrategy::Generation, features, env) {
            Ok(candidates) => {
                ctx.debug(format!(
                    "generation matcher: {} candidates from {} {device_type} models",
                    candidates.len(),
                    parsed.len()
                ));
                let key = features
                    .generation
                    .map_or_else(|| format!("year {}", features.year.unwrap_or_default()), |g| {
                        format!("generation {g}")
                    });
                Lookup::Candidates(
                    candidates
                        .into_iter()
                        .map(|c| c.with_evidence("generation", key.clone()))
                        .collect(),
                )
            }
            Err(e) => catalog_failure(e, ctx),
        }
    }
}
