use crate::catalog::ModelQuery;
use crate::core::context::MappingContext;
use crate::core::features::ExtractedFeatures;
use crate::core::types::MatchStrategy;
use crate::matching::{
    build_candidates, catalog_failure, narrow_models, parse_models, Lookup, MatchEnv, Matcher,
    ParsedModel,
};

/// Device type plus generation or named variant.
///
/// Catalog descriptions are parsed with the family extractor; a model is kept
/// when its device type equals the input's and neither generation nor named
/// variant contradicts it. An attribute unknown on either side never excludes,
/// and an inferred generation only narrows to the models confirming it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameMatcher;

fn fits(parsed: &ParsedModel, features: &ExtractedFeatures) -> bool {
    let catalog = &parsed.features;
    if catalog.device_type != features.device_type {
        return false;
    }
    if let (Some(wanted), Some(own)) = (features.explicit_generation(), catalog.generation) {
        if wanted != own {
            return false;
        }
    }
    if let (Some(wanted), Some(own)) = (features.named_variant(), catalog.variant) {
        if wanted != own {
            return false;
        }
    }
    true
}

impl Matcher for NameMatcher {
    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::Name
    }

    fn find_candidates(
        &self,
        features: &ExtractedFeatures,
        env: &MatchEnv<'_>,
        ctx: &mut MappingContext,
    ) -> Lookup {
        let (Some(family), Some(device_type)) = (features.family, features.device_type) else {
            ctx.debug("name matcher: no device type");
            return Lookup::NotFound;
        };
        if features.generation.is_none() && features.named_variant().is_none() {
            ctx.debug("name matcher: neither generation nor named variant");
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
        if let Some(generation) = features.inferred_generation() {
            if !narrow_models(&mut parsed, |p| p.features.generation == Some(generation)) {
                ctx.debug(format!("name matcher: no model confirms inferred generation {generation}"));
            }
        }
        if parsed.is_empty() {
            ctx.debug(format!("name matcher: no {device_type} model fits"));
            return Lookup::NotFound;
        }

        match build_candidates(&parsed, MatchStrategy::Name, features, env) {
            Ok(candidates) => {
                ctx.debug(format!(
                    "name matcher: {} candidates from {} {device_type} models",
                    candidates.len(),
                    parsed.len()
                ));
                let label = device_type.label();
                Lookup::Candidates(
                    candidates
                        .into_iter()
                        .map(|c| c.with_evidence("device_type", label))
                        .collect(),
                )
            }
            Err(e) => catalog_failure(e, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::MappingInput;
    use crate::matching::test_support::catalog;
    use crate::matching::MatchingConfig;
    use crate::parsing::{FeatureExtractor, IPhoneExtractor, MacBookExtractor};

    fn run(extractor: &dyn FeatureExtractor, text: &str) -> Lookup {
        let catalog = catalog();
        let config = MatchingConfig::default();
        let env = MatchEnv {
            catalog: &catalog,
            extractor,
            config: &config,
        };
        let mut ctx = MappingContext::new(MappingInput::new(text).unwrap());
        NameMatcher.find_candidates(&extractor.describe(text), &env, &mut ctx)
    }

    fn model_ids(lookup: Lookup) -> Vec<u64> {
        let Lookup::Candidates(candidates) = lookup else {
            panic!("expected candidates, got {lookup:?}");
        };
        let mut ids: Vec<u64> = candidates.iter().map(|c| c.model_id.0).collect();
        ids.dedup();
        ids
    }

    #[test]
    fn test_named_variant_must_agree() {
        assert_eq!(model_ids(run(&IPhoneExtractor, "iPhone 13 Pro Max 128GB")), vec![102]);
        assert_eq!(model_ids(run(&IPhoneExtractor, "iPhone 13 Pro 128GB")), vec![101]);
    }

    #[test]
    fn test_base_variant_leaves_the_choice_to_rules() {
        // "iPhone 13" names no variant, so every 13 passes here
        assert_eq!(model_ids(run(&IPhoneExtractor, "iPhone 13 128GB")), vec![101, 102, 103]);
    }

    #[test]
    fn test_device_type_must_agree() {
        assert_eq!(model_ids(run(&MacBookExtractor, "MacBook Air M2 256GB")), vec![303]);
    }

    #[test]
    fn test_needs_generation_or_variant() {
        let lookup = run(&MacBookExtractor, "MacBook 12 256GB");
        assert_eq!(lookup, Lookup::NotFound);
    }
}
