use std::collections::BTreeSet;

use serde_json::json;

use crate::catalog::{CatalogError, CatalogReader, ModelQuery};
use crate::core::context::{
    MappingContext, META_AVAILABLE_CAPACITIES, META_CAPACITY_MISSING, META_RECOGNIZED_MODELS,
};
use crate::core::features::ExtractedFeatures;
use crate::core::types::{DeviceFamily, MatchStrategy, ModelId};
use crate::matching::{build_candidates, catalog_failure, parse_models, Lookup, MatchEnv, Matcher};
use crate::parsing::patterns::parse_capacity_label;

/// Exact or substring match on the hardware identifier, scoped to family and year.
///
/// A year the knowledge base inferred is only a hint: when it excludes every
/// model the query is retried unscoped. An explicit year always scopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierMatcher;

impl IdentifierMatcher {
    fn query(family: Option<DeviceFamily>, hardware_id: &str, year: Option<u16>) -> ModelQuery {
        ModelQuery {
            family,
            ..ModelQuery::default()
        }
        .with_hardware_id(hardware_id)
        .with_year(year)
    }
}

/// Storage sizes (GB) of every capacity row of the given models
fn available_capacities(
    catalog: &dyn CatalogReader,
    models: &[ModelId],
) -> Result<BTreeSet<u32>, CatalogError> {
    let mut sizes = BTreeSet::new();
    for id in models {
        for capacity in catalog.capacities_of(id)? {
            if let Some(gb) = parse_capacity_label(&capacity.label) {
                sizes.insert(gb);
            }
        }
    }
    Ok(sizes)
}

impl Matcher for IdentifierMatcher {
    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::Identifier
    }

    fn find_candidates(
        &self,
        features: &ExtractedFeatures,
        env: &MatchEnv<'_>,
        ctx: &mut MappingContext,
    ) -> Lookup {
        let Some(hardware_id) = features.hardware_id.as_deref() else {
            ctx.debug("identifier matcher: no hardware id");
            return Lookup::NotFound;
        };

        let mut models = match env
            .catalog
            .find_models(&Self::query(features.family, hardware_id, features.year))
        {
            Ok(models) => models,
            Err(e) => return catalog_failure(e, ctx),
        };
        if models.is_empty() && features.year.is_some() && features.is_inferred("year") {
            ctx.debug(format!(
                "identifier matcher: no {hardware_id} model in inferred year, retrying without year"
            ));
            models = match env
                .catalog
                .find_models(&Self::query(features.family, hardware_id, None))
            {
                Ok(models) => models,
                Err(e) => return catalog_failure(e, ctx),
            };
        }
        if models.is_empty() {
            ctx.debug(format!("identifier matcher: no model with hardware id {hardware_id}"));
            return Lookup::NotFound;
        }

        let model_ids: Vec<_> = models.iter().map(|m| m.id).collect();
        if let Some(wanted) = features.storage_gb {
            let available = match available_capacities(env.catalog, &model_ids) {
                Ok(sizes) => sizes,
                Err(e) => return catalog_failure(e, ctx),
            };
            if !available.contains(&wanted) {
                let available_gb: Vec<u32> = available.into_iter().collect();
                ctx.info(format!(
                    "hardware id {hardware_id} recognized ({} models) but no {wanted} GB capacity",
                    model_ids.len()
                ));
                ctx.set_metadata(META_CAPACITY_MISSING, true);
                ctx.set_metadata(
                    META_RECOGNIZED_MODELS,
                    json!(model_ids.iter().map(|id| id.0).collect::<Vec<_>>()),
                );
                ctx.set_metadata(META_AVAILABLE_CAPACITIES, json!(available_gb));
                return Lookup::ModelFoundCapacityMissing {
                    models: model_ids,
                    available_gb,
                };
            }
        }

        let parsed = parse_models(models, env.extractor);
        match build_candidates(&parsed, MatchStrategy::Identifier, features, env) {
            Ok(candidates) => {
                let candidates = candidates
                    .into_iter()
                    .map(|c| c.with_evidence("hardware_id", hardware_id))
                    .collect::<Vec<_>>();
                ctx.debug(format!(
                    "identifier matcher: {} candidates for {hardware_id}",
                    candidates.len()
                ));
                Lookup::Candidates(candidates)
            }
            Err(e) => catalog_failure(e, ctx),
        }
    }
}
