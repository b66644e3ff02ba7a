//! "Create this capacity" suggestions for recognized models.
//!
//! When the identifier matcher recognizes a model but the catalog lacks the
//! requested storage size, the staging layer gets a suggestion listing the
//! capacities the model already has, the capacities the raw feed shows for
//! the same hardware id, and the difference between the two.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::catalog::{CatalogError, CatalogReader};
use crate::core::features::ExtractedFeatures;
use crate::core::result::CapacityGap;
use crate::core::types::{DeviceFamily, DeviceType, ModelId, Variant};
use crate::parsing::patterns::parse_capacity_label;
use crate::parsing::FeatureExtractor;
use crate::utils::validation::normalize_hardware_id;

/// Storage sizes seen per hardware id across one feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedObservations {
    by_hardware_id: BTreeMap<String, BTreeSet<u32>>,
}

impl FeedObservations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, hardware_id: &str, storage_gb: u32) {
        if let Some(id) = normalize_hardware_id(hardware_id) {
            self.by_hardware_id.entry(id).or_default().insert(storage_gb);
        }
    }

    /// Sizes observed for `hardware_id`, ascending
    #[must_use]
    pub fn observed(&self, hardware_id: &str) -> Vec<u32> {
        normalize_hardware_id(hardware_id)
            .and_then(|id| self.by_hardware_id.get(&id))
            .map(|sizes| sizes.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of distinct hardware ids
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_hardware_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_hardware_id.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacitySuggestion {
    pub family: Option<DeviceFamily>,
    pub device_type: Option<DeviceType>,
    pub variant: Option<Variant>,
    pub hardware_id: Option<String>,
    pub year: Option<u16>,
    pub chip: Option<String>,
    pub cpu_cores: Option<u8>,
    pub gpu_cores: Option<u8>,
    pub screen_size: Option<f32>,
    pub requested_capacity_gb: Option<u32>,
    /// Capacities the candidate models already have
    pub existing_capacities_gb: Vec<u32>,
    /// Capacities the feed lists for this hardware id, the request included
    pub observed_capacities_gb: Vec<u32>,
    /// Observed but not in the catalog
    pub missing_capacities_gb: Vec<u32>,
    pub candidate_model_ids: Vec<ModelId>,
}

/// +1 when both sides know a value and agree, -1 when they disagree
fn agreement<T: PartialEq>(wanted: Option<T>, own: Option<T>) -> i32 {
    match (wanted, own) {
        (Some(a), Some(b)) if a == b => 1,
        (Some(_), Some(_)) => -1,
        _ => 0,
    }
}

/// Narrow models sharing one hardware id by chip tier and core counts.
///
/// Keeps every model with the best agreement score; a list of one (or one
/// where nothing discriminates) comes back unchanged.
///
/// # Errors
///
/// Returns `CatalogError` if a model row cannot be read.
pub fn disambiguate(
    model_ids: &[ModelId],
    features: &ExtractedFeatures,
    catalog: &dyn CatalogReader,
    extractor: &dyn FeatureExtractor,
) -> Result<Vec<ModelId>, CatalogError> {
    if model_ids.len() < 2 {
        return Ok(model_ids.to_vec());
    }

    let mut scored = Vec::with_capacity(model_ids.len());
    for id in model_ids {
        let Some(model) = catalog.model(id)? else {
            continue;
        };
        let own = extractor.describe(&model.description);
        let score = agreement(features.cpu.map(|c| c.tier), own.cpu.map(|c| c.tier))
            + agreement(features.cpu_cores, own.cpu_cores)
            + agreement(features.gpu_cores, own.gpu_cores);
        scored.push((*id, score));
    }

    let Some(best) = scored.iter().map(|&(_, score)| score).max() else {
        return Ok(model_ids.to_vec());
    };
    Ok(scored
        .into_iter()
        .filter(|&(_, score)| score == best)
        .map(|(id, _)| id)
        .collect())
}

/// Build the suggestion for one capacity gap.
///
/// # Errors
///
/// Returns `CatalogError` if the catalog cannot be read.
pub fn suggest(
    features: &ExtractedFeatures,
    gap: &CapacityGap,
    catalog: &dyn CatalogReader,
    extractor: &dyn FeatureExtractor,
    observations: &FeedObservations,
) -> Result<CapacitySuggestion, CatalogError> {
    let candidate_model_ids = disambiguate(&gap.model_ids, features, catalog, extractor)?;

    let mut existing = BTreeSet::new();
    for id in &candidate_model_ids {
        existing.extend(
            catalog
                .capacities_of(id)?
                .iter()
                .filter_map(|c| parse_capacity_label(&c.label)),
        );
    }

    let mut observed: BTreeSet<u32> = features
        .hardware_id
        .as_deref()
        .map(|id| observations.observed(id))
        .unwrap_or_default()
        .into_iter()
        .collect();
    observed.extend(gap.requested_gb);

    Ok(CapacitySuggestion {
        family: features.family,
        device_type: features.device_type,
        variant: features.variant,
        hardware_id: features.hardware_id.clone(),
        year: features.year,
        chip: features.cpu.map(|c| c.name()),
        cpu_cores: features.cpu_cores,
        gpu_cores: features.gpu_cores,
        screen_size: features.screen_size,
        requested_capacity_gb: gap.requested_gb,
        missing_capacities_gb: observed.difference(&existing).copied().collect(),
        existing_capacities_gb: existing.into_iter().collect(),
        observed_capacities_gb: observed.into_iter().collect(),
        candidate_model_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::DeviceCatalog;
    use crate::parsing::MacBookExtractor;

    fn shared_id_catalog() -> DeviceCatalog {
        let json = r#"{
            "version": "1.0.0",
            "created_at": "2025-01-01T00:00:00Z",
            "models": [
                {"id": 311, "family": "macbook",
                 "description": "MacBook Pro 16\" M3 Pro 12-Core CPU 18-Core GPU", "year": 2023,
                 "hardware_ids": ["A2991"], "capacities": [{"id": 31101, "label": "512 GB"}]},
                {"id": 312, "family": "macbook",
                 "description": "MacBook Pro 16\" M3 Max 16-Core CPU 40-Core GPU", "year": 2023,
                 "hardware_ids": ["A2991"], "capacities": [{"id": 31201, "label": "1 TB"}]}
            ]
        }"#;
        DeviceCatalog::from_json(json).unwrap()
    }

    fn gap(requested: u32) -> CapacityGap {
        CapacityGap {
            model_ids: vec![ModelId::new(311), ModelId::new(312)],
            available_gb: vec![512, 1024],
            requested_gb: Some(requested),
        }
    }

    #[test]
    fn test_observations_normalize_ids() {
        let mut observations = FeedObservations::new();
        observations.record("a2991", 2048);
        observations.record("A 2991", 8192);
        observations.record("A2991", 2048);
        assert_eq!(observations.observed("A2991"), vec![2048, 8192]);
        assert_eq!(observations.len(), 1);
        assert!(observations.observed("A2338").is_empty());
    }

    #[test]
    fn test_disambiguate_by_chip_and_cores() {
        let catalog = shared_id_catalog();
        let features = MacBookExtractor.describe("MacBook Pro 16 M3 Max 16-Core CPU 40-Core GPU A2991 2TB");
        let ids = disambiguate(&gap(2048).model_ids, &features, &catalog, &MacBookExtractor).unwrap();
        assert_eq!(ids, vec![ModelId::new(312)]);
    }

    #[test]
    fn test_disambiguate_keeps_all_without_signal() {
        let catalog = shared_id_catalog();
        let features = MacBookExtractor.describe("MacBook Pro A2991 2TB");
        let ids = disambiguate(&gap(2048).model_ids, &features, &catalog, &MacBookExtractor).unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_suggestion_lists_missing_capacities() {
        let catalog = shared_id_catalog();
        let features = MacBookExtractor.describe("MacBook Pro 16 M3 Max 16-Core CPU 40-Core GPU A2991 2TB");
        let mut observations = FeedObservations::new();
        observations.record("A2991", 1024);
        observations.record("A2991", 8192);

        let suggestion = suggest(&features, &gap(2048), &catalog, &MacBookExtractor, &observations).unwrap();
        assert_eq!(suggestion.candidate_model_ids, vec![ModelId::new(312)]);
        assert_eq!(suggestion.existing_capacities_gb, vec![1024]);
        assert_eq!(suggestion.observed_capacities_gb, vec![1024, 2048, 8192]);
        assert_eq!(suggestion.missing_capacities_gb, vec![2048, 8192]);
        assert_eq!(suggestion.requested_capacity_gb, Some(2048));
        assert_eq!(suggestion.hardware_id.as_deref(), Some("A2991"));
    }
}
