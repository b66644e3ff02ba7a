//! Routing facade and the compatibility layer around the engines.
//!
//! [`MappingFacade`] asks each engine's detector in registration order and
//! hands the input to the first that claims it. Around that sit the external
//! shapes: heterogeneous records in ([`record`]), flat results out
//! ([`flatten`]), and "create this capacity" suggestions when a recognized
//! model lacks the requested storage ([`suggestion`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use device_matcher::adapter::MappingFacade;
//! use device_matcher::catalog::store::DeviceCatalog;
//! use device_matcher::core::input::MappingInput;
//! use device_matcher::matching::MatchingConfig;
//!
//! let catalog = DeviceCatalog::load_embedded().unwrap();
//! let facade = MappingFacade::new(&catalog, MatchingConfig::default());
//!
//! let result = facade.map(MappingInput::new("iPhone 13 Pro 128GB").unwrap());
//! println!("{} {:?}", result.status, result.capacity_id);
//! ```

pub mod flatten;
pub mod record;
pub mod suggestion;

use serde_json::Value;

use crate::catalog::CatalogReader;
use crate::core::context::{MappingContext, PipelineStage};
use crate::core::error::MappingError;
use crate::core::features::ExtractedFeatures;
use crate::core::input::MappingInput;
use crate::core::result::MatchResult;
use crate::engine::{all_engines, DeviceEngine};
use crate::matching::MatchingConfig;
use crate::parsing::patterns::parse_storage_gb;
use crate::utils::validation::normalize_hardware_id;

pub use flatten::{Alternative, FlatMatchResult};
pub use record::{normalize_record, NormalizedRecord, RecordError};
pub use suggestion::{CapacitySuggestion, FeedObservations};

pub struct MappingFacade<'a> {
    engines: Vec<Box<dyn DeviceEngine + 'a>>,
    catalog: &'a dyn CatalogReader,
    config: MatchingConfig,
}

impl<'a> MappingFacade<'a> {
    /// Facade over the five built-in family engines
    #[must_use]
    pub fn new(catalog: &'a dyn CatalogReader, config: MatchingConfig) -> Self {
        let config = config.clamped();
        Self {
            engines: all_engines(catalog, &config),
            catalog,
            config,
        }
    }

    /// Facade over a custom engine list, tried in the given order
    #[must_use]
    pub fn with_engines(
        engines: Vec<Box<dyn DeviceEngine + 'a>>,
        catalog: &'a dyn CatalogReader,
        config: MatchingConfig,
    ) -> Self {
        Self {
            engines,
            catalog,
            config: config.clamped(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Registered engines, in routing order
    #[must_use]
    pub fn engines(&self) -> &[Box<dyn DeviceEngine + 'a>] {
        &self.engines
    }

    /// First engine whose detector claims `input`
    #[must_use]
    pub fn route(&self, input: &MappingInput) -> Option<&dyn DeviceEngine> {
        self.engines
            .iter()
            .find(|engine| engine.can_handle(input))
            .map(|engine| engine.as_ref() as &dyn DeviceEngine)
    }

    /// Map one input. Unroutable inputs come back as `UNDETECTED_DEVICE_TYPE` errors.
    #[must_use]
    pub fn map(&self, input: MappingInput) -> MatchResult {
        if let Some(engine) = self.route(&input) {
            tracing::debug!(family = %engine.family(), "Routed input");
            return engine.map(input);
        }

        let name = input.model_name().to_string();
        let mut ctx = MappingContext::new(input);
        ctx.error(format!("no engine recognizes '{name}'"));
        ctx.enter(PipelineStage::Error);
        MatchResult::error(
            MappingError::UndetectedDeviceType(name.clone()),
            ExtractedFeatures::new(name),
            ctx,
        )
    }

    /// Normalize, map and flatten one external record.
    ///
    /// `observations` feeds the missing-capacity suggestion; pass an empty set
    /// when mapping a record on its own.
    #[must_use]
    pub fn map_record(&self, record: &Value, observations: &FeedObservations) -> FlatMatchResult {
        let normalized = match normalize_record(record) {
            Ok(normalized) => normalized,
            Err(err) => {
                tracing::debug!(error = %err, "Rejected record");
                return FlatMatchResult::rejected(&err);
            }
        };
        self.map_normalized(normalized, observations)
    }

    fn map_normalized(
        &self,
        normalized: NormalizedRecord,
        observations: &FeedObservations,
    ) -> FlatMatchResult {
        let NormalizedRecord { input, notes } = normalized;
        let result = self.map(input);
        let mut flat = self.flatten(&result, observations);
        flat.notes.extend(notes);
        flat
    }

    /// Flatten `result`, attaching a capacity suggestion when the model was
    /// recognized without the requested storage
    #[must_use]
    pub fn flatten(&self, result: &MatchResult, observations: &FeedObservations) -> FlatMatchResult {
        let flat = FlatMatchResult::from_result(result, self.config.max_alternatives);
        let Some(gap) = &result.capacity_gap else {
            return flat;
        };
        let Some(engine) = self
            .engines
            .iter()
            .find(|engine| result.features.family == Some(engine.family()))
        else {
            return flat;
        };

        match suggestion::suggest(
            &result.features,
            gap,
            self.catalog,
            engine.extractor(),
            observations,
        ) {
            Ok(suggestion) => flat.with_suggestion(suggestion),
            Err(e) => {
                tracing::warn!(error = %e, "Could not build capacity suggestion");
                flat
            }
        }
    }

    /// Storage sizes per hardware id across `inputs`
    #[must_use]
    pub fn observe<'i>(&self, inputs: impl IntoIterator<Item = &'i MappingInput>) -> FeedObservations {
        let mut observations = FeedObservations::new();
        for input in inputs {
            let Some(engine) = self.route(input) else {
                continue;
            };
            let extractor = engine.extractor();
            let hardware_id = input
                .hardware_code()
                .and_then(|code| extractor.hardware_id(code).or_else(|| normalize_hardware_id(code)))
                .or_else(|| extractor.hardware_id(input.model_name()));
            let storage = input
                .capacity()
                .and_then(parse_storage_gb)
                .or_else(|| parse_storage_gb(input.model_name()));
            if let (Some(id), Some(gb)) = (hardware_id, storage) {
                observations.record(&id, gb);
            }
        }
        observations
    }

    /// Map a whole feed, in input order.
    ///
    /// Hardware-id observations are collected over every record first, so a
    /// suggestion sees capacities listed anywhere in the batch.
    #[must_use]
    pub fn map_batch(&self, records: &[Value]) -> Vec<FlatMatchResult> {
        let normalized: Vec<Result<NormalizedRecord, RecordError>> =
            records.iter().map(normalize_record).collect();
        let observations = self.observe(
            normalized
                .iter()
                .filter_map(|r| r.as_ref().ok())
                .map(|r| &r.input),
        );
        tracing::debug!(
            records = records.len(),
            hardware_ids = observations.len(),
            "Collected feed observations"
        );

        normalized
            .into_iter()
            .map(|record| match record {
                Ok(record) => self.map_normalized(record, &observations),
                Err(err) => FlatMatchResult::rejected(&err),
            })
            .collect()
    }
}
