use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::catalog::model::{CapacityEntry, ModelEntry};
use crate::catalog::{contains_term, CatalogCapacity, CatalogError, CatalogModel, CatalogReader, ModelQuery};
use crate::core::types::{CapacityId, DeviceFamily, ModelId};

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    pub created_at: String,
    pub models: Vec<ModelEntry>,
}

/// In-memory device catalog with indexes
#[derive(Debug, Default)]
pub struct DeviceCatalog {
    /// All model rows, in catalog order
    pub models: Vec<CatalogModel>,

    /// All capacity rows, in catalog order
    pub capacities: Vec<CatalogCapacity>,

    /// Index: model ID -> index in models vec
    id_to_index: HashMap<ModelId, usize>,

    /// Capacity IDs seen so far, to skip duplicates
    capacity_ids: HashSet<CapacityId>,

    /// Index: model ID -> indices of its capacities
    capacities_by_model: HashMap<ModelId, Vec<usize>>,

    /// Index: family -> indices of its models
    family_to_models: HashMap<DeviceFamily, Vec<usize>>,
}

impl DeviceCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the embedded default catalog
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` if the embedded JSON is malformed.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        // Embedded at compile time, validated by build.rs
        const EMBEDDED_CATALOG: &str = include_str!("../../catalogs/device_catalog.json");
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ReadError` if the file cannot be read, or
    /// `CatalogError::ParseError` if it is not a valid catalog.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse catalog from JSON string
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` if the JSON is not a valid catalog.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            tracing::warn!(
                expected = CATALOG_VERSION,
                found = %data.version,
                "Catalog version mismatch"
            );
        }

        let mut catalog = Self::new();
        for entry in data.models {
            catalog.add_model(entry);
        }
        tracing::debug!(
            models = catalog.models.len(),
            capacities = catalog.capacities.len(),
            "Loaded device catalog"
        );

        Ok(catalog)
    }

    /// Add a model and its capacities to the catalog
    pub fn add_model(&mut self, entry: ModelEntry) {
        let ModelEntry { model, capacities } = entry;
        if self.id_to_index.contains_key(&model.id) {
            tracing::warn!(model_id = %model.id, "Duplicate model id in catalog; keeping the first");
            return;
        }
        let index = self.models.len();

        // Index by ID
        self.id_to_index.insert(model.id, index);

        // Index by family
        self.family_to_models
            .entry(model.family)
            .or_default()
            .push(index);

        // Capacities
        for CapacityEntry { id, label } in capacities {
            if !self.capacity_ids.insert(id) {
                tracing::warn!(capacity_id = %id, "Duplicate capacity id in catalog; skipped");
                continue;
            }
            let cap_index = self.capacities.len();
            self.capacities_by_model
                .entry(model.id)
                .or_default()
                .push(cap_index);
            self.capacities.push(CatalogCapacity {
                id,
                model_id: model.id,
                label,
            });
        }

        self.models.push(model);
    }

    /// Get a model by ID
    pub fn get(&self, id: &ModelId) -> Option<&CatalogModel> {
        self.id_to_index.get(id).map(|&idx| &self.models[idx])
    }

    /// Models of one family, in catalog order
    pub fn models_of_family(&self, family: DeviceFamily) -> Vec<&CatalogModel> {
        self.family_to_models
            .get(&family)
            .map(|indices| indices.iter().map(|&idx| &self.models[idx]).collect())
            .unwrap_or_default()
    }

    /// Capacity rows of one model
    pub fn capacities_for(&self, model_id: &ModelId) -> Vec<&CatalogCapacity> {
        self.capacities_by_model
            .get(model_id)
            .map(|indices| indices.iter().map(|&idx| &self.capacities[idx]).collect())
            .unwrap_or_default()
    }

    /// Export catalog to JSON
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let models = self
            .models
            .iter()
            .map(|model| ModelEntry {
                model: model.clone(),
                capacities: self
                    .capacities_for(&model.id)
                    .into_iter()
                    .map(|c| CapacityEntry {
                        id: c.id,
                        label: c.label.clone(),
                    })
                    .collect(),
            })
            .collect();
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            models,
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of models in catalog
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn matches_query(model: &CatalogModel, query: &ModelQuery) -> bool {
        if let Some(hardware_id) = &query.hardware_id {
            if !model.matches_hardware_id(hardware_id) {
                return false;
            }
        }
        if let (Some(wanted), Some(year)) = (query.year, model.year) {
            if wanted != year {
                return false;
            }
        }
        query
            .terms
            .iter()
            .all(|term| contains_term(&model.description, term))
    }
}

impl CatalogReader for DeviceCatalog {
    fn find_models(&self, query: &ModelQuery) -> Result<Vec<CatalogModel>, CatalogError> {
        let pool: Vec<&CatalogModel> = match query.family {
            Some(family) => self.models_of_family(family),
            None => self.models.iter().collect(),
        };
        Ok(pool
            .into_iter()
            .filter(|model| Self::matches_query(model, query))
            .cloned()
            .collect())
    }

    fn capacities_of(&self, model_id: &ModelId) -> Result<Vec<CatalogCapacity>, CatalogError> {
        Ok(self.capacities_for(model_id).into_iter().cloned().collect())
    }

    fn model(&self, model_id: &ModelId) -> Result<Option<CatalogModel>, CatalogError> {
        Ok(self.get(model_id).cloned())
    }
}
