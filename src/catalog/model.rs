use serde::{Deserialize, Serialize};

use crate::core::types::{CapacityId, DeviceFamily, ModelId};

/// One catalog model row: a physical model revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogModel {
    pub id: ModelId,
    pub family: DeviceFamily,

    /// Defaults to the family's brand when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Human-readable description, e.g. "iPad Pro 12.9\" (6th generation) Wi-Fi"
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,

    /// Vendor hardware identifiers (A2991, SM-S918B)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hardware_ids: Vec<String>,
}

impl CatalogModel {
    pub fn brand(&self) -> &str {
        self.brand.as_deref().unwrap_or_else(|| self.family.brand())
    }

    /// Case-insensitive hardware id match: exact or substring in either
    /// direction, against the id list and the description.
    #[must_use]
    pub fn matches_hardware_id(&self, hardware_id: &str) -> bool {
        let wanted = hardware_id.trim().to_uppercase();
        if wanted.is_empty() {
            return false;
        }
        let matches_id = self.hardware_ids.iter().any(|id| {
            let id = id.to_uppercase();
            id == wanted || id.contains(&wanted) || wanted.contains(&id)
        });
        matches_id || self.description.to_uppercase().contains(&wanted)
    }
}

/// One capacity row: a storage variant of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCapacity {
    pub id: CapacityId,
    pub model_id: ModelId,
    /// "256 GB", "1 TB"
    pub label: String,
}

/// On-disk model entry: the model row with its capacities nested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    #[serde(flatten)]
    pub model: CatalogModel,
    #[serde(default)]
    pub capacities: Vec<CapacityEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityEntry {
    pub id: CapacityId,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(hardware_ids: &[&str]) -> CatalogModel {
        CatalogModel {
            id: ModelId::new(301),
            family: DeviceFamily::MacBook,
            brand: None,
            description: "MacBook Pro 16\" M3 Max".to_string(),
            year: Some(2023),
            hardware_ids: hardware_ids.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_brand_defaults_to_family() {
        assert_eq!(model(&[]).brand(), "Apple");
    }

    #[test]
    fn test_hardware_id_matching() {
        let m = model(&["A2991"]);
        assert!(m.matches_hardware_id("a2991"));
        assert!(!m.matches_hardware_id("A2992"));
        assert!(!m.matches_hardware_id("  "));

        // Id embedded in a longer vendor code
        let m = model(&["SM-S918"]);
        assert!(m.matches_hardware_id("SM-S918B"));
    }

    #[test]
    fn test_entry_json_shape() {
        let json = r#"{
            "id": 101, "family": "iphone", "description": "iPhone 13 Pro", "year": 2021,
            "capacities": [{"id": 10101, "label": "128 GB"}]
        }"#;
        let entry: ModelEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.model.id, ModelId::new(101));
        assert_eq!(entry.model.family, DeviceFamily::IPhone);
        assert_eq!(entry.capacities.len(), 1);
        assert!(entry.model.hardware_ids.is_empty());
    }
}
