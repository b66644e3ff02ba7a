use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::error::MappingError;
use crate::utils::validation::{normalize_whitespace, MAX_MODEL_NAME_LENGTH};

/// One vendor record to be mapped. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingInput {
    model_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    hardware_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    capacity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    brand: Option<String>,

    /// Vendor SKU, external ids and similar. Echoed back, never matched on.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    trace_ids: BTreeMap<String, String>,
}

impl MappingInput {
    /// Create an input from the vendor's free-text model name.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::InvalidInput` if the name is empty after
    /// whitespace normalization or longer than `MAX_MODEL_NAME_LENGTH`.
    pub fn new(model_name: impl AsRef<str>) -> Result<Self, MappingError> {
        let model_name = normalize_whitespace(model_name.as_ref());
        if model_name.is_empty() {
            return Err(MappingError::InvalidInput(
                "model name must not be empty".to_string(),
            ));
        }
        if model_name.len() > MAX_MODEL_NAME_LENGTH {
            return Err(MappingError::InvalidInput(format!(
                "model name exceeds {MAX_MODEL_NAME_LENGTH} characters"
            )));
        }

        Ok(Self {
            model_name,
            hardware_code: None,
            capacity: None,
            price: None,
            brand: None,
            trace_ids: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn with_hardware_code(mut self, code: impl AsRef<str>) -> Self {
        self.hardware_code = non_empty(code.as_ref());
        self
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: impl AsRef<str>) -> Self {
        self.capacity = non_empty(capacity.as_ref());
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price.is_finite().then_some(price);
        self
    }

    #[must_use]
    pub fn with_brand(mut self, brand: impl AsRef<str>) -> Self {
        self.brand = non_empty(brand.as_ref());
        self
    }

    #[must_use]
    pub fn with_trace_id(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.trace_ids.insert(key.into(), value.into());
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn hardware_code(&self) -> Option<&str> {
        self.hardware_code.as_deref()
    }

    pub fn capacity(&self) -> Option<&str> {
        self.capacity.as_deref()
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn trace_ids(&self) -> &BTreeMap<String, String> {
        &self.trace_ids
    }

    /// All free text a family detector may look at
    #[must_use]
    pub fn searchable_text(&self) -> String {
        let mut text = self.model_name.clone();
        for extra in [&self.brand, &self.hardware_code].into_iter().flatten() {
            text.push(' ');
            text.push_str(extra);
        }
        text
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = normalize_whitespace(value);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            MappingInput::new("   "),
            Err(MappingError::InvalidInput(_))
        ));
        assert!(matches!(
            MappingInput::new(""),
            Err(MappingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_name_is_normalized() {
        let input = MappingInput::new("  iPhone   13\tPro ").unwrap();
        assert_eq!(input.model_name(), "iPhone 13 Pro");
    }

    #[test]
    fn test_blank_optional_fields_are_dropped() {
        let input = MappingInput::new("iPad Air")
            .unwrap()
            .with_capacity("  ")
            .with_hardware_code("A2588")
            .with_price(f64::NAN);
        assert_eq!(input.capacity(), None);
        assert_eq!(input.hardware_code(), Some("A2588"));
        assert_eq!(input.price(), None);
    }

    #[test]
    fn test_searchable_text_includes_brand_and_code() {
        let input = MappingInput::new("S23 Ultra")
            .unwrap()
            .with_brand("Samsung")
            .with_hardware_code("SM-S918B");
        assert_eq!(input.searchable_text(), "S23 Ultra Samsung SM-S918B");
    }
}
