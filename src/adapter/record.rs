//! Heterogeneous external records to [`MappingInput`].
//!
//! Scrapers name the same field differently ("modelo", "title", "part_number").
//! Each input field accepts a fixed list of aliases; the first present,
//! non-empty alias wins. Every other string or number field whose name looks
//! like an id rides along as a trace id.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::error::MappingError;
use crate::core::input::MappingInput;
use crate::utils::validation::parse_price;

pub const MODEL_NAME_FIELDS: &[&str] =
    &["model_name", "name", "modelo", "title", "product_name", "description"];
pub const HARDWARE_CODE_FIELDS: &[&str] = &["hardware_code", "model_number", "part_number", "code"];
pub const CAPACITY_FIELDS: &[&str] = &["capacity", "storage", "capacidad", "almacenamiento"];
pub const PRICE_FIELDS: &[&str] = &["price", "precio", "amount"];
pub const BRAND_FIELDS: &[&str] = &["brand", "marca", "manufacturer"];
pub const TRACE_FIELDS: &[&str] = &["id", "external_id", "sku", "vendor_id"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Record is not a JSON object")]
    NotAnObject,

    #[error("Record has no model name (expected one of: {})", MODEL_NAME_FIELDS.join(", "))]
    MissingModelName,

    #[error(transparent)]
    Invalid(#[from] MappingError),
}

impl RecordError {
    /// Stable machine code, shared with `MappingError`
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invalid(err) => err.code(),
            Self::NotAnObject | Self::MissingModelName => "INVALID_INPUT",
        }
    }
}

/// A normalized record plus what normalization had to drop
#[derive(Debug, Clone)]
pub struct NormalizedRecord {
    pub input: MappingInput,
    pub notes: Vec<String>,
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(record: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|alias| record.get(*alias).and_then(text_of))
}

/// Normalize one external record.
///
/// # Errors
///
/// Returns `RecordError` when the record is not an object or has no usable
/// model name.
pub fn normalize_record(value: &Value) -> Result<NormalizedRecord, RecordError> {
    let record = value.as_object().ok_or(RecordError::NotAnObject)?;
    let name = first_text(record, MODEL_NAME_FIELDS).ok_or(RecordError::MissingModelName)?;
    let mut input = MappingInput::new(name)?;
    let mut notes = Vec::new();

    if let Some(code) = first_text(record, HARDWARE_CODE_FIELDS) {
        input = input.with_hardware_code(code);
    }
    if let Some(capacity) = first_text(record, CAPACITY_FIELDS) {
        input = input.with_capacity(capacity);
    }
    if let Some(brand) = first_text(record, BRAND_FIELDS) {
        input = input.with_brand(brand);
    }
    if let Some(raw) = PRICE_FIELDS.iter().find_map(|alias| record.get(*alias)) {
        let price = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_price(s),
            _ => None,
        };
        match price {
            Some(price) => input = input.with_price(price),
            None if raw.is_null() => {}
            None => notes.push(format!("unparsable price ignored: {raw}")),
        }
    }
    for alias in TRACE_FIELDS {
        if let Some(id) = record.get(*alias).and_then(text_of) {
            input = input.with_trace_id(*alias, id);
        }
    }

    Ok(NormalizedRecord { input, notes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aliases() {
        let record = json!({
            "modelo": "iPad Air 5 Wi-Fi",
            "part_number": "A2588",
            "capacidad": "64 GB",
            "precio": "$1.299,00",
            "marca": "Apple",
            "sku": 8812,
            "vendor_id": "v-17"
        });
        let normalized = normalize_record(&record).unwrap();
        let input = normalized.input;
        assert_eq!(input.model_name(), "iPad Air 5 Wi-Fi");
        assert_eq!(input.hardware_code(), Some("A2588"));
        assert_eq!(input.capacity(), Some("64 GB"));
        assert_eq!(input.brand(), Some("Apple"));
        assert!(input.price().is_some_and(|p| (p - 1299.0).abs() < 0.001));
        assert_eq!(input.trace_ids().get("sku").map(String::as_str), Some("8812"));
        assert_eq!(input.trace_ids().get("vendor_id").map(String::as_str), Some("v-17"));
        assert!(normalized.notes.is_empty());
    }

    #[test]
    fn test_first_alias_wins_and_blanks_are_skipped() {
        let record = json!({"model_name": "  ", "title": "iPhone 15 128GB", "name": "iPhone 14"});
        let normalized = normalize_record(&record).unwrap();
        // "name" comes before "title" in the alias list
        assert_eq!(normalized.input.model_name(), "iPhone 14");
    }

    #[test]
    fn test_unparsable_price_is_noted() {
        let record = json!({"name": "iPhone 15", "price": "call us"});
        let normalized = normalize_record(&record).unwrap();
        assert_eq!(normalized.input.price(), None);
        assert_eq!(normalized.notes.len(), 1);
    }

    #[test]
    fn test_missing_model_name() {
        let err = normalize_record(&json!({"price": 10})).unwrap_err();
        assert_eq!(err, RecordError::MissingModelName);
        assert_eq!(err.code(), "INVALID_INPUT");
        assert_eq!(normalize_record(&json!("iPhone")).unwrap_err(), RecordError::NotAnObject);
    }
}
