//! [`MatchResult`] to the flat shape the staging layer stores.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::adapter::record::RecordError;
use crate::adapter::suggestion::CapacitySuggestion;
use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::core::result::MatchResult;
use crate::core::types::{CapacityId, Confidence, MatchStatus, MatchStrategy, ModelId};

/// A runner-up candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternative {
    pub capacity_id: CapacityId,
    pub model_id: ModelId,
    pub description: String,
    pub score: f64,
    pub strategy: MatchStrategy,
}

impl From<&MatchCandidate> for Alternative {
    fn from(candidate: &MatchCandidate) -> Self {
        Self {
            capacity_id: candidate.capacity_id,
            model_id: candidate.model_id,
            description: candidate.display_name(),
            score: candidate.score,
            strategy: candidate.strategy,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlatMatchResult {
    pub success: bool,
    pub status: MatchStatus,
    pub capacity_id: Option<CapacityId>,
    pub model_id: Option<ModelId>,
    pub capacity_description: Option<String>,
    pub model_description: Option<String>,
    pub confidence: f64,
    pub confidence_level: Confidence,
    pub strategy: Option<MatchStrategy>,
    pub error_message: Option<String>,
    pub error_code: Option<String>,
    pub features: Option<ExtractedFeatures>,
    pub alternatives: Vec<Alternative>,
    pub elapsed_ms: i64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub trace_ids: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eliminated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<CapacitySuggestion>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl FlatMatchResult {
    /// Flatten `result`, keeping at most `max_alternatives` runner-ups
    #[must_use]
    pub fn from_result(result: &MatchResult, max_alternatives: usize) -> Self {
        // On success the first candidate is the match itself
        let skip = usize::from(result.is_success());
        let alternatives = result
            .candidates
            .iter()
            .skip(skip)
            .take(max_alternatives)
            .map(Alternative::from)
            .collect();

        let capacity_description = result
            .model_description
            .as_ref()
            .zip(result.capacity_label.as_ref())
            .map(|(model, label)| format!("{model} {label}"));

        Self {
            success: result.is_success(),
            status: result.status,
            capacity_id: result.capacity_id,
            model_id: result.model_id,
            capacity_description,
            model_description: result.model_description.clone(),
            confidence: result.score,
            confidence_level: result.confidence(),
            strategy: result.strategy,
            error_message: result.error_message(),
            error_code: result.error_code().map(str::to_string),
            features: Some(result.features.clone()),
            alternatives,
            elapsed_ms: result.context.elapsed_ms(),
            trace_ids: result.context.input().trace_ids().clone(),
            eliminated_by: result
                .context
                .metadata(crate::core::context::META_ELIMINATED_BY)
                .and_then(|v| v.as_str())
                .map(str::to_string),
            suggestion: None,
            notes: result.features.notes.clone(),
        }
    }

    /// Result for a record that never reached an engine
    #[must_use]
    pub fn rejected(error: &RecordError) -> Self {
        Self {
            success: false,
            status: MatchStatus::Error,
            capacity_id: None,
            model_id: None,
            capacity_description: None,
            model_description: None,
            confidence: 0.0,
            confidence_level: Confidence::Low,
            strategy: None,
            error_message: Some(error.to_string()),
            error_code: Some(error.code().to_string()),
            features: None,
            alternatives: Vec::new(),
            elapsed_ms: 0,
            trace_ids: BTreeMap::new(),
            eliminated_by: None,
            suggestion: None,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: CapacitySuggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    pub const TSV_HEADER: &'static str =
        "status\tcapacity_id\tmodel_id\tdescription\tconfidence\tstrategy\terror_code\tmessage";

    /// One tab-separated line matching [`Self::TSV_HEADER`]
    #[must_use]
    pub fn to_tsv_row(&self) -> String {
        let opt = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
        let message = self
            .error_message
            .clone()
            .or_else(|| self.eliminated_by.as_ref().map(|rule| format!("eliminated by {rule}")));
        format!(
            "{}\t{}\t{}\t{}\t{:.2}\t{}\t{}\t{}",
            self.status,
            opt(self.capacity_id.map(|id| id.to_string())),
            opt(self.model_id.map(|id| id.to_string())),
            opt(self.capacity_description.clone()),
            self.confidence,
            opt(self.strategy.map(|s| s.to_string())),
            opt(self.error_code.clone()),
            opt(message.map(|m| m.replace(['\t', '\n'], " "))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::MappingInput;
    use crate::engine::iphone;
    use crate::engine::DeviceEngine;
    use crate::matching::test_support::catalog;
    use crate::matching::MatchingConfig;

    #[test]
    fn test_success_flattens_without_repeating_the_match() {
        let catalog = catalog();
        let engine = iphone::engine(&catalog, MatchingConfig::default());
        let input = MappingInput::new("iPhone 13 Pro 128GB")
            .unwrap()
            .with_trace_id("sku", "X-1");
        let result = engine.map(input);
        let flat = FlatMatchResult::from_result(&result, 5);

        assert!(flat.success);
        assert_eq!(flat.capacity_id, Some(CapacityId::new(10101)));
        assert_eq!(flat.capacity_description.as_deref(), Some("iPhone 13 Pro 128 GB"));
        assert!(flat.alternatives.iter().all(|a| a.capacity_id != CapacityId::new(10101)));
        assert_eq!(flat.trace_ids.get("sku").map(String::as_str), Some("X-1"));
        assert!(flat.error_code.is_none());
        assert!(flat.to_tsv_row().starts_with("success\t10101\t101\t"));
    }

    #[test]
    fn test_alternatives_are_capped() {
        let catalog = catalog();
        let engine = iphone::engine(&catalog, MatchingConfig::default());
        // No storage: every capacity of the Pro survives and none is picked
        let result = engine.map(MappingInput::new("iPhone 13 Pro").unwrap());
        assert_eq!(result.status, MatchStatus::Ambiguous);
        assert!(result.candidates.len() >= 2);
        assert!(FlatMatchResult::from_result(&result, 0).alternatives.is_empty());
        assert_eq!(FlatMatchResult::from_result(&result, 1).alternatives.len(), 1);
        assert_eq!(
            FlatMatchResult::from_result(&result, 5).alternatives.len(),
            result.candidates.len().min(5)
        );
    }

    #[test]
    fn test_rejected_record() {
        let flat = FlatMatchResult::rejected(&RecordError::MissingModelName);
        assert!(!flat.success);
        assert_eq!(flat.status, MatchStatus::Error);
        assert_eq!(flat.error_code.as_deref(), Some("INVALID_INPUT"));
        assert!(flat.features.is_none());
        assert!(flat.to_tsv_row().contains("INVALID_INPUT"));
    }
}
