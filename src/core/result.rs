use serde::Serialize;

use crate::core::candidate::MatchCandidate;
use crate::core::context::MappingContext;
use crate::core::error::MappingError;
use crate::core::features::ExtractedFeatures;
use crate::core::types::{CapacityId, Confidence, MatchStatus, MatchStrategy, ModelId};

/// The identifier matcher recognized these models, but none carries the requested capacity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityGap {
    pub model_ids: Vec<ModelId>,
    /// Capacities (GB) the recognized models already have
    pub available_gb: Vec<u32>,
    pub requested_gb: Option<u32>,
}

/// Outcome of mapping one input.
///
/// Matched ids and descriptions are populated iff `status == Success`.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub status: MatchStatus,
    pub capacity_id: Option<CapacityId>,
    pub model_id: Option<ModelId>,
    pub model_description: Option<String>,
    pub capacity_label: Option<String>,
    pub score: f64,
    pub strategy: Option<MatchStrategy>,
    pub features: ExtractedFeatures,
    /// Every candidate that survived filtering, best first
    pub candidates: Vec<MatchCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_gap: Option<CapacityGap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MappingError>,
    #[serde(skip)]
    pub context: MappingContext,
}

impl MatchResult {
    pub fn success(
        best: &MatchCandidate,
        candidates: Vec<MatchCandidate>,
        features: ExtractedFeatures,
        context: MappingContext,
    ) -> Self {
        Self {
            status: MatchStatus::Success,
            capacity_id: Some(best.capacity_id),
            model_id: Some(best.model_id),
            model_description: Some(best.model_description.clone()),
            capacity_label: Some(best.capacity_label.clone()),
            score: best.score,
            strategy: Some(best.strategy),
            features,
            candidates,
            capacity_gap: None,
            error: None,
            context,
        }
    }

    pub fn no_match(
        features: ExtractedFeatures,
        candidates: Vec<MatchCandidate>,
        context: MappingContext,
    ) -> Self {
        Self {
            status: MatchStatus::NoMatch,
            capacity_id: None,
            model_id: None,
            model_description: None,
            capacity_label: None,
            score: 0.0,
            strategy: None,
            features,
            candidates,
            capacity_gap: None,
            error: None,
            context,
        }
    }

    /// Tied candidates the tie-break could not order
    pub fn ambiguous(
        tied: Vec<MatchCandidate>,
        features: ExtractedFeatures,
        context: MappingContext,
    ) -> Self {
        let score = tied.first().map_or(0.0, |c| c.score);
        let strategy = tied.first().map(|c| c.strategy);
        Self {
            status: MatchStatus::Ambiguous,
            score,
            strategy,
            ..Self::no_match(features, tied, context)
        }
    }

    pub fn error(error: MappingError, features: ExtractedFeatures, context: MappingContext) -> Self {
        Self {
            status: MatchStatus::Error,
            error: Some(error),
            ..Self::no_match(features, Vec::new(), context)
        }
    }

    #[must_use]
    pub fn with_capacity_gap(mut self, gap: CapacityGap) -> Self {
        self.capacity_gap = Some(gap);
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == MatchStatus::Success
    }

    #[must_use]
    pub fn confidence(&self) -> Confidence {
        Confidence::from_score(self.score)
    }

    pub fn error_code(&self) -> Option<&'static str> {
        self.error.as_ref().map(MappingError::code)
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Compare everything except timing.
    ///
    /// Two runs over the same input and catalog snapshot must agree on this.
    #[must_use]
    pub fn same_outcome(&self, other: &Self) -> bool {
        let log = |r: &Self| {
            r.context
                .entries()
                .iter()
                .map(|e| (e.severity, e.stage, e.message.clone()))
                .collect::<Vec<_>>()
        };
        self.status == other.status
            && self.capacity_id == other.capacity_id
            && self.model_id == other.model_id
            && self.model_description == other.model_description
            && self.capacity_label == other.capacity_label
            && (self.score - other.score).abs() < f64::EPSILON
            && self.strategy == other.strategy
            && self.features == other.features
            && self.candidates == other.candidates
            && self.capacity_gap == other.capacity_gap
            && self.error == other.error
            && self.context.metadata_map() == other.context.metadata_map()
            && log(self) == log(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::MappingInput;

    fn context() -> MappingContext {
        MappingContext::new(MappingInput::new("iPhone 13 Pro 128GB").unwrap())
    }

    fn candidate() -> MatchCandidate {
        MatchCandidate::new(
            CapacityId::new(10101),
            ModelId::new(101),
            "iPhone 13 Pro",
            "128 GB",
            Some(2021),
            MatchStrategy::Generation,
            ExtractedFeatures::default(),
        )
        .with_score(0.8)
    }

    #[test]
    fn test_success_populates_ids() {
        let best = candidate();
        let result = MatchResult::success(
            &best,
            vec![best.clone()],
            ExtractedFeatures::default(),
            context(),
        );
        assert!(result.is_success());
        assert_eq!(result.capacity_id, Some(CapacityId::new(10101)));
        assert_eq!(result.model_description.as_deref(), Some("iPhone 13 Pro"));
        assert_eq!(result.confidence(), Confidence::Medium);
        assert!(result.error_code().is_none());
    }

    #[test]
    fn test_error_result_serializes() {
        let result = MatchResult::error(
            MappingError::InvalidInput("empty model name".into()),
            ExtractedFeatures::default(),
            context(),
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["code"], "INVALID_INPUT");
        assert!(value.get("context").is_none());
    }

    #[test]
    fn test_ambiguous_has_no_ids() {
        let result =
            MatchResult::ambiguous(vec![candidate(), candidate()], ExtractedFeatures::default(), context());
        assert_eq!(result.status, MatchStatus::Ambiguous);
        assert!(result.capacity_id.is_none());
        assert_eq!(result.candidates.len(), 2);
        assert!((result.score - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_error_carries_code() {
        let result = MatchResult::error(
            MappingError::UndetectedDeviceType("toaster".into()),
            ExtractedFeatures::default(),
            context(),
        );
        assert_eq!(result.status, MatchStatus::Error);
        assert_eq!(result.error_code(), Some("UNDETECTED_DEVICE_TYPE"));
        assert!(result.candidates.is_empty());
    }
}
