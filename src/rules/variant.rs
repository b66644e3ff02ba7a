use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::core::types::Variant;
use crate::rules::{retain, Rule};

pub const VARIANT: Rule = Rule {
    name: "variant",
    apply: filter_variant,
};

/// A regular model rejects every named variant; a named variant must equal.
/// "Pro" therefore never matches "Pro Max".
pub fn filter_variant(
    candidates: Vec<MatchCandidate>,
    features: &ExtractedFeatures,
) -> Vec<MatchCandidate> {
    let Some(wanted) = features.variant else {
        return candidates;
    };
    retain(candidates, |c| match c.catalog_features.variant {
        None => true,
        Some(own) if wanted == Variant::Base => !own.is_named(),
        Some(own) => own == wanted,
    })
}
