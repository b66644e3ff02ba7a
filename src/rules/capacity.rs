use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::parsing::patterns::parse_capacity_label;
use crate::rules::{retain, Rule};

pub const CAPACITY: Rule = Rule {
    name: "capacity",
    apply: filter_capacity,
};

/// Storage must equal the capacity label, compared in GB ("1 TB" == 1024)
pub fn filter_capacity(
    candidates: Vec<MatchCandidate>,
    features: &ExtractedFeatures,
) -> Vec<MatchCandidate> {
    let Some(wanted) = features.storage_gb else {
        return candidates;
    };
    retain(candidates, |c| {
        parse_capacity_label(&c.capacity_label).map_or(true, |gb| gb == wanted)
    })
}
