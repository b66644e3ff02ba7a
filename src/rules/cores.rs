use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::rules::{retain, Rule};

pub const CORES: Rule = Rule {
    name: "cores",
    apply: filter_cores,
};

fn agrees(wanted: Option<u8>, own: Option<u8>) -> bool {
    match (wanted, own) {
        (Some(wanted), Some(own)) => wanted == own,
        _ => true,
    }
}

/// CPU and GPU core counts must be exactly equal when both sides know them
pub fn filter_cores(candidates: Vec<MatchCandidate>, features: &ExtractedFeatures) -> Vec<MatchCandidate> {
    if features.cpu_cores.is_none() && features.gpu_cores.is_none() {
        return candidates;
    }
    retain(candidates, |c| {
        agrees(features.cpu_cores, c.catalog_features.cpu_cores)
            && agrees(features.gpu_cores, c.catalog_features.gpu_cores)
    })
}
