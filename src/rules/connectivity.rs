use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::rules::{retain, Rule};

pub const CONNECTIVITY: Rule = Rule {
    name: "connectivity",
    apply: filter_connectivity,
};

/// Wi-Fi only vs. cellular, applied only when both the input and the catalog
/// row state it. An unstated input is settled by the family tie-break instead.
pub fn filter_connectivity(
    candidates: Vec<MatchCandidate>,
    features: &ExtractedFeatures,
) -> Vec<MatchCandidate> {
    if !features.connectivity_explicit {
        return candidates;
    }
    retain(candidates, |c| {
        !c.catalog_features.connectivity_explicit
            || c.catalog_features.has_cellular == features.has_cellular
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::IPadExtractor;
    use crate::rules::test_support::{candidate, features, ids};

    fn pool() -> Vec<MatchCandidate> {
        vec![
            candidate(&IPadExtractor, 20101, "iPad Pro 12.9\" (6th generation) Wi-Fi", "256 GB", Some(2022)),
            candidate(&IPadExtractor, 20201, "iPad Pro 12.9\" (6th generation) Wi-Fi + Cellular", "256 GB", Some(2022)),
            candidate(&IPadExtractor, 20301, "iPad Pro 12.9\" (6th generation)", "256 GB", Some(2022)),
        ]
    }

    #[test]
    fn test_cellular() {
        let kept = filter_connectivity(pool(), &features(&IPadExtractor, "iPad Pro 12.9 M2 Cellular 256GB"));
        assert_eq!(ids(&kept), vec![20201, 20301]);
    }

    #[test]
    fn test_wifi_only() {
        let kept = filter_connectivity(pool(), &features(&IPadExtractor, "iPad Pro 12.9 M2 WiFi 256GB"));
        assert_eq!(ids(&kept), vec![20101, 20301]);
    }

    #[test]
    fn test_unstated_is_a_no_op() {
        let kept = filter_connectivity(pool(), &features(&IPadExtractor, "iPad Pro 12.9 M2 256GB"));
        assert_eq!(kept.len(), 3);
    }
}
