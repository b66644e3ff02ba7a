use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::rules::{narrow, retain, Rule};

pub const SCREEN: Rule = Rule {
    name: "screen",
    apply: filter_screen,
};

/// Sizes are canonical marketing sizes, so this tolerance only absorbs float noise
const SCREEN_TOLERANCE: f32 = 0.05;

pub fn filter_screen(candidates: Vec<MatchCandidate>, features: &ExtractedFeatures) -> Vec<MatchCandidate> {
    let Some(wanted) = features.screen_size else {
        return candidates;
    };
    let same = |own: f32| (own - wanted).abs() < SCREEN_TOLERANCE;
    if features.is_inferred("screen_size") {
        return narrow(candidates, |c| c.catalog_features.screen_size.is_some_and(same));
    }
    retain(candidates, |c| c.catalog_features.screen_size.map_or(true, same))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::IPadExtractor;
    use crate::rules::test_support::{candidate, features, ids};

    #[test]
    fn test_size_must_agree() {
        let pool = vec![
            candidate(&IPadExtractor, 20101, "iPad Pro 11\" (4th generation) Wi-Fi", "256 GB", Some(2022)),
            candidate(&IPadExtractor, 20201, "iPad Pro 12.9\" (6th generation) Wi-Fi", "256 GB", Some(2022)),
            candidate(&IPadExtractor, 20301, "iPad Pro Wi-Fi", "256 GB", Some(2022)),
        ];
        let kept = filter_screen(pool, &features(&IPadExtractor, "iPad Pro 12.9-inch M2 256GB"));
        assert_eq!(ids(&kept), vec![20201, 20301]);
    }
}
