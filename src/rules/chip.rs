use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::rules::{narrow, retain, Rule};

pub const CHIP: Rule = Rule {
    name: "chip",
    apply: filter_chip,
};

/// Chip line, generation and tier must agree ("M3 Pro" never matches "M3 Max")
pub fn filter_chip(candidates: Vec<MatchCandidate>, features: &ExtractedFeatures) -> Vec<MatchCandidate> {
    let Some(wanted) = features.cpu else {
        return candidates;
    };
    if features.is_inferred("cpu") {
        return narrow(candidates, |c| {
            c.catalog_features
                .cpu
                .is_some_and(|own| own.is_consistent_with(&wanted))
        });
    }
    retain(candidates, |c| {
        c.catalog_features
            .cpu
            .map_or(true, |own| own.is_consistent_with(&wanted))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Chip, ChipTier};
    use crate::parsing::MacDesktopExtractor;
    use crate::rules::test_support::{candidate, features, ids};

    fn studios() -> Vec<MatchCandidate> {
        vec![
            candidate(&MacDesktopExtractor, 40101, "Mac Studio M2 Max", "512 GB", Some(2023)),
            candidate(&MacDesktopExtractor, 40201, "Mac Studio M2 Ultra", "1 TB", Some(2023)),
            candidate(&MacDesktopExtractor, 40301, "Mac Studio", "1 TB", Some(2023)),
        ]
    }

    #[test]
    fn test_tier_must_agree() {
        let kept = filter_chip(studios(), &features(&MacDesktopExtractor, "Mac Studio M2 Ultra 1TB"));
        assert_eq!(ids(&kept), vec![40201, 40301]);
    }

    #[test]
    fn test_inferred_chip_only_narrows() {
        let mut guessed = features(&MacDesktopExtractor, "Mac Studio 1TB");
        assert!(guessed.fill_cpu(Chip::apple_m(1, ChipTier::Max)));
        assert_eq!(filter_chip(studios(), &guessed).len(), 3);

        let mut guessed = features(&MacDesktopExtractor, "Mac Studio 1TB");
        assert!(guessed.fill_cpu(Chip::apple_m(2, ChipTier::Ultra)));
        assert_eq!(ids(&filter_chip(studios(), &guessed)), vec![40201]);
    }

    #[test]
    fn test_no_chip_is_a_no_op() {
        let kept = filter_chip(studios(), &features(&MacDesktopExtractor, "Mac Studio 2023 1TB"));
        assert_eq!(kept.len(), 3);
    }
}
