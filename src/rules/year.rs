use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::rules::{narrow, retain, Rule};

pub const YEAR: Rule = Rule {
    name: "year",
    apply: filter_year,
};

/// Release year must equal when both sides know it.
///
/// An inferred year only narrows to the rows that confirm it.
pub fn filter_year(candidates: Vec<MatchCandidate>, features: &ExtractedFeatures) -> Vec<MatchCandidate> {
    let Some(wanted) = features.year else {
        return candidates;
    };
    let year_of = |c: &MatchCandidate| c.model_year.or(c.catalog_features.year);
    if features.is_inferred("year") {
        return narrow(candidates, |c| year_of(c) == Some(wanted));
    }
    retain(candidates, |c| year_of(c).map_or(true, |year| year == wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::MacBookExtractor;
    use crate::rules::test_support::{candidate, features, ids};

    fn pool() -> Vec<MatchCandidate> {
        vec![
            candidate(&MacBookExtractor, 30101, "MacBook Pro 14\" M3", "512 GB", Some(2023)),
            candidate(&MacBookExtractor, 30201, "MacBook Pro 14\" M1 Pro", "512 GB", Some(2021)),
            candidate(&MacBookExtractor, 30301, "MacBook Pro 14\"", "512 GB", None),
        ]
    }

    #[test]
    fn test_keeps_equal_and_unknown_years() {
        let kept = filter_year(pool(), &features(&MacBookExtractor, "MacBook Pro 14 2023 512GB"));
        assert_eq!(ids(&kept), vec![30101, 30301]);
    }

    #[test]
    fn test_inferred_year_never_empties() {
        let mut guessed = features(&MacBookExtractor, "MacBook Pro 14 512GB");
        assert!(guessed.fill_year(2015));
        assert_eq!(filter_year(pool(), &guessed).len(), 3);
    }

    #[test]
    fn test_inferred_year_narrows_to_confirming_rows() {
        let mut guessed = features(&MacBookExtractor, "MacBook Pro 14 512GB");
        assert!(guessed.fill_year(2021));
        assert_eq!(ids(&filter_year(pool(), &guessed)), vec![30201]);
    }

    #[test]
    fn test_no_year_is_a_no_op() {
        let kept = filter_year(pool(), &features(&MacBookExtractor, "MacBook Pro 14 512GB"));
        assert_eq!(kept.len(), 3);
    }
}
