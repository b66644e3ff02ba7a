//! Picking the winner among the rule-chain survivors.
//!
//! Survivors are ranked by score; only candidates tied at the top score go to
//! the family tie-break. The shared policy ([`prefer_oldest`]) prefers the
//! oldest, base revision unless the text explicitly names a chip or a
//! generation, in which case the candidate carrying it wins. When distinct
//! models remain tied, or one model remains with several capacities and the
//! text stated none, the mapping is ambiguous.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::core::candidate::MatchCandidate;
use crate::core::features::ExtractedFeatures;
use crate::parsing::patterns::parse_capacity_label;

/// Scores closer than this are tied
pub const SCORE_EPSILON: f64 = 1e-9;

/// Decision of a tie-break over the tied slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// Index into the tied candidates
    Resolved(usize),
    Unresolved,
}

pub type TieBreakFn = fn(&[MatchCandidate], &ExtractedFeatures) -> TieBreak;

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Selected {
        best: MatchCandidate,
        /// Every survivor, best first
        ranked: Vec<MatchCandidate>,
    },
    Ambiguous(Vec<MatchCandidate>),
}

/// Rank `survivors` and pick one. `None` when there is nothing to pick.
#[must_use]
pub fn select(
    mut survivors: Vec<MatchCandidate>,
    features: &ExtractedFeatures,
    tie_break: TieBreakFn,
) -> Option<Selection> {
    // Stable: equal scores keep catalog order
    survivors.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    let top = survivors.first()?.score;
    let tied = survivors
        .iter()
        .take_while(|c| (top - c.score).abs() < SCORE_EPSILON)
        .count();

    let chosen = if tied == 1 {
        0
    } else {
        match tie_break(&survivors[..tied], features) {
            TieBreak::Resolved(index) if index < tied => index,
            _ => {
                survivors.truncate(tied);
                return Some(Selection::Ambiguous(survivors));
            }
        }
    };

    let best = survivors.remove(chosen);
    let mut ranked = Vec::with_capacity(survivors.len() + 1);
    ranked.push(best.clone());
    ranked.extend(survivors);
    Some(Selection::Selected { best, ranked })
}

/// Narrow `pool` to indices passing `keep`, unless none would pass
fn narrow(pool: &mut Vec<usize>, keep: impl Fn(usize) -> bool) {
    if pool.iter().any(|&i| keep(i)) {
        pool.retain(|&i| keep(i));
    }
}

/// Indices of `tied` passing `keep`; every index when none passes
#[must_use]
pub fn preferred(tied: &[MatchCandidate], keep: impl Fn(&MatchCandidate) -> bool) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..tied.len()).collect();
    narrow(&mut pool, |i| keep(&tied[i]));
    pool
}

/// Oldest/base policy over the whole tied slice
#[must_use]
pub fn prefer_oldest(tied: &[MatchCandidate], features: &ExtractedFeatures) -> TieBreak {
    prefer_oldest_within(tied, (0..tied.len()).collect(), features)
}

/// Oldest/base policy over a pre-narrowed pool of indices into `tied`
#[must_use]
pub fn prefer_oldest_within(
    tied: &[MatchCandidate],
    mut pool: Vec<usize>,
    features: &ExtractedFeatures,
) -> TieBreak {
    if pool.is_empty() {
        return TieBreak::Unresolved;
    }

    if let Some(chip) = features.explicit_chip() {
        narrow(&mut pool, |i| {
            tied[i]
                .catalog_features
                .cpu
                .is_some_and(|own| own.is_consistent_with(chip))
        });
    }
    if let Some(generation) = features.explicit_generation() {
        narrow(&mut pool, |i| tied[i].catalog_features.generation == Some(generation));
    }
    if let Some(oldest) = pool.iter().filter_map(|&i| tied[i].model_year).min() {
        narrow(&mut pool, |i| tied[i].model_year == Some(oldest));
    }

    let models: BTreeSet<_> = pool.iter().map(|&i| tied[i].model_id).collect();
    if models.len() > 1 {
        return TieBreak::Unresolved;
    }

    // One model left, but the text never said which capacity
    if pool.len() > 1 && features.storage_gb.is_none() {
        return TieBreak::Unresolved;
    }

    pool.iter()
        .copied()
        .min_by_key(|&i| parse_capacity_label(&tied[i].capacity_label).unwrap_or(u32::MAX))
        .map_or(TieBreak::Unresolved, TieBreak::Resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CapacityId, MatchStrategy, ModelId};
    use crate::knowledge::chips::{M1, M2};

    fn candidate(capacity: u64, year: u16, label: &str, score: f64) -> MatchCandidate {
        MatchCandidate::new(
            CapacityId::new(capacity),
            ModelId::new(capacity / 100),
            format!("Model {}", capacity / 100),
            label,
            Some(year),
            MatchStrategy::Generation,
            ExtractedFeatures::new("catalog"),
        )
        .with_score(score)
    }

    #[test]
    fn test_single_top_candidate_wins() {
        let survivors = vec![candidate(10101, 2021, "128 GB", 0.7), candidate(10201, 2021, "128 GB", 0.8)];
        let Some(Selection::Selected { best, ranked }) =
            select(survivors, &ExtractedFeatures::new("x"), prefer_oldest)
        else {
            panic!("expected a selection");
        };
        assert_eq!(best.capacity_id.0, 10201);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].capacity_id.0, 10201);
    }

    #[test]
    fn test_tie_prefers_oldest() {
        let survivors = vec![candidate(20101, 2022, "256 GB", 0.8), candidate(10101, 2021, "256 GB", 0.8)];
        let Some(Selection::Selected { best, .. }) =
            select(survivors, &ExtractedFeatures::new("x"), prefer_oldest)
        else {
            panic!("expected a selection");
        };
        assert_eq!(best.model_id.0, 101);
    }

    #[test]
    fn test_explicit_chip_beats_oldest() {
        let mut old = candidate(10101, 2021, "256 GB", 0.8);
        old.catalog_features.cpu = Some(M1);
        let mut new = candidate(20101, 2022, "256 GB", 0.8);
        new.catalog_features.cpu = Some(M2);

        let mut features = ExtractedFeatures::new("M2");
        features.cpu = Some(M2);
        assert_eq!(prefer_oldest(&[old.clone(), new.clone()], &features), TieBreak::Resolved(1));

        // An inferred chip is not an explicit hint
        features.inferred_fields.push("cpu".to_string());
        assert_eq!(prefer_oldest(&[old, new], &features), TieBreak::Resolved(0));
    }

    #[test]
    fn test_same_model_resolves_to_smallest_capacity() {
        let tied = [candidate(10102, 2021, "1 TB", 0.8), candidate(10101, 2021, "1 TB", 0.8)];
        let mut features = ExtractedFeatures::new("x 1TB");
        features.storage_gb = Some(1024);
        assert_eq!(prefer_oldest(&tied, &features), TieBreak::Resolved(0));
    }

    #[test]
    fn test_unstated_capacity_is_ambiguous() {
        let survivors = vec![candidate(10102, 2021, "1 TB", 0.8), candidate(10101, 2021, "256 GB", 0.8)];
        let tied = survivors.clone();
        assert_eq!(prefer_oldest(&tied, &ExtractedFeatures::new("x")), TieBreak::Unresolved);

        let selection = select(survivors, &ExtractedFeatures::new("x"), prefer_oldest);
        let Some(Selection::Ambiguous(tied)) = selection else {
            panic!("expected ambiguity, got {selection:?}");
        };
        assert_eq!(tied.len(), 2);
    }

    #[test]
    fn test_distinct_models_same_year_are_ambiguous() {
        let survivors = vec![candidate(10101, 2021, "256 GB", 0.8), candidate(20101, 2021, "256 GB", 0.8)];
        let selection = select(survivors, &ExtractedFeatures::new("x"), prefer_oldest);
        let Some(Selection::Ambiguous(tied)) = selection else {
            panic!("expected ambiguity, got {selection:?}");
        };
        assert_eq!(tied.len(), 2);
    }

    #[test]
    fn test_nothing_to_select() {
        assert_eq!(select(Vec::new(), &ExtractedFeatures::new("x"), prefer_oldest), None);
    }
}
