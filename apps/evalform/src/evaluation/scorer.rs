//! Weighted competency scoring and fit classification.
//!
//! weighted % = Σ(rating × weight) / 5 × 100, with unrated criteria counted as 0.
//! Bands (inclusive lower bound): ≥85 strong, ≥70 good, ≥55 average, else low.
//! Nothing is classified until every criterion has a rating.

use serde::Serialize;

use crate::models::criteria::CriteriaTable;
use crate::models::record::{FitLabel, ScoreSet, MAX_RATING};

pub const STRONG_FIT_THRESHOLD: f64 = 85.0;
pub const GOOD_FIT_THRESHOLD: f64 = 70.0;
pub const AVERAGE_FIT_THRESHOLD: f64 = 55.0;

// Absorbs f64 drift in the weighted sum so that a score sitting exactly on a
// band edge lands in the upper band.
const BAND_EPSILON: f64 = 1e-9;

/// Live view of the scoring state for the sidebar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub weighted_percentage: f64,
    pub fit: FitLabel,
    pub scored: usize,
    pub total: usize,
}

pub fn weighted_percentage(scores: &ScoreSet, criteria: &CriteriaTable) -> f64 {
    let weighted: f64 = criteria
        .iter()
        .map(|c| {
            let rating = scores.get(&c.id).copied().unwrap_or(0).min(MAX_RATING);
            f64::from(rating) * c.weight
        })
        .sum();

    (weighted / f64::from(MAX_RATING) * 100.0).clamp(0.0, 100.0)
}

pub fn classify(percentage: f64, scores_provided: usize, total_criteria: usize) -> FitLabel {
    if scores_provided < total_criteria {
        return FitLabel::Pending;
    }

    let p = percentage + BAND_EPSILON;
    if p >= STRONG_FIT_THRESHOLD {
        FitLabel::StrongFit
    } else if p >= GOOD_FIT_THRESHOLD {
        FitLabel::GoodFit
    } else if p >= AVERAGE_FIT_THRESHOLD {
        FitLabel::AverageFit
    } else {
        FitLabel::LowFit
    }
}

/// Number of table criteria that have a rating. Stray ids don't count.
pub fn scored_count(scores: &ScoreSet, criteria: &CriteriaTable) -> usize {
    criteria.iter().filter(|c| scores.contains_key(&c.id)).count()
}

pub fn summarize(scores: &ScoreSet, criteria: &CriteriaTable) -> ScoreSummary {
    let weighted_percentage = weighted_percentage(scores, criteria);
    let scored = scored_count(scores, criteria);
    let total = criteria.len();

    ScoreSummary {
        weighted_percentage,
        fit: classify(weighted_percentage, scored, total),
        scored,
        total,
    }
}

/// Fixed two-decimal rendering used on the wire, e.g. `"60.00%"`.
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: [&str; 6] = [
        "language",
        "communication",
        "business",
        "attitude",
        "professionalism",
        "logic",
    ];

    fn uniform(rating: u8) -> ScoreSet {
        IDS.iter().map(|id| (id.to_string(), rating)).collect()
    }

    #[test]
    fn test_percentage_stays_within_bounds_for_every_rating_combination() {
        let table = CriteriaTable::default();
        let mut scores = uniform(0);
        for combo in 0..6usize.pow(IDS.len() as u32) {
            let mut rest = combo;
            for id in IDS {
                scores.insert(id.to_string(), (rest % 6) as u8);
                rest /= 6;
            }
            let p = weighted_percentage(&scores, &table);
            assert!((0.0..=100.0).contains(&p), "{scores:?} gave {p}");
        }
    }

    #[test]
    fn test_all_zero_is_zero_percent() {
        let p = weighted_percentage(&uniform(0), &CriteriaTable::default());
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_all_five_is_strong_fit_at_100() {
        let table = CriteriaTable::default();
        let summary = summarize(&uniform(5), &table);
        assert!((summary.weighted_percentage - 100.0).abs() < 1e-9);
        assert_eq!(format_percentage(summary.weighted_percentage), "100.00%");
        assert_eq!(summary.fit, FitLabel::StrongFit);
    }

    #[test]
    fn test_all_three_is_average_fit_at_60() {
        let summary = summarize(&uniform(3), &CriteriaTable::default());
        assert_eq!(format_percentage(summary.weighted_percentage), "60.00%");
        assert_eq!(summary.fit, FitLabel::AverageFit);
    }

    #[test]
    fn test_missing_ratings_count_as_zero() {
        let scores = ScoreSet::from([("communication".to_string(), 5)]);
        // 5 × 0.25 / 5 × 100
        let p = weighted_percentage(&scores, &CriteriaTable::default());
        assert!((p - 25.0).abs() < 1e-9, "got {p}");
    }

    #[test]
    fn test_five_of_six_is_pending_regardless_of_values() {
        let table = CriteriaTable::default();
        let mut scores = uniform(5);
        scores.remove("logic");
        let summary = summarize(&scores, &table);
        assert_eq!(summary.scored, 5);
        assert_eq!(summary.fit, FitLabel::Pending);
    }

    #[test]
    fn test_stray_ids_do_not_count_as_scored() {
        let table = CriteriaTable::default();
        let mut scores = uniform(4);
        scores.remove("attitude");
        scores.insert("charisma".to_string(), 5);
        assert_eq!(scored_count(&scores, &table), 5);
        assert_eq!(summarize(&scores, &table).fit, FitLabel::Pending);
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        assert_eq!(classify(85.0, 6, 6), FitLabel::StrongFit);
        assert_eq!(classify(84.99, 6, 6), FitLabel::GoodFit);
        assert_eq!(classify(70.0, 6, 6), FitLabel::GoodFit);
        assert_eq!(classify(55.0, 6, 6), FitLabel::AverageFit);
        assert_eq!(classify(54.99, 6, 6), FitLabel::LowFit);
        assert_eq!(classify(0.0, 6, 6), FitLabel::LowFit);
    }

    #[test]
    fn test_raising_any_rating_never_lowers_fit() {
        let table = CriteriaTable::default();
        for base in 0..5u8 {
            let scores = uniform(base);
            let before = summarize(&scores, &table).fit;
            for id in IDS {
                let mut raised = scores.clone();
                raised.insert(id.to_string(), base + 1);
                let after = summarize(&raised, &table).fit;
                assert!(after >= before, "raising {id} from {base} lowered fit");
            }
        }
    }

    #[test]
    fn test_out_of_range_rating_is_capped() {
        let mut scores = uniform(5);
        scores.insert("logic".to_string(), 9);
        let p = weighted_percentage(&scores, &CriteriaTable::default());
        assert!(p <= 100.0);
    }
}
