use serde::Serialize;

use super::criteria::Criteria;
use super::rubric::Dimension;
use crate::error::ScoreError;

/// Lowest possible final score (every criterion at 1).
pub const MIN_FINAL_SCORE: f64 = 100.0;
/// Highest possible final score (every criterion at 5).
pub const MAX_FINAL_SCORE: f64 = 500.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionContribution {
    pub dimension: Dimension,
    pub mean: f64,         // Unweighted mean, 1..=5
    pub weight: f64,       // e.g. 0.25
    pub contribution: f64, // mean * percent
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub dimensions: Vec<DimensionContribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Arithmetic mean of a criterion list, without rounding.
/// An empty list has no mean and yields 0.0.
pub fn dimension_average(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let total: f64 = scores.iter().map(|s| f64::from(*s)).sum();
    total / scores.len() as f64
}

/// Final weighted score of a criterion set.
///
/// Each dimension mean is multiplied by its integer percent share and the
/// products are summed. Every term lies in `percent..=5 * percent`, so the
/// result lies in 100..=500 with both ends exact (it is not normalized to
/// 0..=100).
pub fn weighted_score(criteria: &Criteria) -> f64 {
    Dimension::ALL
        .iter()
        .map(|d| contribution(dimension_average(criteria.dimension_scores(*d)), *d))
        .sum()
}

fn contribution(mean: f64, dimension: Dimension) -> f64 {
    mean * f64::from(dimension.percent())
}

/// Validate raw scores (canonical order) and compute the final score with its
/// per-dimension breakdown.
pub fn calculate_score(scores: &[i64]) -> Result<ScoreResult, ScoreError> {
    let criteria = Criteria::try_from_slice(scores)?;
    Ok(score_criteria(&criteria))
}

pub fn score_criteria(criteria: &Criteria) -> ScoreResult {
    let dimensions = Dimension::ALL
        .iter()
        .map(|d| {
            let mean = dimension_average(criteria.dimension_scores(*d));
            DimensionContribution {
                dimension: *d,
                mean,
                weight: d.weight(),
                contribution: contribution(mean, *d),
            }
        })
        .collect();

    ScoreResult {
        score: weighted_score(criteria),
        breakdown: ScoreBreakdown { dimensions },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Criterion;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_dimension_average_no_rounding() {
        assert!(approx(dimension_average(&[1, 2]), 1.5));
        assert!(approx(dimension_average(&[1, 1, 2]), 4.0 / 3.0));
        assert_eq!(dimension_average(&[]), 0.0);
    }

    #[test]
    fn test_all_ones_is_exactly_100() {
        let criteria = Criteria::uniform(1).unwrap();
        assert_eq!(weighted_score(&criteria), 100.0);
        assert_eq!(weighted_score(&criteria), MIN_FINAL_SCORE);
    }

    #[test]
    fn test_all_threes_is_exactly_300() {
        let criteria = Criteria::uniform(3).unwrap();
        assert_eq!(weighted_score(&criteria), 300.0);
    }

    #[test]
    fn test_all_fives_is_exactly_500() {
        let criteria = Criteria::uniform(5).unwrap();
        assert_eq!(weighted_score(&criteria), 500.0);
        assert_eq!(weighted_score(&criteria), MAX_FINAL_SCORE);
    }

    #[test]
    fn test_weights_applied_per_dimension() {
        // Functional at 5, everything else at 1:
        // (5*0.25 + 1*0.25 + 1*0.20 + 1*0.20 + 1*0.10) * 100 = 200
        let mut values = [1i64; 16];
        for c in Dimension::Functional.criteria() {
            values[c.index()] = 5;
        }
        let result = calculate_score(&values).unwrap();
        assert!(approx(result.score, 200.0));

        // Technical at 5, everything else at 1: 100 + 4*0.10*100 = 140
        let mut values = [1i64; 16];
        for c in Dimension::Technical.criteria() {
            values[c.index()] = 5;
        }
        let result = calculate_score(&values).unwrap();
        assert!(approx(result.score, 140.0));
    }

    #[test]
    fn test_partial_dimension_mean() {
        // One functional criterion raised from 1 to 5: mean 2.0, +0.25*100
        let mut values = [1i64; 16];
        values[Criterion::Pronunciation.index()] = 5;
        let result = calculate_score(&values).unwrap();
        assert!(approx(result.score, 125.0));
    }

    #[test]
    fn test_score_stays_in_range_for_all_uniform_and_mixed_sets() {
        for seed in 0..500u64 {
            let values: Vec<i64> = (0..16u64)
                .map(|i| ((seed * 31 + i * 7 + seed / 5) % 5 + 1) as i64)
                .collect();
            let first = calculate_score(&values).unwrap().score;
            let second = calculate_score(&values).unwrap().score;
            assert_eq!(first, second);
            assert!(first >= MIN_FINAL_SCORE, "{} below range", first);
            assert!(first <= MAX_FINAL_SCORE, "{} above range", first);
        }
    }

    #[test]
    fn test_invalid_scores_rejected() {
        let mut values = [3i64; 16];
        values[0] = 0;
        assert!(matches!(
            calculate_score(&values),
            Err(ScoreError::OutOfRange { value: 0, .. })
        ));

        values[0] = 6;
        assert!(matches!(
            calculate_score(&values),
            Err(ScoreError::OutOfRange { value: 6, .. })
        ));

        assert!(matches!(
            calculate_score(&[3; 10]),
            Err(ScoreError::Missing(_))
        ));
    }

    #[test]
    fn test_breakdown_contributions_sum_to_score() {
        let values = [4, 4, 4, 4, 2, 2, 2, 3, 3, 3, 5, 5, 5, 1, 1, 1];
        let result = calculate_score(&values).unwrap();
        assert_eq!(result.breakdown.dimensions.len(), 5);

        let total: f64 = result.breakdown.dimensions.iter().map(|d| d.contribution).sum();
        assert!(approx(total, result.score));

        let functional = &result.breakdown.dimensions[0];
        assert_eq!(functional.dimension, Dimension::Functional);
        assert!(approx(functional.mean, 4.0));
        assert!(approx(functional.contribution, 100.0));
    }
}
