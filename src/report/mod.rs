//! Rankings and dimension breakdowns derived from the evaluation store.
//!
//! Everything here is recomputed on each call; nothing is cached.

use serde::{Deserialize, Serialize};

use crate::evaluations::Evaluation;
use crate::scoring::{dimension_average, Dimension};

/// One row of the ranking table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub acronym: String,
    pub mean_score: f64,
    pub evaluation_count: usize,
}

/// Unweighted, unscaled mean of each dimension (each in 1..=5).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionBreakdown {
    pub functional: f64,
    pub scientific: f64,
    pub identity: f64,
    pub communication: f64,
    pub technical: f64,
}

impl DimensionBreakdown {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Functional => self.functional,
            Dimension::Scientific => self.scientific,
            Dimension::Identity => self.identity,
            Dimension::Communication => self.communication,
            Dimension::Technical => self.technical,
        }
    }

    /// Values in `Dimension::ALL` order, e.g. for chart axes.
    pub fn values(&self) -> [(Dimension, f64); 5] {
        Dimension::ALL.map(|d| (d, self.get(d)))
    }
}

/// Which evaluation(s) feed the detail view of an acronym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailView {
    /// Only the first evaluation submitted for the acronym.
    #[default]
    First,
    /// Each dimension averaged over every evaluation of the acronym.
    Average,
}

/// Counters shown on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub proposals: usize,
    pub evaluations: usize,
}

/// Group evaluations by acronym and rank by mean final score, descending.
///
/// Groups appear in the order their acronym was first seen; the sort is
/// stable, so equal means keep that discovery order.
pub fn ranking(evaluations: &[Evaluation]) -> Vec<RankingEntry> {
    let mut groups: Vec<(&str, f64, usize)> = Vec::new();
    for evaluation in evaluations {
        match groups.iter_mut().find(|(a, _, _)| *a == evaluation.acronym) {
            Some((_, total, count)) => {
                *total += evaluation.final_score;
                *count += 1;
            }
            None => groups.push((evaluation.acronym.as_str(), evaluation.final_score, 1)),
        }
    }

    let mut entries: Vec<RankingEntry> = groups
        .into_iter()
        .map(|(acronym, total, count)| RankingEntry {
            acronym: acronym.to_string(),
            mean_score: total / count as f64,
            evaluation_count: count,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.mean_score
            .partial_cmp(&a.mean_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries
}

/// Dimension means of a single evaluation.
pub fn dimension_breakdown(evaluation: &Evaluation) -> DimensionBreakdown {
    let mean = |d: Dimension| dimension_average(evaluation.criteria.dimension_scores(d));
    DimensionBreakdown {
        functional: mean(Dimension::Functional),
        scientific: mean(Dimension::Scientific),
        identity: mean(Dimension::Identity),
        communication: mean(Dimension::Communication),
        technical: mean(Dimension::Technical),
    }
}

/// Breakdown shown in the detail view for `acronym`, or `None` when it has
/// no evaluations.
pub fn detail_breakdown(
    evaluations: &[Evaluation],
    acronym: &str,
    view: DetailView,
) -> Option<DimensionBreakdown> {
    let acronym = acronym.trim();
    let mut matching = evaluations.iter().filter(|e| e.acronym == acronym);

    match view {
        DetailView::First => matching.next().map(dimension_breakdown),
        DetailView::Average => {
            let breakdowns: Vec<DimensionBreakdown> = matching.map(dimension_breakdown).collect();
            if breakdowns.is_empty() {
                return None;
            }
            let n = breakdowns.len() as f64;
            let avg = |d: Dimension| breakdowns.iter().map(|b| b.get(d)).sum::<f64>() / n;
            Some(DimensionBreakdown {
                functional: avg(Dimension::Functional),
                scientific: avg(Dimension::Scientific),
                identity: avg(Dimension::Identity),
                communication: avg(Dimension::Communication),
                technical: avg(Dimension::Technical),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluations::EvaluationStore;

    /// Functional at 5, the rest at 1: final score 200.
    fn scores_200() -> [i64; 16] {
        let mut values = [1i64; 16];
        for c in Dimension::Functional.criteria() {
            values[c.index()] = 5;
        }
        values
    }

    #[test]
    fn test_ranking_mean_and_count() {
        let mut store = EvaluationStore::new();
        store.add_evaluation("EDSR", "alice", &scores_200()).unwrap();
        store.add_evaluation("EDSR", "bob", &[4; 16]).unwrap();

        let ranking = ranking(store.list_evaluations());
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].acronym, "EDSR");
        assert!((ranking[0].mean_score - 300.0).abs() < 1e-9);
        assert_eq!(ranking[0].evaluation_count, 2);
    }

    #[test]
    fn test_ranking_empty() {
        assert!(ranking(&[]).is_empty());
    }

    #[test]
    fn test_ranking_sorted_descending() {
        let mut store = EvaluationStore::new();
        store.add_evaluation("LOW", "a", &[1; 16]).unwrap();
        store.add_evaluation("HIGH", "a", &[5; 16]).unwrap();
        store.add_evaluation("MID", "a", &[3; 16]).unwrap();

        let order: Vec<String> = ranking(store.list_evaluations())
            .into_iter()
            .map(|r| r.acronym)
            .collect();
        assert_eq!(order, vec!["HIGH", "MID", "LOW"]);
    }

    #[test]
    fn test_ranking_ties_keep_discovery_order() {
        let mut store = EvaluationStore::new();
        store.add_evaluation("BETA", "a", &[3; 16]).unwrap();
        store.add_evaluation("ALPHA", "a", &[3; 16]).unwrap();
        store.add_evaluation("GAMMA", "a", &[3; 16]).unwrap();
        store.add_evaluation("ALPHA", "b", &[3; 16]).unwrap();

        let ranking = ranking(store.list_evaluations());
        let order: Vec<&str> = ranking.iter().map(|r| r.acronym.as_str()).collect();
        assert_eq!(order, vec!["BETA", "ALPHA", "GAMMA"]);
        assert_eq!(ranking[1].evaluation_count, 2);
    }

    #[test]
    fn test_dimension_breakdown_unweighted() {
        let mut values = [2i64; 16];
        for c in Dimension::Functional.criteria() {
            values[c.index()] = 4;
        }
        let mut store = EvaluationStore::new();
        let evaluation = store.add_evaluation("EDSR", "alice", &values).unwrap();

        let breakdown = dimension_breakdown(&evaluation);
        assert_eq!(breakdown.functional, 4.0);
        assert_eq!(breakdown.scientific, 2.0);
        assert_eq!(breakdown.identity, 2.0);
        assert_eq!(breakdown.communication, 2.0);
        assert_eq!(breakdown.technical, 2.0);
    }

    #[test]
    fn test_detail_first_ignores_later_evaluations() {
        // The detail view shows the first evaluation only, not an average.
        let mut store = EvaluationStore::new();
        store.add_evaluation("EDSR", "alice", &[2; 16]).unwrap();
        store.add_evaluation("EDSR", "bob", &[4; 16]).unwrap();

        let breakdown =
            detail_breakdown(store.list_evaluations(), "EDSR", DetailView::First).unwrap();
        for (_, value) in breakdown.values() {
            assert_eq!(value, 2.0);
        }
    }

    #[test]
    fn test_detail_average_across_evaluators() {
        let mut store = EvaluationStore::new();
        store.add_evaluation("EDSR", "alice", &[2; 16]).unwrap();
        store.add_evaluation("OTHER", "alice", &[5; 16]).unwrap();
        store.add_evaluation("EDSR", "bob", &[4; 16]).unwrap();

        let breakdown =
            detail_breakdown(store.list_evaluations(), "EDSR", DetailView::Average).unwrap();
        for (_, value) in breakdown.values() {
            assert!((value - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_detail_unknown_acronym() {
        let mut store = EvaluationStore::new();
        store.add_evaluation("EDSR", "alice", &[2; 16]).unwrap();
        assert!(detail_breakdown(store.list_evaluations(), "NOPE", DetailView::First).is_none());
        assert!(detail_breakdown(store.list_evaluations(), "NOPE", DetailView::Average).is_none());
    }

    #[test]
    fn test_detail_view_parses_lowercase() {
        let view: DetailView = serde_json::from_str("\"average\"").unwrap();
        assert_eq!(view, DetailView::Average);
        assert_eq!(DetailView::default(), DetailView::First);
    }
}
