use chrono::Utc;

use super::types::Evaluation;
use crate::error::{require_text, StoreError};
use crate::scoring::{weighted_score, Criteria};

/// Append-only registry of evaluations, kept in submission order.
#[derive(Debug, Clone, Default)]
pub struct EvaluationStore {
    evaluations: Vec<Evaluation>,
}

impl EvaluationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, score and append an evaluation.
    ///
    /// `scores` holds the 16 criterion values in canonical order. The acronym
    /// is not checked against the proposal store, and repeated evaluations by
    /// the same evaluator are all kept.
    pub fn add_evaluation(
        &mut self,
        acronym: &str,
        evaluator: &str,
        scores: &[i64],
    ) -> Result<Evaluation, StoreError> {
        let acronym = require_text("acronym", acronym)?;
        let evaluator = require_text("evaluator", evaluator)?;
        let criteria = Criteria::try_from_slice(scores)?;

        let evaluation = Evaluation {
            acronym,
            evaluator,
            submitted_at: Utc::now(),
            final_score: weighted_score(&criteria),
            criteria,
        };
        self.evaluations.push(evaluation.clone());
        Ok(evaluation)
    }

    pub fn list_evaluations(&self) -> &[Evaluation] {
        &self.evaluations
    }

    /// Evaluations of one acronym, in submission order.
    pub fn list_evaluations_for(&self, acronym: &str) -> Vec<&Evaluation> {
        let acronym = acronym.trim();
        self.evaluations
            .iter()
            .filter(|e| e.acronym == acronym)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.evaluations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_computes_final_score() {
        let mut store = EvaluationStore::new();
        let evaluation = store.add_evaluation("EDSR", "alice", &[3; 16]).unwrap();

        assert_eq!(evaluation.acronym, "EDSR");
        assert_eq!(evaluation.evaluator, "alice");
        assert!((evaluation.final_score - 300.0).abs() < 1e-9);
        assert_eq!(evaluation.final_score, weighted_score(&evaluation.criteria));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_extreme_scores_stored_exactly() {
        let mut store = EvaluationStore::new();
        let lowest = store.add_evaluation("EDSR", "alice", &[1; 16]).unwrap();
        let highest = store.add_evaluation("EDSR", "bob", &[5; 16]).unwrap();
        assert_eq!(lowest.final_score, 100.0);
        assert_eq!(highest.final_score, 500.0);
    }

    #[test]
    fn test_empty_evaluator_rejected() {
        let mut store = EvaluationStore::new();
        let err = store.add_evaluation("EDSR", "  ", &[3; 16]).unwrap_err();
        assert_eq!(
            err,
            StoreError::Validation("evaluator must not be empty".to_string())
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_acronym_rejected() {
        let mut store = EvaluationStore::new();
        assert!(store.add_evaluation("", "alice", &[3; 16]).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_out_of_range_criterion_leaves_store_unchanged() {
        let mut store = EvaluationStore::new();
        let mut scores = [3i64; 16];
        scores[7] = 6;
        let err = store.add_evaluation("EDSR", "alice", &scores).unwrap_err();
        match err {
            StoreError::Validation(msg) => assert!(msg.contains("representation")),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_partial_evaluation_rejected() {
        let mut store = EvaluationStore::new();
        let err = store.add_evaluation("EDSR", "alice", &[3; 12]).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_orphan_acronym_accepted() {
        // No proposal store here at all: referential checks live in Session.
        let mut store = EvaluationStore::new();
        assert!(store.add_evaluation("GHOST", "alice", &[2; 16]).is_ok());
    }

    #[test]
    fn test_duplicates_kept() {
        let mut store = EvaluationStore::new();
        store.add_evaluation("EDSR", "alice", &[2; 16]).unwrap();
        store.add_evaluation("EDSR", "alice", &[4; 16]).unwrap();
        assert_eq!(store.list_evaluations_for("EDSR").len(), 2);
    }

    #[test]
    fn test_list_for_filters_in_order() {
        let mut store = EvaluationStore::new();
        store.add_evaluation("EDSR", "alice", &[1; 16]).unwrap();
        store.add_evaluation("OTHER", "bob", &[2; 16]).unwrap();
        store.add_evaluation("EDSR", "carol", &[5; 16]).unwrap();

        let evaluators: Vec<&str> = store
            .list_evaluations_for("EDSR")
            .iter()
            .map(|e| e.evaluator.as_str())
            .collect();
        assert_eq!(evaluators, vec!["alice", "carol"]);
        assert_eq!(store.list_evaluations().len(), 3);
        assert!(store.list_evaluations_for("NONE").is_empty());
    }
}
