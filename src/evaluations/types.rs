use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::scoring::Criteria;

/// One evaluator's complete scoring of one proposal.
///
/// `final_score` is computed once when the evaluation is submitted and never
/// recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub acronym: String,
    pub evaluator: String,
    pub submitted_at: DateTime<Utc>,
    pub criteria: Criteria,
    pub final_score: f64,
}
