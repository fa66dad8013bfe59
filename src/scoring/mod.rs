pub mod criteria;
pub mod engine;
pub mod rubric;

pub use criteria::{Criteria, MAX_SCORE, MIN_SCORE};
pub use engine::{
    calculate_score, dimension_average, score_criteria, weighted_score, DimensionContribution,
    ScoreBreakdown, ScoreResult, MAX_FINAL_SCORE, MIN_FINAL_SCORE,
};
pub use rubric::{Criterion, Dimension};
