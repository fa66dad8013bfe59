//! Error types shared by the scoring model and the session stores.
//!
//! Every error here is recoverable: a rejected operation leaves the stores
//! untouched and the caller decides how to surface the message.

use thiserror::Error;

use crate::scoring::Criterion;

/// A criterion set that cannot be scored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// A criterion value lies outside the 1..=5 scale.
    #[error("{criterion} must be between 1 and 5, got {value}")]
    OutOfRange { criterion: Criterion, value: i64 },

    /// A criterion was not provided.
    #[error("missing score for {0}")]
    Missing(Criterion),

    /// More ordered values were given than the rubric has criteria.
    #[error("expected {expected} criterion scores, got {got}")]
    TooMany { expected: usize, got: usize },

    /// A named score does not match any criterion key.
    #[error("unknown criterion '{0}'")]
    UnknownCriterion(String),
}

/// Errors raised at the proposal and evaluation store boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Malformed or out-of-range input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lookup of an acronym that has no matching record.
    #[error("Not found: {entity} '{acronym}'")]
    NotFound { entity: &'static str, acronym: String },
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, acronym: &str) -> Self {
        StoreError::NotFound {
            entity,
            acronym: acronym.to_string(),
        }
    }
}

impl From<ScoreError> for StoreError {
    fn from(err: ScoreError) -> Self {
        StoreError::Validation(err.to_string())
    }
}

/// Trim `value` and reject it when nothing is left.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}
