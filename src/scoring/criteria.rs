use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

use super::rubric::{Criterion, Dimension};
use crate::error::ScoreError;

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 5;

/// A complete, validated set of 16 criterion scores.
///
/// Can only be built through the checked constructors, so every value is
/// guaranteed to lie in 1..=5 and no criterion is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Criteria {
    scores: [u8; Criterion::COUNT],
}

impl Criteria {
    /// Build from scores in canonical criterion order.
    ///
    /// Fewer than 16 values reports the first missing criterion; more than 16
    /// is rejected as well. The first out-of-range value wins over a length
    /// problem so the message points at something the user typed.
    pub fn try_from_slice(values: &[i64]) -> Result<Self, ScoreError> {
        let mut scores = [0u8; Criterion::COUNT];
        for (criterion, value) in Criterion::ALL.iter().zip(values) {
            scores[criterion.index()] = check(*criterion, *value)?;
        }

        if values.len() > Criterion::COUNT {
            return Err(ScoreError::TooMany {
                expected: Criterion::COUNT,
                got: values.len(),
            });
        }
        if let Some(criterion) = Criterion::ALL.get(values.len()) {
            return Err(ScoreError::Missing(*criterion));
        }

        Ok(Self { scores })
    }

    /// Build from a map keyed by `Criterion::key`.
    pub fn from_named(values: &BTreeMap<String, i64>) -> Result<Self, ScoreError> {
        if let Some(unknown) = values.keys().find(|k| Criterion::from_key(k).is_none()) {
            return Err(ScoreError::UnknownCriterion(unknown.clone()));
        }

        let mut scores = [0u8; Criterion::COUNT];
        for criterion in Criterion::ALL {
            let value = values
                .iter()
                .find(|(k, _)| Criterion::from_key(k) == Some(criterion))
                .map(|(_, v)| *v)
                .ok_or(ScoreError::Missing(criterion))?;
            scores[criterion.index()] = check(criterion, value)?;
        }
        Ok(Self { scores })
    }

    /// Every criterion set to the same value.
    pub fn uniform(value: i64) -> Result<Self, ScoreError> {
        Self::try_from_slice(&[value; Criterion::COUNT])
    }

    pub fn get(&self, criterion: Criterion) -> u8 {
        self.scores[criterion.index()]
    }

    /// Scores of one dimension, in canonical order.
    pub fn dimension_scores(&self, dimension: Dimension) -> &[u8] {
        let (start, len) = dimension.span();
        &self.scores[start..start + len]
    }

    pub fn to_vec(&self) -> Vec<i64> {
        self.scores.iter().map(|s| i64::from(*s)).collect()
    }
}

fn check(criterion: Criterion, value: i64) -> Result<u8, ScoreError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ScoreError::OutOfRange { criterion, value })
    }
}

// Serialized as a map so JSON consumers see criterion keys rather than positions.
impl Serialize for Criteria {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Criterion::COUNT))?;
        for criterion in Criterion::ALL {
            map.serialize_entry(criterion.key(), &self.get(criterion))?;
        }
        map.end()
    }
}
