//! Session scripts: a YAML (or JSON) list of proposals and evaluations
//! replayed into a fresh in-memory session.
//!
//! ```yaml
//! proposals:
//!   - acronym: EDSR
//!     signification: Entrepôt de Données de Santé Recherche
//!     cellule: Méthodologie
//! evaluations:
//!   - acronym: EDSR
//!     evaluator: alice
//!     scores: [4, 4, 4, 4, 3, 3, 3, 3, 3, 3, 3, 3, 3, 2, 2, 2]
//!   - acronym: EDSR
//!     evaluator: bob
//!     criteria: { pronunciation: 5, international_potential: 4, ... }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::error::StoreError;
use crate::scoring::Criteria;
use crate::session::Session;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionScript {
    #[serde(default)]
    pub proposals: Vec<ProposalEntry>,
    #[serde(default)]
    pub evaluations: Vec<EvaluationEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProposalEntry {
    #[serde(default)]
    pub acronym: String,
    #[serde(default)]
    pub signification: String,
    #[serde(default)]
    pub cellule: String,
}

/// Scores are given either in canonical order (`scores`) or by name
/// (`criteria`), not both.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationEntry {
    #[serde(default)]
    pub acronym: String,
    #[serde(default)]
    pub evaluator: String,
    #[serde(default)]
    pub scores: Option<Vec<i64>>,
    #[serde(default)]
    pub criteria: Option<BTreeMap<String, i64>>,
}

impl EvaluationEntry {
    /// Scores in canonical order, resolving named criteria.
    fn ordered_scores(&self) -> Result<Vec<i64>, StoreError> {
        match (&self.scores, &self.criteria) {
            (Some(scores), None) => Ok(scores.clone()),
            (None, Some(named)) => Ok(Criteria::from_named(named)?.to_vec()),
            (Some(_), Some(_)) => Err(StoreError::Validation(
                "give either scores or criteria, not both".to_string(),
            )),
            (None, None) => Err(StoreError::Validation(
                "evaluation has no scores".to_string(),
            )),
        }
    }
}

/// A script entry the session refused.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub section: &'static str,
    pub index: usize,
    pub error: StoreError,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.section, self.index, self.error)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    pub accepted: usize,
    pub rejected: Vec<Rejection>,
}

/// Parse a script from text.
pub fn parse_script(content: &str) -> Result<SessionScript> {
    let script: SessionScript =
        serde_saphyr::from_str(content).context("Failed to parse session script")?;
    Ok(script)
}

/// Load a script from a file, or from stdin when `path` is "-".
pub fn load_script(path: &Path) -> Result<SessionScript> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read session script from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session script at {}", path.display()))?
    };
    parse_script(&content).with_context(|| format!("in {}", path.display()))
}

/// Apply every proposal, then every evaluation, in file order.
///
/// A rejected entry is recorded and skipped; it never stops the replay.
pub fn replay(script: &SessionScript, session: &mut Session) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for (index, entry) in script.proposals.iter().enumerate() {
        match session.add_proposal(&entry.acronym, &entry.signification, &entry.cellule) {
            Ok(_) => summary.accepted += 1,
            Err(error) => summary.rejected.push(Rejection {
                section: "proposals",
                index,
                error,
            }),
        }
    }

    for (index, entry) in script.evaluations.iter().enumerate() {
        let result = entry
            .ordered_scores()
            .and_then(|scores| session.add_evaluation(&entry.acronym, &entry.evaluator, &scores));
        match result {
            Ok(_) => summary.accepted += 1,
            Err(error) => summary.rejected.push(Rejection {
                section: "evaluations",
                index,
                error,
            }),
        }
    }

    summary
}
