use chrono::Utc;

use super::types::{Cellule, Proposal};
use crate::error::{require_text, StoreError};

/// Append-only registry of proposals, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ProposalStore {
    proposals: Vec<Proposal>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a proposal.
    ///
    /// Acronym and signification are trimmed and must not be empty; `cellule`
    /// must name one of the four cellules. On error nothing is appended.
    /// Acronym uniqueness is a convention, not enforced here.
    pub fn add_proposal(
        &mut self,
        acronym: &str,
        signification: &str,
        cellule: &str,
    ) -> Result<Proposal, StoreError> {
        let acronym = require_text("acronym", acronym)?;
        let signification = require_text("signification", signification)?;
        let cellule: Cellule = cellule.parse()?;

        let proposal = Proposal {
            acronym,
            signification,
            cellule,
            created_at: Utc::now(),
        };
        self.proposals.push(proposal.clone());
        Ok(proposal)
    }

    pub fn list_proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    /// First proposal with this acronym (exact match after trimming the query).
    pub fn find_by_acronym(&self, acronym: &str) -> Result<&Proposal, StoreError> {
        let acronym = acronym.trim();
        self.proposals
            .iter()
            .find(|p| p.acronym == acronym)
            .ok_or_else(|| StoreError::not_found("proposal", acronym))
    }

    pub fn contains(&self, acronym: &str) -> bool {
        self.find_by_acronym(acronym).is_ok()
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }
}
