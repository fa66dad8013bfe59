//! One evaluation session: a proposal store and an evaluation store owned
//! together and handed by reference to whichever interface drives them.

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::evaluations::{Evaluation, EvaluationStore};
use crate::proposals::{Proposal, ProposalStore};
use crate::report::{self, DetailView, DimensionBreakdown, RankingEntry, SessionStats};

/// Behavior switches for a session, usually taken from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionPolicy {
    /// Reject evaluations whose acronym has no proposal.
    pub strict_acronyms: bool,
    /// How the detail breakdown picks its evaluations.
    pub detail_view: DetailView,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    proposals: ProposalStore,
    evaluations: EvaluationStore,
    policy: SessionPolicy,
}

impl Session {
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            proposals: ProposalStore::new(),
            evaluations: EvaluationStore::new(),
            policy,
        }
    }

    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    pub fn add_proposal(
        &mut self,
        acronym: &str,
        signification: &str,
        cellule: &str,
    ) -> Result<Proposal, StoreError> {
        match self.proposals.add_proposal(acronym, signification, cellule) {
            Ok(proposal) => {
                debug!(acronym = %proposal.acronym, cellule = %proposal.cellule, "proposal added");
                Ok(proposal)
            }
            Err(e) => {
                warn!(acronym, error = %e, "proposal rejected");
                Err(e)
            }
        }
    }

    pub fn proposals(&self) -> &[Proposal] {
        self.proposals.list_proposals()
    }

    pub fn find_proposal(&self, acronym: &str) -> Result<&Proposal, StoreError> {
        self.proposals.find_by_acronym(acronym)
    }

    /// Score and record an evaluation.
    ///
    /// With `strict_acronyms` off (the default) the acronym does not need a
    /// matching proposal.
    pub fn add_evaluation(
        &mut self,
        acronym: &str,
        evaluator: &str,
        scores: &[i64],
    ) -> Result<Evaluation, StoreError> {
        if self.policy.strict_acronyms && !acronym.trim().is_empty() {
            if let Err(e) = self.proposals.find_by_acronym(acronym) {
                warn!(acronym, evaluator, error = %e, "evaluation rejected");
                return Err(e);
            }
        }

        match self.evaluations.add_evaluation(acronym, evaluator, scores) {
            Ok(evaluation) => {
                debug!(
                    acronym = %evaluation.acronym,
                    evaluator = %evaluation.evaluator,
                    score = evaluation.final_score,
                    "evaluation recorded"
                );
                Ok(evaluation)
            }
            Err(e) => {
                warn!(acronym, evaluator, error = %e, "evaluation rejected");
                Err(e)
            }
        }
    }

    pub fn evaluations(&self) -> &[Evaluation] {
        self.evaluations.list_evaluations()
    }

    pub fn evaluations_for(&self, acronym: &str) -> Vec<&Evaluation> {
        self.evaluations.list_evaluations_for(acronym)
    }

    pub fn ranking(&self) -> Vec<RankingEntry> {
        report::ranking(self.evaluations.list_evaluations())
    }

    /// Breakdown for the detail view, following the session's `DetailView`.
    pub fn detail_breakdown(&self, acronym: &str) -> Result<DimensionBreakdown, StoreError> {
        report::detail_breakdown(
            self.evaluations.list_evaluations(),
            acronym,
            self.policy.detail_view,
        )
        .ok_or_else(|| StoreError::not_found("evaluation", acronym.trim()))
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            proposals: self.proposals.len(),
            evaluations: self.evaluations.len(),
        }
    }
}
