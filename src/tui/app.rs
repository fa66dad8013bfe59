use crate::config::Config;
use crate::proposals::{Cellule, Proposal};
use crate::report::{DimensionBreakdown, RankingEntry};
use crate::scoring::{calculate_score, Criterion};
use crate::session::Session;
use crate::tui::theme::ThemeColors;
use std::time::Instant;

const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Proposals,
    Evaluate,
    Results,
}

impl View {
    pub const ALL: [View; 4] = [View::Home, View::Proposals, View::Evaluate, View::Results];

    pub fn title(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Proposals => "Proposals",
            View::Evaluate => "Evaluate",
            View::Results => "Results",
        }
    }

    pub fn index(self) -> usize {
        View::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    ProposalForm,
    EvaluationForm,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalField {
    Acronym,
    Signification,
    Cellule,
}

#[derive(Debug, Clone)]
pub struct ProposalForm {
    pub acronym: String,
    pub signification: String,
    pub cellule: Cellule,
    pub focus: ProposalField,
}

impl Default for ProposalForm {
    fn default() -> Self {
        Self {
            acronym: String::new(),
            signification: String::new(),
            cellule: Cellule::Methodologie,
            focus: ProposalField::Acronym,
        }
    }
}

impl ProposalForm {
    fn next_field(&mut self) {
        self.focus = match self.focus {
            ProposalField::Acronym => ProposalField::Signification,
            ProposalField::Signification => ProposalField::Cellule,
            ProposalField::Cellule => ProposalField::Acronym,
        };
    }

    fn previous_field(&mut self) {
        self.focus = match self.focus {
            ProposalField::Acronym => ProposalField::Cellule,
            ProposalField::Signification => ProposalField::Acronym,
            ProposalField::Cellule => ProposalField::Signification,
        };
    }
}

/// Focusable rows of the evaluation form, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationFocus {
    Evaluator,
    Proposal,
    Criterion(usize),
}

#[derive(Debug, Clone)]
pub struct EvaluationForm {
    pub evaluator: String,
    pub proposal_index: usize,
    pub scores: [i64; Criterion::COUNT],
    pub focus: EvaluationFocus,
}

impl EvaluationForm {
    fn new(default_score: i64) -> Self {
        Self {
            evaluator: String::new(),
            proposal_index: 0,
            scores: [default_score; Criterion::COUNT],
            focus: EvaluationFocus::Evaluator,
        }
    }

    fn focus_down(&mut self) {
        self.focus = match self.focus {
            EvaluationFocus::Evaluator => EvaluationFocus::Proposal,
            EvaluationFocus::Proposal => EvaluationFocus::Criterion(0),
            EvaluationFocus::Criterion(i) if i + 1 < Criterion::COUNT => {
                EvaluationFocus::Criterion(i + 1)
            }
            EvaluationFocus::Criterion(_) => EvaluationFocus::Evaluator,
        };
    }

    fn focus_up(&mut self) {
        self.focus = match self.focus {
            EvaluationFocus::Evaluator => EvaluationFocus::Criterion(Criterion::COUNT - 1),
            EvaluationFocus::Proposal => EvaluationFocus::Evaluator,
            EvaluationFocus::Criterion(0) => EvaluationFocus::Proposal,
            EvaluationFocus::Criterion(i) => EvaluationFocus::Criterion(i - 1),
        };
    }
}

pub struct App {
    pub session: Session,
    pub config: Config,
    pub theme: ThemeColors,
    pub current_view: View,
    pub input_mode: InputMode,
    pub proposal_form: ProposalForm,
    pub evaluation_form: EvaluationForm,
    pub proposals_state: ratatui::widgets::TableState,
    pub results_state: ratatui::widgets::TableState,
    pub flash_message: Option<(String, FlashKind, Instant)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session, config: Config, theme: ThemeColors) -> Self {
        let mut app = Self {
            session,
            evaluation_form: EvaluationForm::new(config.default_score),
            config,
            theme,
            current_view: View::Home,
            input_mode: InputMode::Normal,
            proposal_form: ProposalForm::default(),
            proposals_state: ratatui::widgets::TableState::default(),
            results_state: ratatui::widgets::TableState::default(),
            flash_message: None,
            should_quit: false,
        };
        app.clamp_selections();
        app
    }

    // Flash messages

    pub fn show_flash(&mut self, msg: String, kind: FlashKind) {
        self.flash_message = Some((msg, kind, Instant::now()));
    }

    pub fn update_flash(&mut self) {
        if let Some((_, _, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    // Views and navigation

    pub fn select_view(&mut self, view: View) {
        self.current_view = view;
        self.clamp_selections();
    }

    pub fn next_view(&mut self) {
        let idx = (self.current_view.index() + 1) % View::ALL.len();
        self.select_view(View::ALL[idx]);
    }

    pub fn previous_view(&mut self) {
        let idx = (self.current_view.index() + View::ALL.len() - 1) % View::ALL.len();
        self.select_view(View::ALL[idx]);
    }

    pub fn proposals(&self) -> &[Proposal] {
        self.session.proposals()
    }

    pub fn ranking(&self) -> Vec<RankingEntry> {
        self.session.ranking()
    }

    pub fn next_row(&mut self) {
        let len = self.current_row_count();
        let state = match self.current_view {
            View::Proposals => &mut self.proposals_state,
            View::Results => &mut self.results_state,
            _ => return,
        };
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.current_row_count();
        let state = match self.current_view {
            View::Proposals => &mut self.proposals_state,
            View::Results => &mut self.results_state,
            _ => return,
        };
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    fn current_row_count(&self) -> usize {
        match self.current_view {
            View::Proposals => self.session.proposals().len(),
            View::Results => self.ranking().len(),
            _ => 0,
        }
    }

    /// Keep table selections inside their lists after the data changed.
    fn clamp_selections(&mut self) {
        let proposal_count = self.session.proposals().len();
        let ranking_count = self.ranking().len();
        for (state, len) in [
            (&mut self.proposals_state, proposal_count),
            (&mut self.results_state, ranking_count),
        ] {
            match state.selected() {
                _ if len == 0 => state.select(None),
                Some(i) if i >= len => state.select(Some(len - 1)),
                None => state.select(Some(0)),
                Some(_) => {}
            }
        }
        if proposal_count > 0 && self.evaluation_form.proposal_index >= proposal_count {
            self.evaluation_form.proposal_index = proposal_count - 1;
        }
    }

    pub fn selected_ranking_entry(&self) -> Option<RankingEntry> {
        let ranking = self.ranking();
        self.results_state
            .selected()
            .and_then(|i| ranking.into_iter().nth(i))
    }

    /// Breakdown of the acronym selected in the results table.
    pub fn selected_breakdown(&self) -> Option<(String, DimensionBreakdown)> {
        let entry = self.selected_ranking_entry()?;
        let breakdown = self.session.detail_breakdown(&entry.acronym).ok()?;
        Some((entry.acronym, breakdown))
    }

    // Proposal form

    pub fn start_proposal_form(&mut self) {
        self.proposal_form = ProposalForm::default();
        self.input_mode = InputMode::ProposalForm;
    }

    pub fn cancel_form(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn proposal_form_next_field(&mut self) {
        self.proposal_form.next_field();
    }

    pub fn proposal_form_previous_field(&mut self) {
        self.proposal_form.previous_field();
    }

    pub fn proposal_form_input(&mut self, c: char) {
        match self.proposal_form.focus {
            ProposalField::Acronym => self.proposal_form.acronym.push(c),
            ProposalField::Signification => self.proposal_form.signification.push(c),
            ProposalField::Cellule => {}
        }
    }

    pub fn proposal_form_backspace(&mut self) {
        match self.proposal_form.focus {
            ProposalField::Acronym => {
                self.proposal_form.acronym.pop();
            }
            ProposalField::Signification => {
                self.proposal_form.signification.pop();
            }
            ProposalField::Cellule => {}
        }
    }

    /// Left/Right on the cellule field.
    pub fn proposal_form_cycle(&mut self, forward: bool) {
        if self.proposal_form.focus == ProposalField::Cellule {
            let cellule = self.proposal_form.cellule;
            self.proposal_form.cellule = if forward {
                cellule.next()
            } else {
                cellule.previous()
            };
        }
    }

    /// Submit the proposal form. The form stays open on validation errors.
    pub fn submit_proposal_form(&mut self) {
        let form = &self.proposal_form;
        match self
            .session
            .add_proposal(&form.acronym, &form.signification, form.cellule.as_str())
        {
            Ok(proposal) => {
                self.input_mode = InputMode::Normal;
                self.proposal_form = ProposalForm::default();
                self.clamp_selections();
                self.proposals_state
                    .select(Some(self.session.proposals().len() - 1));
                self.show_flash(
                    format!("Added proposal {}", proposal.acronym),
                    FlashKind::Success,
                );
            }
            Err(e) => self.show_flash(e.to_string(), FlashKind::Error),
        }
    }

    // Evaluation form

    pub fn start_evaluation_form(&mut self) {
        if self.session.proposals().is_empty() {
            self.show_flash(
                "No proposals to evaluate. Add one first.".to_string(),
                FlashKind::Info,
            );
            return;
        }
        // Preselect the proposal highlighted in the proposals table
        if let Some(i) = self.proposals_state.selected() {
            self.evaluation_form.proposal_index = i;
        }
        self.clamp_selections();
        self.input_mode = InputMode::EvaluationForm;
    }

    pub fn evaluation_form_down(&mut self) {
        self.evaluation_form.focus_down();
    }

    pub fn evaluation_form_up(&mut self) {
        self.evaluation_form.focus_up();
    }

    pub fn evaluation_form_input(&mut self, c: char) {
        let form = &mut self.evaluation_form;
        match form.focus {
            EvaluationFocus::Evaluator => form.evaluator.push(c),
            EvaluationFocus::Criterion(i) => {
                if let Some(value) = c.to_digit(10) {
                    let value = i64::from(value);
                    if (1..=5).contains(&value) {
                        form.scores[i] = value;
                    }
                }
            }
            EvaluationFocus::Proposal => {}
        }
    }

    pub fn evaluation_form_backspace(&mut self) {
        if self.evaluation_form.focus == EvaluationFocus::Evaluator {
            self.evaluation_form.evaluator.pop();
        }
    }

    /// Left/Right: move a slider within 1..=5, or pick another proposal.
    pub fn evaluation_form_adjust(&mut self, delta: i64) {
        let proposal_count = self.session.proposals().len();
        let form = &mut self.evaluation_form;
        match form.focus {
            EvaluationFocus::Criterion(i) => {
                form.scores[i] = (form.scores[i] + delta).clamp(1, 5);
            }
            EvaluationFocus::Proposal if proposal_count > 0 => {
                let n = proposal_count as i64;
                let idx = (form.proposal_index as i64 + delta).rem_euclid(n);
                form.proposal_index = idx as usize;
            }
            _ => {}
        }
    }

    pub fn evaluation_target(&self) -> Option<&Proposal> {
        self.session
            .proposals()
            .get(self.evaluation_form.proposal_index)
    }

    /// Score the form would get if submitted now.
    pub fn preview_score(&self) -> Option<f64> {
        calculate_score(&self.evaluation_form.scores)
            .ok()
            .map(|r| r.score)
    }

    /// Submit the evaluation form. Sliders reset to the configured default on
    /// success; the evaluator name is kept for the next proposal.
    pub fn submit_evaluation_form(&mut self) {
        let acronym = match self.evaluation_target() {
            Some(p) => p.acronym.clone(),
            None => {
                self.show_flash("No proposal selected".to_string(), FlashKind::Error);
                return;
            }
        };

        let form = &self.evaluation_form;
        match self
            .session
            .add_evaluation(&acronym, &form.evaluator, &form.scores)
        {
            Ok(evaluation) => {
                self.evaluation_form.scores = [self.config.default_score; Criterion::COUNT];
                self.evaluation_form.focus = EvaluationFocus::Evaluator;
                self.input_mode = InputMode::Normal;
                self.clamp_selections();
                self.show_flash(
                    format!(
                        "Recorded evaluation of {} by {} (score {})",
                        evaluation.acronym,
                        evaluation.evaluator,
                        crate::output::format_score(evaluation.final_score)
                    ),
                    FlashKind::Success,
                );
            }
            Err(e) => self.show_flash(e.to_string(), FlashKind::Error),
        }
    }

    // Help

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}
