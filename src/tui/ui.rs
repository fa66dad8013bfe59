use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Tabs};

use crate::output::{dimension_bar, format_age, format_score, truncate_text};
use crate::report::DetailView;
use crate::scoring::{Dimension, MAX_FINAL_SCORE, MAX_SCORE, MIN_FINAL_SCORE};
use crate::tui::app::{App, EvaluationFocus, FlashKind, InputMode, ProposalField, View};
use crate::tui::theme::ThemeColors;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 8 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.current_view {
        View::Home => render_home(frame, chunks[2], app),
        View::Proposals => render_proposals(frame, chunks[2], app),
        View::Evaluate => render_evaluation_form(frame, chunks[2], app),
        View::Results => render_results(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    match app.input_mode {
        InputMode::ProposalForm => render_proposal_popup(frame, app),
        InputMode::Help => render_help_popup(frame, &app.theme),
        InputMode::Normal | InputMode::EvaluationForm => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let name = "Acroscore";
    let mut spans = vec![Span::styled(name, Style::default().fg(theme.title_color).bold())];

    let stats = app.session.stats();
    let right = format!("{} proposals, {} evaluations", stats.proposals, stats.evaluations);
    let padding = (area.width as usize).saturating_sub(name.len() + right.len());
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(right, Style::default().fg(theme.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<String> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| format!("{} {}", i + 1, view.title()))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style)
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let stats = app.session.stats();
    let ranking = app.ranking();

    let mut lines = vec![
        Line::from(Span::styled(
            "Acronym proposal scoring",
            Style::default().fg(theme.title_color).bold(),
        )),
        Line::from(""),
        Line::from(format!("Proposals:   {}", stats.proposals)),
        Line::from(format!("Evaluations: {}", stats.evaluations)),
    ];

    if let Some(leader) = ranking.first() {
        lines.push(Line::from(vec![
            Span::raw("Leading:     "),
            Span::styled(leader.acronym.clone(), Style::default().bold()),
            Span::raw(" "),
            Span::styled(
                format_score(leader.mean_score),
                Style::default().fg(final_score_color(theme, leader.mean_score)),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Weights", theme.header_style)));
    for dimension in Dimension::ALL {
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<15}", dimension.label())),
            Span::styled(
                format!("{:>3}%", dimension.percent()),
                Style::default().fg(theme.status_key_color),
            ),
            Span::styled(
                format!("  {} criteria", dimension.criteria().len()),
                Style::default().fg(theme.muted),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "a: propose an acronym   e: evaluate   Tab: next view   ?: help",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_proposals(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.theme.clone();
    let proposals = app.session.proposals();

    if proposals.is_empty() {
        let empty_msg = Paragraph::new("No proposals yet. Press 'a' to add one.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.muted));
        frame.render_widget(empty_msg, area);
        return;
    }

    let rows: Vec<Row> = proposals
        .iter()
        .enumerate()
        .map(|(idx, proposal)| {
            let count = app.session.evaluations_for(&proposal.acronym).len();
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(proposal.acronym.clone()).style(Style::default().bold()),
                Cell::from(truncate_text(&proposal.signification, 60)),
                Cell::from(proposal.cellule.to_string()),
                Cell::from(count.to_string()),
                Cell::from(format_age(proposal.age())).style(Style::default().fg(theme.muted)),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(12),
        Constraint::Fill(1),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Acronym", "Signification", "Cellule", "Evals", "Added"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.proposals_state);
}

fn render_evaluation_form(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    if app.session.proposals().is_empty() {
        let msg = Paragraph::new("Nothing to evaluate yet. Press 'a' to add a proposal.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.muted));
        frame.render_widget(msg, area);
        return;
    }

    let editing = app.input_mode == InputMode::EvaluationForm;
    let form = &app.evaluation_form;
    let label_style = |focus: EvaluationFocus| {
        if editing && form.focus == focus {
            theme.focus_style
        } else {
            Style::default()
        }
    };

    let mut lines = Vec::new();
    let mut focused_line = 0;

    let cursor = if editing && form.focus == EvaluationFocus::Evaluator {
        "|"
    } else {
        ""
    };
    lines.push(Line::from(vec![
        Span::styled("Evaluator  ", label_style(EvaluationFocus::Evaluator)),
        Span::raw(format!("{}{}", form.evaluator, cursor)),
    ]));

    let target = match app.evaluation_target() {
        Some(p) => format!("< {} > {} ({})", p.acronym, truncate_text(&p.signification, 50), p.cellule),
        None => "-".to_string(),
    };
    if form.focus == EvaluationFocus::Proposal {
        focused_line = lines.len();
    }
    lines.push(Line::from(vec![
        Span::styled("Proposal   ", label_style(EvaluationFocus::Proposal)),
        Span::raw(target),
    ]));

    for dimension in Dimension::ALL {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} ({}%)", dimension.label(), dimension.percent()),
            theme.header_style,
        )));
        for criterion in dimension.criteria() {
            let i = criterion.index();
            let focus = EvaluationFocus::Criterion(i);
            if form.focus == focus {
                focused_line = lines.len();
            }
            let value = form.scores[i];
            let mut spans = vec![Span::styled(
                format!("  {:<32}", criterion.label()),
                label_style(focus),
            )];
            spans.extend(value_bar(theme, value as f64, MAX_SCORE as f64, MAX_SCORE as usize).spans);
            spans.push(Span::raw(format!(" {}", value)));
            lines.push(Line::from(spans));
        }
    }

    lines.push(Line::from(""));
    let preview = match app.preview_score() {
        Some(score) => Span::styled(
            format_score(score),
            Style::default().fg(final_score_color(theme, score)).bold(),
        ),
        None => Span::styled("-", Style::default().fg(theme.muted)),
    };
    lines.push(Line::from(vec![Span::raw("Score      "), preview]));

    if !editing {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press 'e' or Enter to start editing",
            Style::default().fg(theme.muted),
        )));
    }

    // Keep the focused row on screen
    let visible = area.height.saturating_sub(1) as usize;
    let offset = focused_line.saturating_sub(visible) as u16;

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().title(Span::styled(" Evaluation ", theme.popup_title)))
            .scroll((offset, 0)),
        area,
    );
}

fn render_results(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.theme.clone();
    let ranking = app.ranking();

    if ranking.is_empty() {
        let empty_msg = Paragraph::new("No evaluations yet")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.muted));
        frame.render_widget(empty_msg, area);
        return;
    }

    let chunks = if area.width >= 90 {
        Layout::horizontal([Constraint::Fill(3), Constraint::Fill(2)]).split(area)
    } else {
        Layout::vertical([Constraint::Fill(1), Constraint::Length(9)]).split(area)
    };

    let rows: Vec<Row> = ranking
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let color = final_score_color(&theme, entry.mean_score);
            let mut score_spans = vec![Span::styled(
                format!("{:>5} ", format_score(entry.mean_score)),
                Style::default().fg(color),
            )];
            score_spans.extend(
                value_bar(
                    &theme,
                    entry.mean_score - MIN_FINAL_SCORE,
                    MAX_FINAL_SCORE - MIN_FINAL_SCORE,
                    8,
                )
                .spans,
            );

            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(Line::from(score_spans)),
                Cell::from(entry.evaluation_count.to_string()),
                Cell::from(entry.acronym.clone()).style(Style::default().bold()),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(15),
        Constraint::Length(6),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Score", "Evals", "Acronym"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, chunks[0], &mut app.results_state);
    render_breakdown(frame, chunks[1], app);
}

/// Per-dimension means of the selected acronym, on a fixed 0..5 axis.
fn render_breakdown(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let Some((acronym, breakdown)) = app.selected_breakdown() else {
        return;
    };

    let block = Block::bordered()
        .title(Span::styled(format!(" {} ", acronym), theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bar_width = (inner.width as usize).saturating_sub(22).clamp(5, 20);
    let mut lines: Vec<Line> = breakdown
        .values()
        .iter()
        .map(|(dimension, value)| {
            let (filled, empty) = dimension_bar(*value, bar_width);
            let color = theme.score_color(*value, MAX_SCORE as f64);
            Line::from(vec![
                Span::raw(format!("{:<14}", dimension.label())),
                Span::styled("█".repeat(filled), Style::default().fg(color)),
                Span::styled("░".repeat(empty), Style::default().fg(theme.bar_empty)),
                Span::raw(format!(" {:.2}", value)),
            ])
        })
        .collect();

    let count = app.session.evaluations_for(&acronym).len();
    let source = match app.session.policy().detail_view {
        DetailView::First if count > 1 => format!("first of {} evaluations", count),
        DetailView::First => "single evaluation".to_string(),
        DetailView::Average => format!("average of {} evaluations", count),
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(source, Style::default().fg(theme.muted))));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, kind, _)) = app.flash_message {
        let color = match kind {
            FlashKind::Success => theme.flash_success,
            FlashKind::Error => theme.flash_error,
            FlashKind::Info => theme.status_key_color,
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(color)))
    } else {
        let hints: &[(&str, &str)] = match (app.input_mode, app.current_view) {
            (InputMode::ProposalForm, _) => &[
                ("Tab", ":field "),
                ("←/→", ":cellule "),
                ("Enter", ":save "),
                ("Esc", ":cancel"),
            ],
            (InputMode::EvaluationForm, _) => &[
                ("↑/↓", ":field "),
                ("←/→", ":adjust "),
                ("1-5", ":set "),
                ("Enter", ":submit "),
                ("Esc", ":cancel"),
            ],
            (_, View::Proposals) | (_, View::Results) => &[
                ("j/k", ":nav "),
                ("a", ":propose "),
                ("e", ":evaluate "),
                ("Tab", ":view "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
            _ => &[
                ("a", ":propose "),
                ("e", ":evaluate "),
                ("Tab", ":view "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

/// Final scores span 100..500; color them on that range.
fn final_score_color(theme: &ThemeColors, score: f64) -> Color {
    theme.score_color(score - MIN_FINAL_SCORE, MAX_FINAL_SCORE - MIN_FINAL_SCORE)
}

fn value_bar(theme: &ThemeColors, value: f64, max: f64, width: usize) -> Line<'static> {
    let ratio = if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    let color = theme.score_color(value, max);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled("█".repeat(filled), Style::default().fg(color)));
    }
    if empty > 0 {
        spans.push(Span::styled("░".repeat(empty), Style::default().fg(theme.bar_empty)));
    }
    Line::from(spans)
}

fn render_proposal_popup(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup_area = centered_rect_fixed(64, 8, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" New Proposal ", theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let form = &app.proposal_form;
    let field = |label: &'static str, field: ProposalField, value: String| {
        let focused = form.focus == field;
        let style = if focused {
            theme.focus_style
        } else {
            Style::default()
        };
        let value = if focused && field != ProposalField::Cellule {
            format!("{}|", value)
        } else {
            value
        };
        Line::from(vec![Span::styled(label, style), Span::raw(value)])
    };

    let lines = vec![
        field("Acronym        ", ProposalField::Acronym, form.acronym.clone()),
        field(
            "Signification  ",
            ProposalField::Signification,
            truncate_text(&form.signification, 46),
        ),
        field(
            "Cellule        ",
            ProposalField::Cellule,
            format!("< {} >", form.cellule),
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Tab: next field | Enter: save | Esc: cancel",
            Style::default().fg(theme.muted),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let popup_area = centered_rect_fixed(54, 17, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = theme.focus_style;
    let entries = [
        ("Tab / S-Tab   ", "Next / previous view"),
        ("1-4           ", "Jump to a view"),
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("a             ", "Propose an acronym"),
        ("e / Enter     ", "Evaluate (selected) proposal"),
        ("Left / Right  ", "Adjust slider or choice"),
        ("1-5           ", "Set the focused slider"),
        ("Esc           ", "Cancel form"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, action)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::Session;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        App::new(Session::default(), Config::default(), ThemeColors::dark())
    }

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_rect_fixed(40, 4, area);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.y, 3);
    }

    #[test]
    fn test_value_bar_scales() {
        let theme = ThemeColors::dark();
        let full = value_bar(&theme, 5.0, 5.0, 5);
        assert_eq!(full.spans.len(), 1);
        let half_final = value_bar(&theme, 200.0, 400.0, 8);
        assert_eq!(half_final.spans[0].content, "████");
    }

    #[test]
    fn test_small_terminal_message() {
        let mut app = app();
        let screen = render(&mut app, 30, 5);
        assert!(screen.contains("Terminal too small"));
    }

    #[test]
    fn test_home_and_results_render() {
        let mut app = app();
        app.session
            .add_proposal("EDSR", "Entrepot de donnees", "Promotion")
            .unwrap();
        app.session.add_evaluation("EDSR", "alice", &[4; 16]).unwrap();

        let home = render(&mut app, 100, 30);
        assert!(home.contains("Leading:"));
        assert!(home.contains("EDSR"));

        app.select_view(View::Results);
        let results = render(&mut app, 100, 30);
        assert!(results.contains("400"));
        assert!(results.contains("Functional"));
        assert!(results.contains("single evaluation"));
    }

    #[test]
    fn test_forms_render() {
        let mut app = app();
        app.start_proposal_form();
        let popup = render(&mut app, 100, 30);
        assert!(popup.contains("New Proposal"));

        app.cancel_form();
        app.session.add_proposal("CARE", "x", "Investigation").unwrap();
        app.select_view(View::Evaluate);
        app.start_evaluation_form();
        let form = render(&mut app, 100, 40);
        assert!(form.contains("Ease of pronunciation"));
        assert!(form.contains("300"));
    }
}
