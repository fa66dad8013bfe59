pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use app::{InputMode, View};

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.update_flash(),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    let stats = app.session.stats();
    tracing::debug!(
        proposals = stats.proposals,
        evaluations = stats.evaluations,
        "session closed"
    );

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Ctrl-c quits from anywhere, forms included
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,

            // View switching
            KeyCode::Tab => app.next_view(),
            KeyCode::BackTab => app.previous_view(),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                app.select_view(View::ALL[idx]);
            }

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

            // Forms
            KeyCode::Char('a') => app.start_proposal_form(),
            KeyCode::Char('e') => start_evaluation(app),
            KeyCode::Enter if matches!(app.current_view, View::Proposals | View::Evaluate) => {
                start_evaluation(app)
            }

            KeyCode::Char('?') => app.show_help(),

            _ => {}
        },
        InputMode::ProposalForm => match key.code {
            KeyCode::Enter => app.submit_proposal_form(),
            KeyCode::Esc => app.cancel_form(),
            KeyCode::Tab | KeyCode::Down => app.proposal_form_next_field(),
            KeyCode::BackTab | KeyCode::Up => app.proposal_form_previous_field(),
            KeyCode::Right => app.proposal_form_cycle(true),
            KeyCode::Left => app.proposal_form_cycle(false),
            KeyCode::Backspace => app.proposal_form_backspace(),
            KeyCode::Char(c) => app.proposal_form_input(c),
            _ => {}
        },
        InputMode::EvaluationForm => match key.code {
            KeyCode::Enter => app.submit_evaluation_form(),
            KeyCode::Esc => app.cancel_form(),
            KeyCode::Tab | KeyCode::Down => app.evaluation_form_down(),
            KeyCode::BackTab | KeyCode::Up => app.evaluation_form_up(),
            KeyCode::Right => app.evaluation_form_adjust(1),
            KeyCode::Left => app.evaluation_form_adjust(-1),
            KeyCode::Backspace => app.evaluation_form_backspace(),
            KeyCode::Char(c) => app.evaluation_form_input(c),
            _ => {}
        },
        InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}

fn start_evaluation(app: &mut App) {
    app.start_evaluation_form();
    if app.input_mode == InputMode::EvaluationForm {
        app.select_view(View::Evaluate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::scoring::Criterion;
    use crate::session::Session;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key_event(app, key(KeyCode::Char(c)));
        }
    }

    fn app() -> App {
        App::new(Session::default(), Config::default(), ThemeColors::dark())
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = self::app();
        app.start_proposal_form();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_q_is_text_inside_forms() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        type_str(&mut app, "QUAD");
        assert!(!app.should_quit);
        assert_eq!(app.proposal_form.acronym, "QUAD");
    }

    #[test]
    fn test_number_keys_select_views() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('4')));
        assert_eq!(app.current_view, View::Results);
        handle_key_event(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.current_view, View::Proposals);
        handle_key_event(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.current_view, View::Home);
    }

    #[test]
    fn test_full_keyboard_flow() {
        let mut app = app();

        // Propose
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        type_str(&mut app, "EDSR");
        handle_key_event(&mut app, key(KeyCode::Tab));
        type_str(&mut app, "Entrepot");
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.session.proposals().len(), 1);

        // Evaluate from the proposals view
        handle_key_event(&mut app, key(KeyCode::Char('2')));
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.current_view, View::Evaluate);
        assert_eq!(app.input_mode, InputMode::EvaluationForm);
        type_str(&mut app, "carol");
        handle_key_event(&mut app, key(KeyCode::Down));
        handle_key_event(&mut app, key(KeyCode::Down));
        type_str(&mut app, "5");
        handle_key_event(&mut app, key(KeyCode::Enter));

        let evaluations = app.session.evaluations();
        assert_eq!(evaluations.len(), 1);
        assert_eq!(evaluations[0].evaluator, "carol");
        assert_eq!(evaluations[0].criteria.get(Criterion::Pronunciation), 5);

        // Help swallows the next key
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert_eq!(app.input_mode, InputMode::Help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_evaluate_without_proposals_stays_put() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('e')));
        assert_eq!(app.current_view, View::Home);
        assert_eq!(app.input_mode, InputMode::Normal);
    }
}
