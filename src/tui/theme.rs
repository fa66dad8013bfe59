//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

use crate::config::ThemeMode;

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Score-based colors (traffic light pattern, high is good here)
    pub score_high: Color,
    pub score_mid: Color,
    pub score_low: Color,
    pub bar_empty: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,
    pub focus_style: Style,

    // Tabs
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popups
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            score_high: Color::Green,
            score_mid: Color::Yellow,
            score_low: Color::Red,
            bar_empty: Color::DarkGray,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            focus_style: Style::new().fg(Color::Cyan).bold(),
            tab_active_style: Style::new().fg(Color::Cyan).bold().reversed(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
        }
    }

    pub fn light() -> Self {
        Self {
            score_high: Color::Rgb(0, 128, 0),
            score_mid: Color::Rgb(180, 120, 0),
            score_low: Color::Rgb(190, 0, 0),
            bar_empty: Color::Indexed(250),
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Indexed(244),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Indexed(242),
            title_color: Color::Blue,
            focus_style: Style::new().fg(Color::Blue).bold(),
            tab_active_style: Style::new().fg(Color::Blue).bold().reversed(),
            tab_inactive_style: Style::new().fg(Color::Indexed(244)),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 128, 0),
            flash_error: Color::Rgb(190, 0, 0),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
        }
    }

    /// Color for a value relative to the top of its scale
    pub fn score_color(&self, value: f64, max_value: f64) -> Color {
        let percentage = if max_value > 0.0 {
            (value / max_value) * 100.0
        } else {
            0.0
        };

        if percentage >= 70.0 {
            self.score_high
        } else if percentage >= 40.0 {
            self.score_mid
        } else {
            self.score_low
        }
    }
}

/// Pick the palette for a configured mode. `Auto` asks the terminal for its
/// background luminance and falls back to dark when it cannot tell.
pub fn resolve_theme(mode: ThemeMode) -> ThemeColors {
    match mode {
        ThemeMode::Dark => ThemeColors::dark(),
        ThemeMode::Light => ThemeColors::light(),
        ThemeMode::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            _ => ThemeColors::dark(),
        },
    }
}
