use chrono::Duration;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::proposals::Proposal;
use crate::report::{DimensionBreakdown, RankingEntry};
use crate::scoring::{ScoreResult, MAX_SCORE};

/// Width of the dimension bars; the axis always spans 0..=5.
const BAR_WIDTH: usize = 20;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a final or mean score with one decimal, dropping a trailing ".0"
/// ("300", "287.5").
pub fn format_score(score: f64) -> String {
    let formatted = format!("{:.1}", score);
    match formatted.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => formatted,
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
pub fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the ranking as a table: index, mean score, evaluation count, acronym.
/// Index column: 3 chars (fits "99."), right-aligned.
/// Score column: 7 chars, right-aligned.
pub fn format_ranking_table(entries: &[RankingEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No evaluations yet.".to_string();
    }

    let term_width = get_terminal_width();
    let score_width = 7;
    let count_width = 5;
    let separator = "  ";
    let fixed_width = 3 + 1 + score_width + count_width + separator.len() * 2;

    let header = format!(
        "{:>3} {:>sw$}{}{:>cw$}{}{}",
        "#",
        "Score",
        separator,
        "Evals",
        separator,
        "Acronym",
        sw = score_width,
        cw = count_width
    );
    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };

    let rows = entries.iter().enumerate().map(|(idx, entry)| {
        let index_str = format!("{:>2}.", idx + 1);
        let score_padded = format!("{:>width$}", format_score(entry.mean_score), width = score_width);
        let count_padded = format!("{:>width$}", entry.evaluation_count, width = count_width);

        let acronym = match term_width {
            Some(width) if width > fixed_width + 10 => {
                truncate_text(&entry.acronym, width - fixed_width)
            }
            Some(_) => truncate_text(&entry.acronym, 20),
            None => entry.acronym.clone(),
        };

        if use_colors {
            format!(
                "{} {}{}{}{}{}",
                index_str.dimmed(),
                score_padded.bold(),
                separator,
                count_padded.dimmed(),
                separator,
                acronym.cyan()
            )
        } else {
            format!(
                "{} {}{}{}{}{}",
                index_str, score_padded, separator, count_padded, separator, acronym
            )
        }
    });

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the ranking as tab-separated values for scripting
/// Columns: acronym, mean score, evaluation count (no headers, no colors)
pub fn format_ranking_tsv(entries: &[RankingEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}\t{:.2}\t{}",
                entry.acronym, entry.mean_score, entry.evaluation_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty JSON for any reportable value.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Horizontal bar for a value on the fixed 0..=5 axis.
pub fn dimension_bar(value: f64, width: usize) -> (usize, usize) {
    let ratio = (value / MAX_SCORE as f64).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    (filled, width.saturating_sub(filled))
}

/// Five-row bar view of a dimension breakdown.
pub fn format_breakdown(acronym: &str, breakdown: &DimensionBreakdown, use_colors: bool) -> String {
    let mut lines = vec![if use_colors {
        acronym.bold().to_string()
    } else {
        acronym.to_string()
    }];

    for (dimension, value) in breakdown.values() {
        let (filled, empty) = dimension_bar(value, BAR_WIDTH);
        let bar = if use_colors {
            format!("{}{}", "█".repeat(filled).green(), "░".repeat(empty).dimmed())
        } else {
            format!("{}{}", "█".repeat(filled), "░".repeat(empty))
        };
        lines.push(format!("  {:<14}{} {:.2}", dimension.label(), bar, value));
    }

    lines.join("\n")
}

/// Final score of one criterion set with each dimension's share.
pub fn format_score_result(result: &ScoreResult, use_colors: bool) -> String {
    let total = format!("Score: {}", format_score(result.score));
    let mut lines = vec![if use_colors {
        total.bold().to_string()
    } else {
        total
    }];

    for part in &result.breakdown.dimensions {
        lines.push(format!(
            "  {:<14}mean {:.2} x {:.2} -> {:>6.2}",
            part.dimension.label(),
            part.mean,
            part.weight,
            part.contribution
        ));
    }

    lines.join("\n")
}

/// One line per proposal: "{acronym} | {signification} | {cellule} | {age}"
pub fn format_proposal_list(proposals: &[Proposal], use_colors: bool) -> String {
    if proposals.is_empty() {
        return "No proposals yet.".to_string();
    }

    proposals
        .iter()
        .map(|p| {
            let age = format_age(p.age());
            if use_colors {
                format!(
                    "{} | {} | {} | {}",
                    p.acronym.bold(),
                    p.signification,
                    p.cellule.as_str().yellow(),
                    age.dimmed()
                )
            } else {
                format!("{} | {} | {} | {}", p.acronym, p.signification, p.cellule, age)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposals::Cellule;
    use crate::scoring::calculate_score;
    use chrono::Utc;

    fn entry(acronym: &str, mean_score: f64, evaluation_count: usize) -> RankingEntry {
        RankingEntry {
            acronym: acronym.to_string(),
            mean_score,
            evaluation_count,
        }
    }

    fn sample_proposal() -> Proposal {
        Proposal {
            acronym: "EDSR".to_string(),
            signification: "Entrepôt de Données de Santé Recherche".to_string(),
            cellule: Cellule::Methodologie,
            created_at: Utc::now() - Duration::hours(5),
        }
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(300.0), "300");
        assert_eq!(format_score(287.5), "287.5");
        assert_eq!(format_score(233.333333), "233.3");
        assert_eq!(format_score(499.96), "500");
    }

    #[test]
    fn test_ranking_table_empty() {
        assert_eq!(format_ranking_table(&[], false), "No evaluations yet.");
    }

    #[test]
    fn test_ranking_table_rows() {
        let entries = vec![entry("EDSR", 300.0, 2), entry("CARE", 187.5, 1)];
        let result = format_ranking_table(&entries, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Score"));
        assert!(lines[0].contains("Acronym"));
        assert!(lines[1].starts_with(" 1."));
        assert!(lines[1].contains("300"));
        assert!(lines[1].contains("EDSR"));
        assert!(lines[2].starts_with(" 2."));
        assert!(lines[2].contains("187.5"));
        assert!(lines[2].contains("CARE"));
    }

    #[test]
    fn test_ranking_tsv() {
        let entries = vec![entry("EDSR", 300.0, 2), entry("CARE", 187.5, 1)];
        assert_eq!(
            format_ranking_tsv(&entries),
            "EDSR\t300.00\t2\nCARE\t187.50\t1"
        );
        assert_eq!(format_ranking_tsv(&[]), "");
    }

    #[test]
    fn test_ranking_json_shape() {
        let entries = vec![entry("EDSR", 300.0, 2)];
        let json: serde_json::Value =
            serde_json::from_str(&format_json(&entries).unwrap()).unwrap();
        assert_eq!(json[0]["acronym"], "EDSR");
        assert_eq!(json[0]["mean_score"], 300.0);
        assert_eq!(json[0]["evaluation_count"], 2);
    }

    #[test]
    fn test_dimension_bar_fixed_axis() {
        assert_eq!(dimension_bar(5.0, 20), (20, 0));
        assert_eq!(dimension_bar(0.0, 20), (0, 20));
        assert_eq!(dimension_bar(2.5, 20), (10, 10));
        assert_eq!(dimension_bar(7.0, 10), (10, 0));
    }

    #[test]
    fn test_format_breakdown() {
        let breakdown = DimensionBreakdown {
            functional: 4.0,
            scientific: 2.0,
            identity: 2.0,
            communication: 2.0,
            technical: 2.0,
        };
        let result = format_breakdown("EDSR", &breakdown, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "EDSR");
        assert!(lines[1].contains("Functional"));
        assert!(lines[1].ends_with("4.00"));
        assert!(lines[5].contains("Technical"));
        assert!(lines[5].ends_with("2.00"));
    }

    #[test]
    fn test_format_score_result() {
        let result = calculate_score(&[3; 16]).unwrap();
        let text = format_score_result(&result, false);
        assert!(text.starts_with("Score: 300"));
        assert!(text.contains("Functional"));
        assert!(text.contains("Technical"));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn test_format_proposal_list() {
        assert_eq!(format_proposal_list(&[], false), "No proposals yet.");
        let result = format_proposal_list(&[sample_proposal()], false);
        assert_eq!(
            result,
            "EDSR | Entrepôt de Données de Santé Recherche | Méthodologie | 5h"
        );
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Duration::hours(3)), "3h");
        assert_eq!(format_age(Duration::days(2)), "2d");
        assert_eq!(format_age(Duration::weeks(2)), "2w");
        assert_eq!(format_age(Duration::minutes(30)), "30m");
        assert_eq!(format_age(Duration::seconds(30)), "now");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Short", 20), "Short");
        assert_eq!(truncate_text("This is a very long title", 15), "This is a ve...");
        assert_eq!(truncate_text("Hello world", 3), "Hel");
    }
}
