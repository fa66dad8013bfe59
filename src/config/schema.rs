use serde::{Deserialize, Serialize};

use crate::report::DetailView;
use crate::session::SessionPolicy;

/// Terminal color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Detect from the terminal background
    #[default]
    Auto,
    Dark,
    Light,
}

/// Application configuration.
///
/// Example YAML:
/// ```yaml
/// default_score: 3
/// strict_acronyms: false
/// detail_view: first
/// theme: auto
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Starting position of every slider in the evaluation form (1..=5)
    #[serde(default = "default_score")]
    pub default_score: i64,

    /// Reject evaluations of acronyms that were never proposed
    #[serde(default)]
    pub strict_acronyms: bool,

    /// Detail view source: the first evaluation, or an average of all of them
    #[serde(default)]
    pub detail_view: DetailView,

    #[serde(default)]
    pub theme: ThemeMode,
}

fn default_score() -> i64 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_score: default_score(),
            strict_acronyms: false,
            detail_view: DetailView::First,
            theme: ThemeMode::Auto,
        }
    }
}

impl Config {
    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            strict_acronyms: self.strict_acronyms,
            detail_view: self.detail_view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_score, 3);
        assert!(!config.strict_acronyms);
        assert_eq!(config.detail_view, DetailView::First);
        assert_eq!(config.theme, ThemeMode::Auto);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            default_score: 4,
            strict_acronyms: true,
            detail_view: DetailView::Average,
            theme: ThemeMode::Light,
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_parse() {
        let yaml = r#"
strict_acronyms: true
detail_view: average
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.default_score, 3);
        assert!(config.strict_acronyms);
        assert_eq!(config.detail_view, DetailView::Average);
        assert_eq!(config.theme, ThemeMode::Auto);
    }

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("weights: 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_session_policy_from_config() {
        let config = Config {
            strict_acronyms: true,
            detail_view: DetailView::Average,
            ..Config::default()
        };
        let policy = config.session_policy();
        assert!(policy.strict_acronyms);
        assert_eq!(policy.detail_view, DetailView::Average);
    }
}
