use super::schema::Config;
use crate::scoring::{MAX_SCORE, MIN_SCORE};

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !(MIN_SCORE..=MAX_SCORE).contains(&config.default_score) {
        errors.push(format!(
            "default_score: must be between {} and {}, got {}",
            MIN_SCORE, MAX_SCORE, config.default_score
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
