//! Configuration validation.

use crate::config::Config;
use crate::constants::{MAX_K, MIN_K};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_defaults(config)?;
    validate_output(config)?;
    Ok(())
}

/// Validate default matching settings.
fn validate_defaults(config: &Config) -> Result<()> {
    let defaults = &config.defaults;

    if !(MIN_K..=MAX_K).contains(&defaults.k) {
        return Err(Error::ConfigValidation {
            message: format!(
                "k must be between {MIN_K} and {MAX_K}, got {}",
                defaults.k
            ),
        });
    }

    if !(defaults.similarity > 0.0 && defaults.similarity < 1.0) {
        return Err(Error::ConfigValidation {
            message: format!(
                "similarity must be between 0.0 and 1.0 (exclusive), got {}",
                defaults.similarity
            ),
        });
    }

    if !defaults.max_distance.is_finite() || defaults.max_distance <= 0.0 {
        return Err(Error::ConfigValidation {
            message: format!(
                "max_distance must be a positive number, got {}",
                defaults.max_distance
            ),
        });
    }

    if defaults.formats.is_empty() {
        return Err(Error::ConfigValidation {
            message: "at least one output format is required".to_string(),
        });
    }

    Ok(())
}

/// Validate output settings.
fn validate_output(config: &Config) -> Result<()> {
    if config.output.prefix.trim().is_empty() {
        return Err(Error::ConfigValidation {
            message: "output prefix must not be empty".to_string(),
        });
    }
    Ok(())
}
