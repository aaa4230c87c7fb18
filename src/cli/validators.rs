//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

/// Parse and validate a bounded float value.
///
/// # Arguments
///
/// * `s` - The string to parse
/// * `min` - Minimum allowed value (exclusive)
/// * `max` - Maximum allowed value (exclusive)
/// * `name` - Name of the parameter for error messages
pub fn parse_open_interval(s: &str, min: f32, max: f32, name: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(value > min && value < max) {
        return Err(format!(
            "{name} must be between {min} and {max} (exclusive), got {value}"
        ));
    }

    Ok(value)
}

/// Parse and validate a cosine similarity cutoff (0.0-1.0, exclusive).
pub fn parse_similarity(s: &str) -> Result<f32, String> {
    parse_open_interval(s, 0.0, 1.0, "similarity")
}

/// Parse and validate a raw distance cutoff (positive, finite).
pub fn parse_max_distance(s: &str) -> Result<f32, String> {
    parse_open_interval(s, 0.0, f32::INFINITY, "max distance")
}

/// Parse and validate the neighbor count.
pub fn parse_k(s: &str) -> Result<usize, String> {
    use crate::constants::{MAX_K, MIN_K};

    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid count"))?;

    if !(MIN_K..=MAX_K).contains(&value) {
        return Err(format!("k must be between {MIN_K} and {MAX_K}, got {value}"));
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_similarity_valid() {
        assert_eq!(parse_similarity("0.5").ok(), Some(0.5));
        assert_eq!(parse_similarity("0.99").ok(), Some(0.99));
    }

    #[test]
    fn test_parse_similarity_invalid() {
        assert!(parse_similarity("0.0").is_err());
        assert!(parse_similarity("1.0").is_err());
        assert!(parse_similarity("-0.1").is_err());
        assert!(parse_similarity("abc").is_err());
    }

    #[test]
    fn test_parse_max_distance() {
        assert_eq!(parse_max_distance("12.5").ok(), Some(12.5));
        assert!(parse_max_distance("0").is_err());
        assert!(parse_max_distance("inf").is_err());
        let err = parse_max_distance("x").unwrap_err();
        assert!(err.contains("not a valid number"));
    }

    #[test]
    fn test_parse_k() {
        assert_eq!(parse_k("2").ok(), Some(2));
        assert!(parse_k("1").is_err());
        assert!(parse_k("-3").is_err());
        let err = parse_k("100000").unwrap_err();
        assert!(err.contains("k must be between"));
    }
}
