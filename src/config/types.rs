//! Configuration type definitions.

use crate::constants::{DEFAULT_K, DEFAULT_MAX_DISTANCE, DEFAULT_OUTPUT_PREFIX, DEFAULT_SIMILARITY};
use crate::store::Metric;
use serde::{Deserialize, Serialize};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default matching settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Default matching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Neighbors requested per detection, including itself.
    pub k: usize,

    /// Embedding distance metric.
    pub metric: Metric,

    /// Minimum cosine similarity for a match (cosine metric only).
    pub similarity: f32,

    /// Maximum raw distance for a match (l2 metric only).
    pub max_distance: f32,

    /// Rank identified and favorite matches first.
    pub prioritize: bool,

    /// Output formats.
    pub formats: Vec<OutputFormat>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            metric: Metric::Cosine,
            similarity: DEFAULT_SIMILARITY,
            max_distance: DEFAULT_MAX_DISTANCE,
            prioritize: true,
            formats: vec![OutputFormat::Json],
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File name prefix for review queue files.
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Review queue as a JSON document.
    Json,
    /// One CSV row per padded match.
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().ok(), Some(OutputFormat::Json));
        assert_eq!("CSV".parse::<OutputFormat>().ok(), Some(OutputFormat::Csv));
        assert!("parquet".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_defaults_config_default_values() {
        let defaults = DefaultsConfig::default();
        assert_eq!(defaults.k, 10);
        assert_eq!(defaults.metric, Metric::Cosine);
        assert_eq!(defaults.similarity, 0.7);
        assert!(defaults.prioritize);
        assert_eq!(defaults.formats, vec![OutputFormat::Json]);
    }
}
