//! Matching parameter resolution.

use crate::cli::MatchArgs;
use crate::config::types::Config;
use crate::error::Result;
use crate::matching::MatchParams;
use crate::store::Metric;

/// Fully resolved settings for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSettings {
    /// Metric the embeddings are compared with.
    pub metric: Metric,
    /// Engine parameters derived for that metric.
    pub params: MatchParams,
}

/// Distance threshold for a metric.
///
/// Cosine thresholds are configured as a similarity and converted with
/// `1 - similarity`; L2 thresholds are used as given.
pub fn threshold_for(metric: Metric, similarity: f32, max_distance: f32) -> f32 {
    match metric {
        Metric::Cosine => 1.0 - similarity,
        Metric::L2 => max_distance,
    }
}

/// Build match settings from CLI args and config file (CLI overrides config).
///
/// The result is validated, so invalid settings are reported before any
/// input is loaded.
pub fn build_match_settings(args: &MatchArgs, config: &Config) -> Result<MatchSettings> {
    let defaults = &config.defaults;

    let metric = args.metric.unwrap_or(defaults.metric);
    let similarity = args.similarity.unwrap_or(defaults.similarity);
    let max_distance = args.max_distance.unwrap_or(defaults.max_distance);

    let params = MatchParams {
        k: args.k.unwrap_or(defaults.k),
        threshold: threshold_for(metric, similarity, max_distance),
        prioritize: defaults.prioritize && !args.no_prioritize,
    };
    params.validate()?;

    Ok(MatchSettings { metric, params })
}
