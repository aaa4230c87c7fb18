//! Application-wide constants.
//!
//! Defaults and limits for matching runs live here so the config layer,
//! the CLI and the engine agree on them.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "reida";

/// Default number of nearest neighbors requested per detection.
///
/// The first neighbor is always the query itself, so a value of 10
/// yields at most 9 candidates per detection.
pub const DEFAULT_K: usize = 10;

/// Smallest usable neighbor count (self plus one real neighbor).
pub const MIN_K: usize = 2;

/// Upper bound on the neighbor count to keep the per-sequence cross product
/// in the filter stage manageable.
pub const MAX_K: usize = 1000;

/// Default cosine similarity cutoff (0.0-1.0).
pub const DEFAULT_SIMILARITY: f32 = 0.7;

/// Default cutoff for raw L2 distances.
pub const DEFAULT_MAX_DISTANCE: f32 = 1.0;

/// Default prefix for output files.
pub const DEFAULT_OUTPUT_PREFIX: &str = "reida";

/// Largest progress value reported by the engine.
pub const PROGRESS_MAX: u8 = 100;

/// Output file extensions by format.
pub mod output_extensions {
    /// JSON review queue extension.
    pub const JSON: &str = ".matches.json";
    /// CSV review queue extension.
    pub const CSV: &str = ".matches.csv";
}

