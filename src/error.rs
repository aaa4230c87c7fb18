//! Error types for reida.

use std::path::PathBuf;

/// Result type alias for reida operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for reida.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Matching parameters rejected before a run was started.
    #[error("invalid matching parameters: {message}")]
    InvalidMatchParams {
        /// Description of the rejected parameter.
        message: String,
    },

    /// Failed to open or read an input table.
    #[error("failed to read input file '{path}'")]
    InputRead {
        /// Path to the input file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Input table content is malformed.
    #[error("invalid input in '{path}': {message}")]
    InvalidInput {
        /// Path to the input file.
        path: PathBuf,
        /// Description of the problem, including the line number.
        message: String,
    },

    /// Vector index lookup failed.
    #[error("vector index query for detection {id} failed: {reason}")]
    IndexQuery {
        /// Detection whose neighbors were requested.
        id: i64,
        /// Description of the failure.
        reason: String,
    },

    /// Embedding dimension differs from the rest of the index.
    #[error("embedding for detection {id} has dimension {got}, expected {want}")]
    DimensionMismatch {
        /// Detection whose embedding was rejected.
        id: i64,
        /// Dimension of the rejected embedding.
        got: usize,
        /// Dimension of the embeddings already indexed.
        want: usize,
    },

    /// Failed to write an output file.
    #[error("failed to write output file '{path}'")]
    OutputWrite {
        /// Path to the output file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}
