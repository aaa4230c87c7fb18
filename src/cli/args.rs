//! CLI argument definitions.

use crate::cli::validators::{parse_k, parse_max_distance, parse_similarity};
use crate::config::OutputFormat;
use crate::store::Metric;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Rank camera-trap detections for individual re-identification review.
#[derive(Debug, Parser)]
#[command(name = "reida")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options for a matching run.
    #[command(flatten)]
    pub matching: MatchArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for a matching run.
#[derive(Debug, Args)]
pub struct MatchArgs {
    /// Detection attribute table (CSV).
    #[arg(short, long, requires = "embeddings", env = "REIDA_DETECTIONS")]
    pub detections: Option<PathBuf>,

    /// Embedding table (CSV: detection id followed by vector values).
    #[arg(short, long, requires = "detections", env = "REIDA_EMBEDDINGS")]
    pub embeddings: Option<PathBuf>,

    /// Neighbors per detection, including the detection itself.
    #[arg(short, long, value_parser = parse_k, env = "REIDA_K")]
    pub k: Option<usize>,

    /// Embedding distance metric.
    #[arg(long, value_enum, env = "REIDA_METRIC")]
    pub metric: Option<Metric>,

    /// Minimum cosine similarity for a match (0.0-1.0).
    #[arg(short, long, value_parser = parse_similarity, env = "REIDA_SIMILARITY")]
    pub similarity: Option<f32>,

    /// Maximum raw distance for a match (l2 metric).
    #[arg(long, value_parser = parse_max_distance, env = "REIDA_MAX_DISTANCE")]
    pub max_distance: Option<f32>,

    /// Order matches by distance only, ignoring identified and favorite detections.
    #[arg(long)]
    pub no_prioritize: bool,

    /// Output formats (comma-separated: json,csv).
    #[arg(short, long, value_delimiter = ',', env = "REIDA_FORMAT")]
    pub format: Option<Vec<OutputFormat>>,

    /// Output directory (default: current directory).
    #[arg(short, long, env = "REIDA_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output file name prefix.
    #[arg(long, env = "REIDA_PREFIX")]
    pub prefix: Option<String>,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_simple() {
        let cli = Cli::try_parse_from(["reida", "-d", "rois.csv", "-e", "emb.csv"]).unwrap();
        assert_eq!(cli.matching.detections, Some(PathBuf::from("rois.csv")));
        assert_eq!(cli.matching.embeddings, Some(PathBuf::from("emb.csv")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::try_parse_from([
            "reida",
            "-d",
            "rois.csv",
            "-e",
            "emb.csv",
            "-k",
            "5",
            "--metric",
            "l2",
            "--max-distance",
            "3.5",
            "--format",
            "json,csv",
            "--no-prioritize",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.matching.k, Some(5));
        assert_eq!(cli.matching.metric, Some(Metric::L2));
        assert_eq!(cli.matching.max_distance, Some(3.5));
        assert_eq!(
            cli.matching.format,
            Some(vec![OutputFormat::Json, OutputFormat::Csv])
        );
        assert!(cli.matching.no_prioritize);
        assert!(cli.matching.quiet);
    }

    #[test]
    fn test_cli_requires_both_tables() {
        assert!(Cli::try_parse_from(["reida", "-d", "rois.csv"]).is_err());
        assert!(Cli::try_parse_from(["reida", "-e", "emb.csv"]).is_err());
    }

    #[test]
    fn test_cli_rejects_out_of_range_values() {
        assert!(Cli::try_parse_from(["reida", "-d", "a", "-e", "b", "-k", "1"]).is_err());
        assert!(Cli::try_parse_from(["reida", "-d", "a", "-e", "b", "-s", "1.5"]).is_err());
    }

    #[test]
    fn test_cli_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["reida", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));
    }
}
