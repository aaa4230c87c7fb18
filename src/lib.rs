//! Reida - camera-trap re-identification review tool.
//!
//! This crate ranks candidate matches between capture sequences using
//! per-detection embeddings, producing a review queue for confirming
//! individual animals.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod matching;
pub mod output;
pub mod store;

use clap::{CommandFactory, Parser};
use cli::{Cli, Command, MatchArgs};
use config::{
    Config, build_match_settings, config_file_path, load_default_config, save_default_config,
};
use matching::{CancellationToken, EngineEvent, RunState, SequenceGrouping, spawn_match_run};
use output::{ReviewQueue, write_outputs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use store::{MemoryDetectionStore, VectorIndex};
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for reida CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.matching.verbose, cli.matching.quiet);

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command);
    }

    let (Some(detections), Some(embeddings)) =
        (&cli.matching.detections, &cli.matching.embeddings)
    else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = load_default_config()?;
    config::validate_config(&config)?;

    match_tables(detections, embeddings, &cli.matching, &config)
}

/// Run matching over a detection table and an embedding table.
fn match_tables(
    detections_path: &Path,
    embeddings_path: &Path,
    args: &MatchArgs,
    config: &Config,
) -> Result<()> {
    use crate::output::progress;
    use std::time::Instant;

    let start = Instant::now();

    // Reject bad settings before touching the inputs
    let settings = build_match_settings(args, config)?;
    let formats = args
        .format
        .clone()
        .unwrap_or_else(|| config.defaults.formats.clone());
    let prefix = args
        .prefix
        .clone()
        .unwrap_or_else(|| config.output.prefix.clone());
    let output_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));

    info!("Loading detections: {}", detections_path.display());
    let detections = input::load_detections(detections_path)?;

    info!("Loading embeddings: {}", embeddings_path.display());
    let index = input::load_embeddings(embeddings_path, settings.metric)?;

    let grouping = SequenceGrouping::from_detections(&detections);
    let unsequenced = detections.iter().filter(|d| d.sequence_id.is_none()).count();
    let without_embedding = detections.iter().filter(|d| !index.contains(d.id)).count();
    info!(
        "Loaded {} detection(s) in {} sequence(s), {} embedding(s) ({} distance)",
        detections.len(),
        grouping.len(),
        index.len(),
        index.metric()
    );
    if unsequenced > 0 {
        info!("{unsequenced} detection(s) have no sequence and are only used as candidates");
    }
    if without_embedding > 0 {
        warn!("{without_embedding} detection(s) have no embedding and cannot be matched");
    }

    let grouping = Arc::new(grouping);
    let store = MemoryDetectionStore::new(detections);

    let progress_enabled = !args.quiet && !args.no_progress;
    let run_progress = progress::create_run_progress(grouping.len(), progress_enabled);

    let handle = spawn_match_run(
        Arc::clone(&grouping),
        Arc::new(index),
        Arc::new(store),
        settings.params,
        CancellationToken::new(),
    )?;

    // Ctrl+C stops the run at the next sequence boundary; partial results are kept
    let signal_token = handle.cancel_token();
    if let Err(e) = ctrlc::set_handler(move || signal_token.cancel()) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }

    let mut outcome = None;
    for event in handle.events() {
        match event {
            EngineEvent::Progress(percent) => {
                progress::set_progress(run_progress.as_ref(), percent);
            }
            EngineEvent::Finished(result) => outcome = Some(result),
        }
    }

    if let Err(e) = handle.join() {
        progress::finish_progress(run_progress, "Failed");
        return Err(e);
    }

    let outcome = outcome.ok_or_else(|| Error::Internal {
        message: "match run ended without a result".to_string(),
    })?;

    progress::finish_progress(
        run_progress,
        if outcome.state == RunState::Cancelled {
            "Cancelled"
        } else {
            "Complete"
        },
    );

    let queue = ReviewQueue::from_outcome(&outcome, &grouping, &settings);
    for path in write_outputs(&queue, &output_dir, &prefix, &formats)? {
        info!("Wrote {}", path.display());
    }

    let duration = start.elapsed().as_secs_f64();
    match outcome.state {
        RunState::Cancelled => warn!(
            "Cancelled: {}/{} sequence(s) processed, {} to review in {:.2}s (partial results)",
            outcome.sequences_processed,
            grouping.len(),
            queue.summary.sequences_matched,
            duration
        ),
        _ if !outcome.has_matches() => info!("Complete: no matches found in {duration:.2}s"),
        _ => info!(
            "Complete: {} sequence(s) to review, {} match(es) in {:.2}s",
            queue.summary.sequences_matched, queue.summary.total_matches, duration
        ),
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
    }
}

fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_default_config(&Config::default())?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext steps:");
                println!("  reida --detections rois.csv --embeddings embeddings.csv");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
