//! Match run orchestration.
//!
//! A run walks the query sequences in input order, collecting, deduplicating
//! and filtering neighbors for each one, then ranks and pads whatever it
//! accumulated. Cancellation is checked once per sequence boundary, so an
//! in-flight index query always completes.

use crate::constants::{MIN_K, PROGRESS_MAX};
use crate::error::{Error, Result};
use crate::matching::{
    Detection, DetectionId, DetectionLookup, MatchMap, NeighborCandidate, RankedOrder,
    ReviewPriority, SequenceGrouping, collect_neighbors, dedup, exclude_resolved,
    filter_candidates, pad, rank, working_pool,
};
use crate::store::{DetectionStore, VectorIndex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, channel};
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// Validated settings for one matching run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchParams {
    /// Neighbors requested per detection, including the detection itself.
    pub k: usize,
    /// Exclusive upper bound on candidate distance.
    pub threshold: f32,
    /// Rank identified and favorite matches ahead of closer ones.
    pub prioritize: bool,
}

impl MatchParams {
    /// Reject settings that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        if self.k < MIN_K {
            return Err(Error::InvalidMatchParams {
                message: format!("k must be at least {MIN_K}, got {}", self.k),
            });
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(Error::InvalidMatchParams {
                message: format!(
                    "distance threshold must be a positive number, got {}",
                    self.threshold
                ),
            });
        }
        Ok(())
    }
}

/// Cooperative cancellation flag shared between a run and its host.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Takes effect at the next sequence boundary.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Lifecycle state of a [`MatchEngine`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// No run has started.
    #[default]
    Idle,
    /// A run is processing sequences.
    Running,
    /// Every sequence was processed.
    Completed,
    /// The run stopped early; results cover only the sequences processed.
    Cancelled,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Result of a finished run.
///
/// An empty outcome is ambiguous on its own; check `state` to tell a
/// cancelled run from one that completed without finding matches.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// Terminal state of the run.
    pub state: RunState,
    /// Ranked and padded candidates per query sequence.
    pub matches: MatchMap,
    /// Query sequences in review order.
    pub ranked: RankedOrder,
    /// Number of sequences processed before the run ended.
    pub sequences_processed: usize,
}

impl MatchOutcome {
    /// True if at least one sequence has matches to review.
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Messages sent from a background run to its host.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Percentage of sequences processed (0-100), monotonically increasing.
    Progress(u8),
    /// The run ended.
    Finished(MatchOutcome),
}

/// Sequence-aware matching engine.
#[derive(Debug, Default)]
pub struct MatchEngine {
    state: RunState,
}

impl MatchEngine {
    /// Create an idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run matching over every sequence in `grouping`.
    ///
    /// `on_progress` receives the percentage of sequences processed after
    /// each one. If `cancel` fires, the sequences processed so far are still
    /// ranked and padded and the outcome is marked [`RunState::Cancelled`].
    pub fn run(
        &mut self,
        grouping: &SequenceGrouping,
        index: &dyn VectorIndex,
        store: &dyn DetectionStore,
        params: &MatchParams,
        cancel: &CancellationToken,
        mut on_progress: impl FnMut(u8),
    ) -> Result<MatchOutcome> {
        params.validate()?;
        self.state = RunState::Running;

        info!(
            "Matching {} sequence(s) against {} embedding(s) (k={}, threshold={:.3})",
            grouping.len(),
            index.len(),
            params.k,
            params.threshold
        );

        let total = grouping.len();
        let mut matches = MatchMap::new();
        let mut processed = 0;
        let mut cancelled = false;

        for (sequence_id, members) in grouping.iter() {
            if cancel.is_cancelled() {
                info!("Cancelled after {processed}/{total} sequence(s)");
                cancelled = true;
                break;
            }

            match match_sequence(members, index, store, params) {
                Ok(candidates) if !candidates.is_empty() => {
                    debug!(
                        "Sequence {sequence_id}: {} candidate(s)",
                        candidates.len()
                    );
                    matches.insert(sequence_id, candidates);
                }
                Ok(_) => debug!("Sequence {sequence_id}: no candidates"),
                Err(e) => warn!("Skipping sequence {sequence_id}: {e}"),
            }

            processed += 1;
            on_progress(progress_percent(processed, total));
        }

        let (matches, ranked) = if matches.is_empty() {
            (matches, RankedOrder::new())
        } else {
            match finalize(matches, grouping, store, params) {
                Ok(result) => result,
                Err(e) => {
                    self.state = RunState::Idle;
                    return Err(e);
                }
            }
        };

        self.state = if cancelled {
            RunState::Cancelled
        } else {
            RunState::Completed
        };

        info!(
            "Run {}: {} sequence(s) to review, {} candidate(s)",
            self.state,
            matches.len(),
            matches.total_candidates()
        );

        Ok(MatchOutcome {
            state: self.state,
            matches,
            ranked,
            sequences_processed: processed,
        })
    }
}

/// Collect, dedup, filter and re-dedup the candidates of one sequence.
fn match_sequence(
    members: &[DetectionId],
    index: &dyn VectorIndex,
    store: &dyn DetectionStore,
    params: &MatchParams,
) -> Result<Vec<NeighborCandidate>> {
    let neighbors = dedup(collect_neighbors(members, params.k, index));
    if neighbors.is_empty() {
        return Ok(neighbors);
    }

    let query_attrs = store.bulk_attributes(members)?;
    let queries: Vec<&Detection> = members.iter().filter_map(|id| query_attrs.get(id)).collect();

    let candidate_ids: Vec<DetectionId> = neighbors.iter().map(|c| c.id).collect();
    let candidate_attrs = store.bulk_attributes(&candidate_ids)?;

    let filtered = filter_candidates(&queries, &neighbors, &candidate_attrs, params.threshold);
    if filtered.is_empty() {
        return Ok(filtered);
    }
    Ok(dedup(filtered))
}

/// Drop resolved queries, rank, and pad.
fn finalize(
    matches: MatchMap,
    grouping: &SequenceGrouping,
    store: &dyn DetectionStore,
    params: &MatchParams,
) -> Result<(MatchMap, RankedOrder)> {
    let query_ids: Vec<DetectionId> = matches
        .sequence_ids()
        .into_iter()
        .filter_map(|id| grouping.members(id))
        .flatten()
        .copied()
        .collect();
    let query_attrs = store.bulk_attributes(&query_ids)?;
    let matches = exclude_resolved(matches, grouping, &query_attrs);

    let pool: DetectionLookup = store.bulk_attributes(&working_pool(&matches, grouping))?;
    let priority = ReviewPriority::from_pool(&pool);
    debug!(
        "Review pool: {} detection(s), {} identified, {} favorite",
        pool.len(),
        priority.identified.len(),
        priority.favorites.len()
    );

    let (ranked_map, order) = rank(matches, &priority, params.prioritize);
    Ok((pad(ranked_map, grouping, &pool), order))
}

fn progress_percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return PROGRESS_MAX;
    }
    u8::try_from(processed * usize::from(PROGRESS_MAX) / total).unwrap_or(PROGRESS_MAX)
}

/// Handle to a match run executing on a background thread.
pub struct MatchHandle {
    events: Receiver<EngineEvent>,
    cancel: CancellationToken,
    thread: JoinHandle<Result<()>>,
}

impl MatchHandle {
    /// Progress and completion events, in order.
    pub fn events(&self) -> &Receiver<EngineEvent> {
        &self.events
    }

    /// Token controlling this run, for sharing with signal handlers.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the run thread to exit and return its result.
    pub fn join(self) -> Result<()> {
        self.thread.join().map_err(|_| Error::Internal {
            message: "match thread panicked".to_string(),
        })?
    }
}

/// Start a match run on a dedicated thread.
///
/// Parameters are validated before the thread starts. Progress values and
/// the final [`MatchOutcome`] are delivered through [`MatchHandle::events`].
pub fn spawn_match_run(
    grouping: Arc<SequenceGrouping>,
    index: Arc<dyn VectorIndex>,
    store: Arc<dyn DetectionStore>,
    params: MatchParams,
    cancel: CancellationToken,
) -> Result<MatchHandle> {
    params.validate()?;

    let (tx, rx) = channel();
    let thread_cancel = cancel.clone();
    let thread = std::thread::Builder::new()
        .name("reida-match".to_string())
        .spawn(move || {
            let mut engine = MatchEngine::new();
            let outcome = engine.run(
                &grouping,
                index.as_ref(),
                store.as_ref(),
                &params,
                &thread_cancel,
                |pct| {
                    // Receiver may already be gone if the host stopped listening.
                    let _ = tx.send(EngineEvent::Progress(pct));
                },
            )?;
            let _ = tx.send(EngineEvent::Finished(outcome));
            Ok(())
        })?;

    Ok(MatchHandle {
        events: rx,
        cancel,
        thread,
    })
}
