//! Sequence-aware neighbor matching and review ranking.
//!
//! Each stage is a plain function over value types; [`MatchEngine`] owns the
//! only mutable state of a run and chains the stages together.

mod collector;
mod dedup;
mod engine;
mod filter;
mod padder;
mod ranker;
mod types;

pub use collector::collect_neighbors;
pub use dedup::dedup;
pub use engine::{
    CancellationToken, EngineEvent, MatchEngine, MatchHandle, MatchOutcome, MatchParams,
    RunState, spawn_match_run,
};
pub use filter::{filter_candidates, passes};
pub use padder::pad;
pub use ranker::{ReviewPriority, exclude_resolved, rank, working_pool};
pub use types::{
    Detection, DetectionId, DetectionLookup, IndividualId, MatchMap, NeighborCandidate,
    RankedOrder, SequenceGrouping, SequenceId,
};
