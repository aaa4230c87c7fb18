//! Candidate deduplication.

use crate::matching::NeighborCandidate;
use std::collections::HashSet;

/// Collapse repeated candidate ids to their lowest-distance occurrence.
///
/// The output is sorted by ascending distance; equal distances keep their
/// input order.
pub fn dedup(mut candidates: Vec<NeighborCandidate>) -> Vec<NeighborCandidate> {
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let mut seen = HashSet::with_capacity(candidates.len());
    candidates.retain(|c| seen.insert(c.id));
    candidates
}
