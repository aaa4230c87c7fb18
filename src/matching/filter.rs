//! Validity rules for match candidates.

use crate::matching::{Detection, DetectionLookup, NeighborCandidate};
use tracing::trace;

/// Check whether `candidate` is a valid match for `query` at `distance`.
///
/// A pair is rejected when:
/// - both detections are confirmed as the same individual,
/// - both belong to the same capture sequence,
/// - the query's viewpoint is known and differs from the candidate's,
/// - the distance is zero or not below `threshold`.
pub fn passes(query: &Detection, candidate: &Detection, distance: f32, threshold: f32) -> bool {
    let identity_ok = query
        .individual_id
        .is_none_or(|individual| candidate.individual_id != Some(individual));

    let sequence_ok = query
        .sequence_id
        .is_none_or(|sequence| candidate.sequence_id != Some(sequence));

    let viewpoint_ok = query
        .viewpoint
        .as_ref()
        .is_none_or(|view| candidate.viewpoint.as_ref() == Some(view));

    let distance_ok = distance > 0.0 && distance < threshold;

    identity_ok && sequence_ok && viewpoint_ok && distance_ok
}

/// Keep the candidates that at least one query detection validates.
///
/// Every query is paired with every candidate, so a candidate accepted by
/// several queries appears several times; callers dedup the result.
/// Candidates without attributes in `lookup` cannot be validated and are
/// dropped.
pub fn filter_candidates(
    queries: &[&Detection],
    candidates: &[NeighborCandidate],
    lookup: &DetectionLookup,
    threshold: f32,
) -> Vec<NeighborCandidate> {
    let mut kept = Vec::new();
    for query in queries {
        for candidate in candidates {
            let Some(attrs) = lookup.get(&candidate.id) else {
                trace!("No attributes for candidate {}", candidate.id);
                continue;
            };
            if passes(query, attrs, candidate.distance, threshold) {
                kept.push(*candidate);
            }
        }
    }
    kept
}
