//! Neighbor collection for one capture sequence.

use crate::matching::{DetectionId, NeighborCandidate};
use crate::store::VectorIndex;
use tracing::{trace, warn};

/// Query the index for every member of a sequence and concatenate the results.
///
/// The query detection itself is dropped from each result, leaving at most
/// `k - 1` neighbors per member. Members without an embedding, or whose
/// lookup fails, contribute nothing. Duplicates across members are kept.
pub fn collect_neighbors(
    sequence: &[DetectionId],
    k: usize,
    index: &dyn VectorIndex,
) -> Vec<NeighborCandidate> {
    if k < 2 {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for &id in sequence {
        let neighbors = match index.knn(id, k) {
            Ok(Some(neighbors)) => neighbors,
            Ok(None) => {
                trace!("No embedding for detection {id}");
                continue;
            }
            Err(e) => {
                warn!("Neighbor lookup failed for detection {id}: {e}");
                continue;
            }
        };

        candidates.extend(
            neighbors
                .into_iter()
                .filter(|n| n.id != id)
                .take(k - 1),
        );
    }
    candidates
}
