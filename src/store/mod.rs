//! Contracts for the storage collaborators the matching engine reads from,
//! plus in-memory implementations used by the CLI and tests.
//!
//! The engine only ever reads through these traits. Production hosts plug
//! in their own database and vector index; [`MemoryIndex`] and
//! [`MemoryDetectionStore`] cover batch use from CSV tables.

mod memory;
mod metric;

pub use memory::{MemoryDetectionStore, MemoryIndex};
pub use metric::{Metric, cosine_distance, l2_distance};

use crate::error::Result;
use crate::matching::{DetectionId, DetectionLookup, NeighborCandidate};

/// Nearest-neighbor search over per-detection embeddings.
///
/// Implementations must be safe for concurrent reads (Send + Sync).
pub trait VectorIndex: Send + Sync {
    /// Return up to `k` nearest neighbors of `id` ordered by ascending distance.
    ///
    /// The first element is the query itself at distance 0. Returns
    /// `Ok(None)` when no embedding is stored for `id`.
    fn knn(&self, id: DetectionId, k: usize) -> Result<Option<Vec<NeighborCandidate>>>;

    /// Number of indexed embeddings.
    fn len(&self) -> usize;

    /// True if the index holds no embeddings.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read access to per-detection attributes.
pub trait DetectionStore: Send + Sync {
    /// Fetch attributes for the given ids. Unknown ids are absent from the result.
    fn bulk_attributes(&self, ids: &[DetectionId]) -> Result<DetectionLookup>;
}
