//! In-memory collaborators backed by plain collections.

use super::{DetectionStore, Metric, VectorIndex};
use crate::error::{Error, Result};
use crate::matching::{Detection, DetectionId, DetectionLookup, NeighborCandidate};
use std::collections::{BTreeMap, HashMap};

/// Exact nearest-neighbor index using brute-force distance computation.
///
/// Neighbors with equal distance are returned in ascending id order.
#[derive(Debug, Clone)]
pub struct MemoryIndex {
    metric: Metric,
    dimension: Option<usize>,
    vectors: BTreeMap<DetectionId, Vec<f32>>,
}

impl MemoryIndex {
    /// Create an empty index for the given metric.
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            dimension: None,
            vectors: BTreeMap::new(),
        }
    }

    /// Metric used for distance computation.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Add or replace the embedding for a detection.
    ///
    /// All embeddings must share the dimension of the first one inserted.
    pub fn insert(&mut self, id: DetectionId, vector: Vec<f32>) -> Result<()> {
        match self.dimension {
            Some(want) if want != vector.len() => {
                return Err(Error::DimensionMismatch {
                    id,
                    got: vector.len(),
                    want,
                });
            }
            Some(_) => {}
            None => self.dimension = Some(vector.len()),
        }
        self.vectors.insert(id, vector);
        Ok(())
    }

    /// True if an embedding is stored for `id`.
    pub fn contains(&self, id: DetectionId) -> bool {
        self.vectors.contains_key(&id)
    }
}

impl VectorIndex for MemoryIndex {
    fn knn(&self, id: DetectionId, k: usize) -> Result<Option<Vec<NeighborCandidate>>> {
        let Some(query) = self.vectors.get(&id) else {
            return Ok(None);
        };
        if k == 0 {
            return Ok(Some(Vec::new()));
        }

        let mut others: Vec<NeighborCandidate> = self
            .vectors
            .iter()
            .filter(|(other, _)| **other != id)
            .map(|(other, vector)| {
                let distance = self.metric.distance(query, vector);
                if distance.is_nan() {
                    return Err(Error::IndexQuery {
                        id,
                        reason: format!("distance to detection {other} is not a number"),
                    });
                }
                Ok(NeighborCandidate::new(*other, distance))
            })
            .collect::<Result<_>>()?;

        // Stable sort keeps id order for equal distances.
        others.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        others.truncate(k - 1);

        let mut result = Vec::with_capacity(others.len() + 1);
        result.push(NeighborCandidate::new(id, 0.0));
        result.extend(others);
        Ok(Some(result))
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

/// Attribute store holding every detection in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDetectionStore {
    detections: HashMap<DetectionId, Detection>,
}

impl MemoryDetectionStore {
    /// Build a store from detection records. Later duplicates replace earlier ones.
    pub fn new(detections: impl IntoIterator<Item = Detection>) -> Self {
        Self {
            detections: detections.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    /// Number of stored detections.
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// True if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

impl DetectionStore for MemoryDetectionStore {
    fn bulk_attributes(&self, ids: &[DetectionId]) -> Result<DetectionLookup> {
        Ok(ids
            .iter()
            .filter_map(|id| self.detections.get(id).map(|d| (*id, d.clone())))
            .collect())
    }
}
