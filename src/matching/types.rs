//! Value types shared by the matching stages.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier of a detection (one annotated animal instance).
pub type DetectionId = i64;

/// Identifier of a capture sequence (burst of detections from one event).
pub type SequenceId = i64;

/// Identifier of a confirmed individual animal.
pub type IndividualId = i64;

/// Attribute lookup keyed by detection id.
pub type DetectionLookup = HashMap<DetectionId, Detection>;

/// Sequence-level review priority for one run, highest priority first.
pub type RankedOrder = Vec<SequenceId>;

/// A single annotated animal instance and the attributes matching depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// Unique detection id.
    pub id: DetectionId,
    /// Capture sequence this detection belongs to, if grouped.
    pub sequence_id: Option<SequenceId>,
    /// Confirmed individual, if a reviewer has identified it.
    pub individual_id: Option<IndividualId>,
    /// Observed orientation label (e.g. "left", "right").
    pub viewpoint: Option<String>,
    /// Flagged as a favorite by a reviewer.
    pub favorite: bool,
}

impl Detection {
    /// Create an unidentified, unsequenced detection.
    pub fn new(id: DetectionId) -> Self {
        Self {
            id,
            sequence_id: None,
            individual_id: None,
            viewpoint: None,
            favorite: false,
        }
    }

    /// Set the capture sequence.
    #[must_use]
    pub fn in_sequence(mut self, sequence_id: SequenceId) -> Self {
        self.sequence_id = Some(sequence_id);
        self
    }

    /// Set the confirmed individual.
    #[must_use]
    pub fn identified_as(mut self, individual_id: IndividualId) -> Self {
        self.individual_id = Some(individual_id);
        self
    }

    /// Set the viewpoint label.
    #[must_use]
    pub fn with_viewpoint(mut self, viewpoint: impl Into<String>) -> Self {
        self.viewpoint = Some(viewpoint.into());
        self
    }

    /// Flag as favorite.
    #[must_use]
    pub fn favorited(mut self) -> Self {
        self.favorite = true;
        self
    }

    /// Whether a reviewer has already confirmed this detection's identity.
    pub fn is_identified(&self) -> bool {
        self.individual_id.is_some()
    }
}

/// A neighbor returned by the vector index, paired with its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeighborCandidate {
    /// Candidate detection id.
    #[serde(rename = "detection_id")]
    pub id: DetectionId,
    /// Non-negative distance in the configured metric.
    pub distance: f32,
}

impl NeighborCandidate {
    /// Create a candidate.
    pub const fn new(id: DetectionId, distance: f32) -> Self {
        Self { id, distance }
    }
}

/// Candidate lists keyed by query sequence.
///
/// Insertion order is significant: within a list it is the review priority
/// of the matches, and the order of the lists is the order sequences were
/// stored (or ranked) in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchMap {
    entries: Vec<(SequenceId, Vec<NeighborCandidate>)>,
    positions: HashMap<SequenceId, usize>,
}

impl MatchMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the candidate list for a sequence, replacing any previous list.
    pub fn insert(&mut self, sequence_id: SequenceId, candidates: Vec<NeighborCandidate>) {
        if let Some(&pos) = self.positions.get(&sequence_id) {
            self.entries[pos].1 = candidates;
        } else {
            self.positions.insert(sequence_id, self.entries.len());
            self.entries.push((sequence_id, candidates));
        }
    }

    /// Candidate list for a sequence.
    pub fn get(&self, sequence_id: SequenceId) -> Option<&[NeighborCandidate]> {
        self.positions
            .get(&sequence_id)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    /// Number of sequences with a stored list.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no sequence has a stored list.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sequence ids in stored order.
    pub fn sequence_ids(&self) -> Vec<SequenceId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    /// Iterate over `(sequence_id, candidates)` in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (SequenceId, &[NeighborCandidate])> {
        self.entries
            .iter()
            .map(|(id, candidates)| (*id, candidates.as_slice()))
    }

    /// Total number of candidates across all sequences.
    pub fn total_candidates(&self) -> usize {
        self.entries.iter().map(|(_, c)| c.len()).sum()
    }

    /// Keep only the sequences for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(SequenceId, &[NeighborCandidate]) -> bool) {
        self.entries.retain(|(id, candidates)| keep(*id, candidates));
        self.reindex();
    }

    pub(crate) fn lists_mut(&mut self) -> impl Iterator<Item = &mut Vec<NeighborCandidate>> {
        self.entries.iter_mut().map(|(_, candidates)| candidates)
    }

    /// Stable-sort the sequences by a key computed from their lists.
    pub(crate) fn sort_sequences_by_key<K: Ord>(
        &mut self,
        mut key: impl FnMut(&[NeighborCandidate]) -> K,
    ) {
        self.entries.sort_by_key(|(_, candidates)| key(candidates));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.positions = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, (id, _))| (*id, pos))
            .collect();
    }
}

impl FromIterator<(SequenceId, Vec<NeighborCandidate>)> for MatchMap {
    fn from_iter<I: IntoIterator<Item = (SequenceId, Vec<NeighborCandidate>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, candidates) in iter {
            map.insert(id, candidates);
        }
        map
    }
}

/// Upstream grouping of detections into capture sequences.
///
/// Sequences keep the order they were first seen in, members keep the
/// order they were added in.
#[derive(Debug, Clone, Default)]
pub struct SequenceGrouping {
    order: Vec<SequenceId>,
    members: HashMap<SequenceId, Vec<DetectionId>>,
}

impl SequenceGrouping {
    /// Create an empty grouping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the grouping from detection attributes.
    ///
    /// Detections without a sequence id are left out.
    pub fn from_detections<'a>(detections: impl IntoIterator<Item = &'a Detection>) -> Self {
        let mut grouping = Self::new();
        for detection in detections {
            if let Some(sequence_id) = detection.sequence_id {
                grouping.push(sequence_id, detection.id);
            }
        }
        grouping
    }

    /// Append a detection to a sequence, creating the sequence if needed.
    pub fn push(&mut self, sequence_id: SequenceId, detection_id: DetectionId) {
        self.members
            .entry(sequence_id)
            .or_insert_with(|| {
                self.order.push(sequence_id);
                Vec::new()
            })
            .push(detection_id);
    }

    /// Members of a sequence.
    pub fn members(&self, sequence_id: SequenceId) -> Option<&[DetectionId]> {
        self.members.get(&sequence_id).map(Vec::as_slice)
    }

    /// Iterate over `(sequence_id, members)` in input order.
    pub fn iter(&self) -> impl Iterator<Item = (SequenceId, &[DetectionId])> {
        self.order.iter().map(|id| {
            let members = self.members.get(id).map_or(&[][..], Vec::as_slice);
            (*id, members)
        })
    }

    /// Number of sequences.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if there are no sequences.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<(SequenceId, Vec<DetectionId>)> for SequenceGrouping {
    fn from_iter<I: IntoIterator<Item = (SequenceId, Vec<DetectionId>)>>(iter: I) -> Self {
        let mut grouping = Self::new();
        for (sequence_id, members) in iter {
            for detection_id in members {
                grouping.push(sequence_id, detection_id);
            }
        }
        grouping
    }
}
