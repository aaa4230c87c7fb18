//! Expansion of matches into their full capture groups.

use crate::matching::{DetectionId, DetectionLookup, MatchMap, NeighborCandidate, SequenceGrouping};
use std::collections::HashSet;

/// Expand every ranked match into all detections of its capture sequence.
///
/// A lower-ranked match that belongs to the same capture sequence as an
/// earlier match is removed, so each capture event appears once. Every
/// expanded entry carries the distance of the match it came from.
pub fn pad(mut map: MatchMap, grouping: &SequenceGrouping, lookup: &DetectionLookup) -> MatchMap {
    for candidates in map.lists_mut() {
        *candidates = pad_candidates(candidates, grouping, lookup);
    }
    map
}

fn pad_candidates(
    candidates: &[NeighborCandidate],
    grouping: &SequenceGrouping,
    lookup: &DetectionLookup,
) -> Vec<NeighborCandidate> {
    let groups: Vec<Vec<DetectionId>> = candidates
        .iter()
        .map(|c| sibling_group(c.id, grouping, lookup))
        .collect();

    let mut shadowed = HashSet::new();
    for (i, group) in groups.iter().enumerate() {
        for later in &candidates[i + 1..] {
            if group.contains(&later.id) {
                shadowed.insert(later.id);
            }
        }
    }

    candidates
        .iter()
        .zip(&groups)
        .filter(|(anchor, _)| !shadowed.contains(&anchor.id))
        .flat_map(|(anchor, group)| {
            group
                .iter()
                .map(|&id| NeighborCandidate::new(id, anchor.distance))
        })
        .collect()
}

/// The anchor followed by the other members of its capture sequence.
///
/// Detections without a known sequence form a group of one.
fn sibling_group(
    anchor: DetectionId,
    grouping: &SequenceGrouping,
    lookup: &DetectionLookup,
) -> Vec<DetectionId> {
    let members = lookup
        .get(&anchor)
        .and_then(|d| d.sequence_id)
        .and_then(|sequence_id| grouping.members(sequence_id))
        .unwrap_or_default();

    std::iter::once(anchor)
        .chain(members.iter().copied().filter(|&id| id != anchor))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::Detection;

    fn c(id: i64, distance: f32) -> NeighborCandidate {
        NeighborCandidate::new(id, distance)
    }

    fn fixture() -> (SequenceGrouping, DetectionLookup) {
        let detections = vec![
            Detection::new(1).in_sequence(100),
            Detection::new(2).in_sequence(100),
            Detection::new(3).in_sequence(100),
            Detection::new(4).in_sequence(200),
            Detection::new(5),
        ];
        let grouping = SequenceGrouping::from_detections(&detections);
        let lookup = detections.into_iter().map(|d| (d.id, d)).collect();
        (grouping, lookup)
    }

    #[test]
    fn test_expands_to_capture_group_with_anchor_distance() {
        let (grouping, lookup) = fixture();
        let map: MatchMap = [(9, vec![c(2, 0.3)])].into_iter().collect();

        let padded = pad(map, &grouping, &lookup);
        assert_eq!(
            padded.get(9).unwrap_or_default(),
            &[c(2, 0.3), c(1, 0.3), c(3, 0.3)]
        );
    }

    #[test]
    fn test_later_sibling_anchor_removed() {
        let (grouping, lookup) = fixture();
        let map: MatchMap = [(9, vec![c(1, 0.1), c(4, 0.2), c(3, 0.4)])]
            .into_iter()
            .collect();

        let padded = pad(map, &grouping, &lookup);
        assert_eq!(
            padded.get(9).unwrap_or_default(),
            &[c(1, 0.1), c(2, 0.1), c(3, 0.1), c(4, 0.2)]
        );
    }

    #[test]
    fn test_unsequenced_candidate_expands_to_itself() {
        let (grouping, lookup) = fixture();
        let map: MatchMap = [(9, vec![c(5, 0.2)]), (8, vec![c(77, 0.5)])]
            .into_iter()
            .collect();

        let padded = pad(map, &grouping, &lookup);
        assert_eq!(padded.get(9).unwrap_or_default(), &[c(5, 0.2)]);
        assert_eq!(padded.get(8).unwrap_or_default(), &[c(77, 0.5)]);
    }

    #[test]
    fn test_padding_keeps_ids_unique() {
        let (grouping, lookup) = fixture();
        let map: MatchMap = [(9, vec![c(3, 0.1), c(2, 0.2), c(1, 0.3), c(4, 0.4)])]
            .into_iter()
            .collect();

        let padded = pad(map, &grouping, &lookup);
        let list = padded.get(9).unwrap_or_default();
        let unique: HashSet<_> = list.iter().map(|c| c.id).collect();
        assert_eq!(unique.len(), list.len());
        assert_eq!(list.len(), 4);
    }
}
