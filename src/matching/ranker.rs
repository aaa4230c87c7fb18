//! Review-priority ranking of query sequences and their matches.

use crate::matching::{
    DetectionId, DetectionLookup, MatchMap, NeighborCandidate, RankedOrder, SequenceGrouping,
};
use std::cmp::Reverse;
use std::collections::HashSet;

/// Detection ids that raise a match's review priority.
#[derive(Debug, Clone, Default)]
pub struct ReviewPriority {
    /// Detections already confirmed as a known individual.
    pub identified: HashSet<DetectionId>,
    /// Detections flagged as favorites.
    pub favorites: HashSet<DetectionId>,
}

impl ReviewPriority {
    /// Collect identified and favorite ids from a pool of detection attributes.
    pub fn from_pool(pool: &DetectionLookup) -> Self {
        let mut priority = Self::default();
        for detection in pool.values() {
            if detection.is_identified() {
                priority.identified.insert(detection.id);
            }
            if detection.favorite {
                priority.favorites.insert(detection.id);
            }
        }
        priority
    }
}

/// Drop every sequence that contains an already-identified detection.
///
/// Such sequences need no further review. Members missing from `lookup`
/// count as unidentified.
pub fn exclude_resolved(
    mut map: MatchMap,
    grouping: &SequenceGrouping,
    lookup: &DetectionLookup,
) -> MatchMap {
    map.retain(|sequence_id, _| {
        let members = grouping.members(sequence_id).unwrap_or_default();
        !members
            .iter()
            .any(|id| lookup.get(id).is_some_and(|d| d.is_identified()))
    });
    map
}

/// Detection ids referenced by a match map: query sequence members plus
/// every candidate.
pub fn working_pool(map: &MatchMap, grouping: &SequenceGrouping) -> Vec<DetectionId> {
    let mut seen = HashSet::new();
    let mut pool = Vec::new();
    for (sequence_id, candidates) in map.iter() {
        let members = grouping.members(sequence_id).unwrap_or_default();
        for id in members.iter().copied().chain(candidates.iter().map(|c| c.id)) {
            if seen.insert(id) {
                pool.push(id);
            }
        }
    }
    pool
}

/// Order each sequence's matches and rank the sequences for review.
///
/// With `prioritize` set and at least one identified detection in play,
/// matches are ordered identified first, then favorites, then by distance,
/// and sequences holding an identified match outrank those without (ties
/// broken by match count). Otherwise matches are ordered by distance and
/// sequences by match count. All sorts are stable.
pub fn rank(
    mut map: MatchMap,
    priority: &ReviewPriority,
    prioritize: bool,
) -> (MatchMap, RankedOrder) {
    let use_priority = prioritize && !priority.identified.is_empty();

    for candidates in map.lists_mut() {
        sort_by_distance(candidates);
        if use_priority {
            candidates.sort_by_key(|c| !priority.favorites.contains(&c.id));
            candidates.sort_by_key(|c| !priority.identified.contains(&c.id));
        }
    }

    map.sort_sequences_by_key(|candidates| Reverse(candidates.len()));
    if use_priority {
        map.sort_sequences_by_key(|candidates| {
            !candidates
                .iter()
                .any(|c| priority.identified.contains(&c.id))
        });
    }

    let order = map.sequence_ids();
    (map, order)
}

fn sort_by_distance(candidates: &mut [NeighborCandidate]) {
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::Detection;

    fn c(id: i64, distance: f32) -> NeighborCandidate {
        NeighborCandidate::new(id, distance)
    }

    fn ids(candidates: &[NeighborCandidate]) -> Vec<i64> {
        candidates.iter().map(|c| c.id).collect()
    }

    fn priority(identified: &[i64], favorites: &[i64]) -> ReviewPriority {
        ReviewPriority {
            identified: identified.iter().copied().collect(),
            favorites: favorites.iter().copied().collect(),
        }
    }

    #[test]
    fn test_identified_sequence_outranks_longer_one() {
        let map: MatchMap = [
            (1, vec![c(10, 0.1), c(11, 0.2), c(12, 0.3), c(13, 0.4), c(14, 0.5)]),
            (2, vec![c(20, 0.1), c(21, 0.2), c(22, 0.3)]),
        ]
        .into_iter()
        .collect();

        let (_, order) = rank(map, &priority(&[22], &[]), true);
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn test_intra_sequence_priority_order() {
        let map: MatchMap = [(1, vec![c(1, 0.1), c(2, 0.2), c(3, 0.3), c(4, 0.4)])]
            .into_iter()
            .collect();

        let (ranked, _) = rank(map, &priority(&[4], &[3]), true);
        assert_eq!(ids(ranked.get(1).unwrap_or_default()), vec![4, 3, 1, 2]);
    }

    #[test]
    fn test_favorites_ignored_without_identified() {
        let map: MatchMap = [(1, vec![c(2, 0.4), c(1, 0.1), c(3, 0.3)])]
            .into_iter()
            .collect();

        let (ranked, _) = rank(map, &priority(&[], &[2]), true);
        assert_eq!(ids(ranked.get(1).unwrap_or_default()), vec![1, 3, 2]);
    }

    #[test]
    fn test_prioritize_off_uses_distance_only() {
        let map: MatchMap = [
            (1, vec![c(10, 0.1), c(11, 0.2), c(12, 0.3)]),
            (2, vec![c(20, 0.5), c(21, 0.1)]),
        ]
        .into_iter()
        .collect();

        let (ranked, order) = rank(map, &priority(&[20], &[]), false);
        assert_eq!(order, vec![1, 2]);
        assert_eq!(ids(ranked.get(2).unwrap_or_default()), vec![21, 20]);
    }

    #[test]
    fn test_equal_length_keeps_input_order() {
        let map: MatchMap = [(7, vec![c(1, 0.1)]), (3, vec![c(2, 0.1)])]
            .into_iter()
            .collect();
        let (_, order) = rank(map, &ReviewPriority::default(), true);
        assert_eq!(order, vec![7, 3]);
    }

    #[test]
    fn test_exclude_resolved_drops_identified_queries() {
        let grouping: SequenceGrouping = [(1, vec![1, 2]), (2, vec![3])].into_iter().collect();
        let lookup: DetectionLookup = [
            Detection::new(1).in_sequence(1),
            Detection::new(2).in_sequence(1).identified_as(9),
            Detection::new(3).in_sequence(2),
        ]
        .into_iter()
        .map(|d| (d.id, d))
        .collect();
        let map: MatchMap = [(1, vec![c(3, 0.1)]), (2, vec![c(1, 0.1)])]
            .into_iter()
            .collect();

        let remaining = exclude_resolved(map, &grouping, &lookup);
        assert_eq!(remaining.sequence_ids(), vec![2]);
    }

    #[test]
    fn test_working_pool_is_unique_members_and_candidates() {
        let grouping: SequenceGrouping = [(1, vec![1, 2])].into_iter().collect();
        let map: MatchMap = [(1, vec![c(5, 0.1), c(2, 0.2), c(5, 0.3)])]
            .into_iter()
            .collect();
        assert_eq!(working_pool(&map, &grouping), vec![1, 2, 5]);
    }

    #[test]
    fn test_review_priority_from_pool() {
        let pool: DetectionLookup = [
            Detection::new(1).identified_as(3),
            Detection::new(2).favorited(),
            Detection::new(4),
        ]
        .into_iter()
        .map(|d| (d.id, d))
        .collect();

        let p = ReviewPriority::from_pool(&pool);
        assert!(p.identified.contains(&1));
        assert!(p.favorites.contains(&2));
        assert_eq!(p.identified.len() + p.favorites.len(), 2);
    }
}
