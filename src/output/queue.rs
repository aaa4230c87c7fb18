//! Review queue document and JSON output.

use crate::config::MatchSettings;
use crate::error::{Error, Result};
use crate::matching::{
    DetectionId, MatchOutcome, NeighborCandidate, RunState, SequenceGrouping, SequenceId,
};
use crate::store::Metric;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Ranked review queue produced by a matching run.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewQueue {
    /// When the queue was generated.
    pub generated_at: DateTime<Utc>,
    /// Terminal state of the run.
    pub state: RunState,
    /// Settings the run used.
    pub settings: QueueSettings,
    /// Summary statistics.
    pub summary: QueueSummary,
    /// Query sequences in review order.
    pub queue: Vec<QueueEntry>,
}

/// Matching settings recorded with the queue.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueueSettings {
    /// Neighbors requested per detection.
    pub k: usize,
    /// Distance metric.
    pub metric: Metric,
    /// Distance threshold (exclusive).
    pub threshold: f32,
    /// Whether identified and favorite matches were ranked first.
    pub prioritize: bool,
}

/// Summary statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueueSummary {
    /// Query sequences in the input.
    pub sequences_total: usize,
    /// Query sequences processed before the run ended.
    pub sequences_processed: usize,
    /// Query sequences with matches to review.
    pub sequences_matched: usize,
    /// Padded matches across all sequences.
    pub total_matches: usize,
}

/// One query sequence and its ordered matches.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Review position, starting at 1.
    pub rank: usize,
    /// Query sequence.
    pub sequence_id: SequenceId,
    /// Detections in the query sequence.
    pub query_detections: Vec<DetectionId>,
    /// Matches in review order.
    pub matches: Vec<NeighborCandidate>,
}

impl ReviewQueue {
    /// Build the queue from a run outcome, following its ranked order.
    pub fn from_outcome(
        outcome: &MatchOutcome,
        grouping: &SequenceGrouping,
        settings: &MatchSettings,
    ) -> Self {
        let queue: Vec<QueueEntry> = outcome
            .ranked
            .iter()
            .enumerate()
            .map(|(i, &sequence_id)| QueueEntry {
                rank: i + 1,
                sequence_id,
                query_detections: grouping
                    .members(sequence_id)
                    .unwrap_or_default()
                    .to_vec(),
                matches: outcome
                    .matches
                    .get(sequence_id)
                    .unwrap_or_default()
                    .to_vec(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            state: outcome.state,
            settings: QueueSettings {
                k: settings.params.k,
                metric: settings.metric,
                threshold: settings.params.threshold,
                prioritize: settings.params.prioritize,
            },
            summary: QueueSummary {
                sequences_total: grouping.len(),
                sequences_processed: outcome.sequences_processed,
                sequences_matched: queue.len(),
                total_matches: queue.iter().map(|e| e.matches.len()).sum(),
            },
            queue,
        }
    }
}

/// Write the queue as pretty-printed JSON.
pub fn write_json(path: &Path, queue: &ReviewQueue) -> Result<()> {
    let to_error = |source: Box<dyn std::error::Error + Send + Sync>| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| to_error(Box::new(e)))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, queue).map_err(|e| to_error(Box::new(e)))?;
    writer.flush().map_err(|e| to_error(Box::new(e)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::matching::{MatchMap, MatchParams};

    fn settings() -> MatchSettings {
        MatchSettings {
            metric: Metric::Cosine,
            params: MatchParams {
                k: 5,
                threshold: 0.4,
                prioritize: true,
            },
        }
    }

    fn outcome() -> (MatchOutcome, SequenceGrouping) {
        let grouping: SequenceGrouping =
            [(1, vec![10, 11]), (2, vec![20]), (3, vec![30])].into_iter().collect();
        let matches: MatchMap = [
            (1, vec![NeighborCandidate::new(20, 0.1)]),
            (2, vec![NeighborCandidate::new(30, 0.2), NeighborCandidate::new(10, 0.3)]),
        ]
        .into_iter()
        .collect();
        let outcome = MatchOutcome {
            state: RunState::Completed,
            matches,
            ranked: vec![2, 1],
            sequences_processed: 3,
        };
        (outcome, grouping)
    }

    #[test]
    fn test_queue_follows_ranked_order() {
        let (outcome, grouping) = outcome();
        let queue = ReviewQueue::from_outcome(&outcome, &grouping, &settings());

        assert_eq!(queue.queue.len(), 2);
        assert_eq!(queue.queue[0].rank, 1);
        assert_eq!(queue.queue[0].sequence_id, 2);
        assert_eq!(queue.queue[0].query_detections, vec![20]);
        assert_eq!(queue.queue[1].query_detections, vec![10, 11]);
        assert_eq!(queue.summary.sequences_total, 3);
        assert_eq!(queue.summary.total_matches, 3);
    }

    #[test]
    fn test_write_json_round_trip_fields() {
        let (outcome, grouping) = outcome();
        let queue = ReviewQueue::from_outcome(&outcome, &grouping, &settings());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.matches.json");

        write_json(&path, &queue).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["state"], "completed");
        assert_eq!(value["settings"]["metric"], "cosine");
        assert_eq!(value["queue"][0]["matches"][0]["detection_id"], 30);
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_write_json_bad_path() {
        let (outcome, grouping) = outcome();
        let queue = ReviewQueue::from_outcome(&outcome, &grouping, &settings());
        let result = write_json(Path::new("/nonexistent/dir/out.json"), &queue);
        assert!(matches!(result, Err(Error::OutputWrite { .. })));
    }
}
