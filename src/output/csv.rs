//! CSV output format writer.

use crate::error::{Error, Result};
use crate::matching::{DetectionId, SequenceId};
use crate::output::ReviewQueue;
use serde::Serialize;
use std::path::Path;

/// One padded match per row.
#[derive(Debug, Serialize)]
struct MatchRow {
    rank: usize,
    sequence_id: SequenceId,
    detection_id: DetectionId,
    distance: f32,
}

/// Write the queue as CSV with columns `rank,sequence_id,detection_id,distance`.
pub fn write_csv(path: &Path, queue: &ReviewQueue) -> Result<()> {
    let to_error = |e: csv::Error| Error::OutputWrite {
        path: path.to_path_buf(),
        source: Box::new(e),
    };

    let mut writer = csv::Writer::from_path(path).map_err(to_error)?;
    for entry in &queue.queue {
        for candidate in &entry.matches {
            writer
                .serialize(MatchRow {
                    rank: entry.rank,
                    sequence_id: entry.sequence_id,
                    detection_id: candidate.id,
                    distance: candidate.distance,
                })
                .map_err(to_error)?;
        }
    }
    writer.flush().map_err(|e| Error::OutputWrite {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::MatchSettings;
    use crate::matching::{
        MatchMap, MatchOutcome, MatchParams, NeighborCandidate, RunState, SequenceGrouping,
    };
    use crate::store::Metric;

    #[test]
    fn test_write_csv_rows() {
        let grouping: SequenceGrouping = [(7, vec![1])].into_iter().collect();
        let matches: MatchMap = [(
            7,
            vec![NeighborCandidate::new(5, 0.25), NeighborCandidate::new(9, 0.25)],
        )]
        .into_iter()
        .collect();
        let outcome = MatchOutcome {
            state: RunState::Completed,
            matches,
            ranked: vec![7],
            sequences_processed: 1,
        };
        let settings = MatchSettings {
            metric: Metric::L2,
            params: MatchParams {
                k: 3,
                threshold: 1.0,
                prioritize: false,
            },
        };
        let queue = ReviewQueue::from_outcome(&outcome, &grouping, &settings);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.matches.csv");
        write_csv(&path, &queue).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "rank,sequence_id,detection_id,distance");
        assert_eq!(lines[1], "1,7,5,0.25");
        assert_eq!(lines[2], "1,7,9,0.25");
    }
}
