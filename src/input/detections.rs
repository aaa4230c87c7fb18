//! Detection attribute table parsing.
//!
//! Reads the per-detection attributes the matcher needs from a CSV file
//! with a header row:
//!
//! `detection_id,sequence_id,individual_id,viewpoint,favorite`
//!
//! Only `detection_id` is required; empty cells mean "unset".

use crate::error::{Error, Result};
use crate::matching::{Detection, DetectionId, IndividualId, SequenceId};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Internal record for CSV deserialization.
#[derive(Debug, Deserialize)]
struct DetectionRecord {
    detection_id: DetectionId,
    #[serde(default)]
    sequence_id: Option<SequenceId>,
    #[serde(default)]
    individual_id: Option<IndividualId>,
    #[serde(default)]
    viewpoint: Option<String>,
    #[serde(default)]
    favorite: Option<String>,
}

/// Load detection attributes from a CSV file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - A row is malformed or has an unparseable value
/// - A detection id appears more than once
pub fn load_detections(path: &Path) -> Result<Vec<Detection>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::InputRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut seen = HashSet::new();
    let mut detections = Vec::new();

    for (line_num, result) in reader.deserialize::<DetectionRecord>().enumerate() {
        let line = line_num + 2;
        let record = result.map_err(|e| Error::InvalidInput {
            path: path.to_path_buf(),
            message: format!("line {line}: {e}"),
        })?;

        if !seen.insert(record.detection_id) {
            return Err(Error::InvalidInput {
                path: path.to_path_buf(),
                message: format!("line {line}: duplicate detection_id {}", record.detection_id),
            });
        }

        let favorite = match record.favorite.as_deref() {
            None => false,
            Some(value) => parse_flag(value).ok_or_else(|| Error::InvalidInput {
                path: path.to_path_buf(),
                message: format!("line {line}: invalid favorite value '{value}'"),
            })?,
        };

        detections.push(Detection {
            id: record.detection_id,
            sequence_id: record.sequence_id,
            individual_id: record.individual_id,
            viewpoint: record.viewpoint.filter(|v| !v.is_empty()),
            favorite,
        });
    }

    Ok(detections)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "" | "0" | "false" | "no" | "n" => Some(false),
        "1" | "true" | "yes" | "y" => Some(true),
        _ => None,
    }
}
