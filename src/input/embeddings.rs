//! Embedding table parsing.

use crate::error::{Error, Result};
use crate::matching::DetectionId;
use crate::store::{MemoryIndex, Metric};
use std::path::Path;

/// Load embeddings from a CSV file into an in-memory index.
///
/// The first row is a header and is ignored, whatever its width. Every
/// following row holds a detection id followed by the embedding values;
/// all rows must have the same number of finite values.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a value cannot be parsed,
/// a row has no values, rows differ in dimension, or an id repeats.
pub fn load_embeddings(path: &Path, metric: Metric) -> Result<MemoryIndex> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::InputRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let invalid = |line: usize, message: String| Error::InvalidInput {
        path: path.to_path_buf(),
        message: format!("line {line}: {message}"),
    };

    let mut index = MemoryIndex::new(metric);

    for (line_num, result) in reader.records().enumerate() {
        let line = line_num + 2;
        let record = result.map_err(|e| invalid(line, e.to_string()))?;

        let mut fields = record.iter();
        let id: DetectionId = fields
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(|_| invalid(line, "detection id is not an integer".to_string()))?;

        let vector = fields
            .map(|v| {
                v.parse::<f32>()
                    .ok()
                    .filter(|x| x.is_finite())
                    .ok_or_else(|| invalid(line, format!("'{v}' is not a valid number")))
            })
            .collect::<Result<Vec<f32>>>()?;

        if vector.is_empty() {
            return Err(invalid(line, format!("no embedding values for detection {id}")));
        }
        if index.contains(id) {
            return Err(invalid(line, format!("duplicate embedding for detection {id}")));
        }

        index
            .insert(id, vector)
            .map_err(|e| invalid(line, e.to_string()))?;
    }

    Ok(index)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::VectorIndex;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_embeddings() {
        let file = write_csv("id,e0,e1\n1,1.0,0.0\n2,0.0,1.0\n3, 0.9 ,0.1\n");
        let index = load_embeddings(file.path(), Metric::Cosine).unwrap();

        assert_eq!(index.len(), 3);
        let neighbors = index.knn(1, 2).unwrap().unwrap();
        assert_eq!(neighbors[1].id, 3);
    }

    #[test]
    fn test_short_header_with_wide_rows() {
        let file = write_csv("detection_id,embedding\n1,1.0,0.0,0.0\n2,0.0,1.0,0.0\n");
        let index = load_embeddings(file.path(), Metric::Cosine).unwrap();

        assert_eq!(index.len(), 2);
        let neighbors = index.knn(1, 2).unwrap().unwrap();
        assert_eq!(neighbors[1].id, 2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let file = write_csv("id,e0,e1\n1,1.0,0.0\n2,0.0\n");
        let err = load_embeddings(file.path(), Metric::Cosine).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        for value in ["NaN", "inf", "-inf"] {
            let file = write_csv(&format!("id,e0,e1\n1,{value},0.0\n2,1.0,0.0\n"));
            let err = load_embeddings(file.path(), Metric::L2).unwrap_err();
            assert!(matches!(err, Error::InvalidInput { .. }), "{value} accepted");
            assert!(err.to_string().contains("line 2"));
        }
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let file = write_csv("id,e0\n1,abc\n");
        let err = load_embeddings(file.path(), Metric::L2).unwrap_err();
        assert!(err.to_string().contains("'abc' is not a valid number"));
    }

    #[test]
    fn test_row_without_values_rejected() {
        let file = write_csv("id\n1\n");
        assert!(load_embeddings(file.path(), Metric::L2).is_err());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let file = write_csv("id,e0\n1,0.5\n1,0.7\n");
        let err = load_embeddings(file.path(), Metric::L2).unwrap_err();
        assert!(err.to_string().contains("duplicate embedding"));
    }
}
