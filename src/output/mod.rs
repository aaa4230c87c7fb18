//! Review queue output.

mod csv;
pub mod progress;
mod queue;

pub use self::csv::write_csv;
pub use queue::{QueueEntry, QueueSettings, QueueSummary, ReviewQueue, write_json};

use crate::config::OutputFormat;
use crate::constants::output_extensions;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Get the output file path for a given format.
pub fn output_path_for(output_dir: &Path, prefix: &str, format: OutputFormat) -> PathBuf {
    let extension = match format {
        OutputFormat::Json => output_extensions::JSON,
        OutputFormat::Csv => output_extensions::CSV,
    };
    output_dir.join(format!("{prefix}{extension}"))
}

/// Write the queue in every requested format and return the written paths.
pub fn write_outputs(
    queue: &ReviewQueue,
    output_dir: &Path,
    prefix: &str,
    formats: &[OutputFormat],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(formats.len());
    for &format in formats {
        let path = output_path_for(output_dir, prefix, format);
        match format {
            OutputFormat::Json => write_json(&path, queue)?,
            OutputFormat::Csv => write_csv(&path, queue)?,
        }
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for() {
        let json = output_path_for(Path::new("/out"), "lynx", OutputFormat::Json);
        assert_eq!(json, PathBuf::from("/out/lynx.matches.json"));
        let csv = output_path_for(Path::new("/out"), "lynx", OutputFormat::Csv);
        assert!(csv.to_string_lossy().ends_with("lynx.matches.csv"));
    }
}
