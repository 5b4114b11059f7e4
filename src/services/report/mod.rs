//! Thin serialization glue: renders the run's artifacts (case map, run
//! summary, per-item results) to JSON and JSONL files. Spreadsheet output
//! stays with downstream tooling.

use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::types::{CaseMap, MapperResult, MappingResult, RunSummary};

/// Everything a run hands to its consumers.
#[derive(Debug, Clone, Serialize)]
pub struct RunArtifact<'a> {
    pub summary: &'a RunSummary,
    pub case_map: &'a CaseMap,
}

/// Write one value as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> MapperResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|error| crate::types::MapperError::Io(error.to_string()))?;
    std::fs::write(path, rendered)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Write per-item mapping results as JSONL, one record per line.
pub fn write_results_jsonl(path: &Path, results: &[MappingResult]) -> MapperResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;
    for result in results {
        let line = serde_json::to_string(result)
            .map_err(|error| crate::types::MapperError::Io(error.to_string()))?;
        writeln!(file, "{line}")?;
    }
    log::info!("wrote {} records to {}", results.len(), path.display());
    Ok(())
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
