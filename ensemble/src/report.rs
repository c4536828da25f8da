//! Serialization helpers for the run's output files.
//!
//! Every output is written whole at the end of its stage (pretty JSON for
//! the object mappings, JSONL for the ensemble stream handled in
//! [`crate::predictions`]). Writes truncate, so re-running the pipeline is
//! idempotent with respect to its outputs.

use crate::error::EnsembleError;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serialize `value` as pretty JSON and write it to `path`, creating parent
/// directories as needed and truncating any previous content.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<(), EnsembleError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                EnsembleError::Io(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
    }

    let json = serde_json::to_string_pretty(value)
        .map_err(|e| EnsembleError::InvalidJson(format!("Failed to serialize output: {e}")))?;
    fs::write(path, json)
        .map_err(|e| EnsembleError::Io(format!("Failed to write {}: {e}", path.display())))
}
