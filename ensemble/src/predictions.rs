//! Prediction stores and the ensemble assembler.
//!
//! Each trial keeps its originally generated patches in a line-delimited
//! JSON store (`all_preds.jsonl`), one independent record per instance. The
//! assembler re-reads the winning trial's store for every task and emits a
//! single ensemble stream; patch text passes through verbatim.

use crate::best_model::BestModelRecord;
use crate::error::EnsembleError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// File name of every trial's prediction store.
pub const PREDICTIONS_FILE: &str = "all_preds.jsonl";

/// One record of a trial's prediction store. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub instance_id: String,
    pub model_patch: String,
}

/// One line of the assembled ensemble output.
#[derive(Debug, Serialize, Deserialize)]
pub struct EnsemblePrediction {
    pub instance_id: String,
    pub model_name_or_path: String,
    pub model_patch: String,
}

/// Scan a prediction store for the record of one instance.
///
/// Lines that fail to parse are logged as malformed and skipped; the scan
/// continues. When several records share the instance id, the last one
/// wins. Returns `Ok(None)` when no record matches.
pub fn find_prediction(
    store: &Path,
    instance_id: &str,
) -> Result<Option<Prediction>, EnsembleError> {
    let file = File::open(store)
        .map_err(|e| EnsembleError::Io(format!("Failed to open {}: {e}", store.display())))?;

    let mut found = None;
    for line in BufReader::new(file).lines() {
        let line = line
            .map_err(|e| EnsembleError::Io(format!("Failed to read {}: {e}", store.display())))?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Prediction>(&line) {
            Ok(pred) if pred.instance_id == instance_id => found = Some(pred),
            Ok(_) => {}
            Err(e) => warn!(
                "{}",
                EnsembleError::MalformedRecord(format!("in {}: {e}", store.display()))
            ),
        }
    }

    Ok(found)
}

/// Assemble the ensemble output from the per-task winners.
///
/// The output file is truncated at the start of the run, then one JSONL
/// line is appended per task whose winner has a locatable prediction
/// record. Tasks whose store is missing or lacks a matching record are
/// skipped with a warning and produce no line. Returns the number of lines
/// written.
pub fn assemble_ensemble(
    best_models: &BTreeMap<String, BestModelRecord>,
    predictions_root: &Path,
    output_path: &Path,
) -> Result<usize, EnsembleError> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                EnsembleError::Io(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
    }

    // Re-runs overwrite, never append across runs.
    let mut out = File::create(output_path).map_err(|e| {
        EnsembleError::Io(format!("Failed to create {}: {e}", output_path.display()))
    })?;

    let mut written = 0;
    for (task_id, record) in best_models {
        let store = predictions_root.join(&record.model).join(PREDICTIONS_FILE);
        if !store.exists() {
            warn!("Prediction file not found: {}", store.display());
            continue;
        }

        match find_prediction(&store, task_id) {
            Ok(Some(pred)) => {
                let entry = EnsemblePrediction {
                    instance_id: task_id.clone(),
                    model_name_or_path: record.model.clone(),
                    model_patch: pred.model_patch,
                };
                let line = serde_json::to_string(&entry).map_err(|e| {
                    EnsembleError::InvalidJson(format!(
                        "Failed to serialize prediction for {task_id}: {e}"
                    ))
                })?;
                writeln!(out, "{line}").map_err(|e| {
                    EnsembleError::Io(format!(
                        "Failed to write {}: {e}",
                        output_path.display()
                    ))
                })?;
                written += 1;
                info!("Added prediction for task {task_id} from model {}", record.model);
            }
            Ok(None) => warn!(
                "No prediction for task {task_id} in {}",
                store.display()
            ),
            Err(e) => warn!("Skipping task {task_id}: {e}"),
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(model: &str) -> BestModelRecord {
        BestModelRecord {
            model: model.to_string(),
            pass_rate: 1.0,
            pass_count: 1,
            missing_count: 0,
            total_count: 1,
        }
    }

    fn write_store(root: &Path, model: &str, lines: &[&str]) {
        let dir = root.join(model);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(PREDICTIONS_FILE), lines.join("\n")).unwrap();
    }

    #[test]
    fn test_find_prediction_matches_instance() {
        let root = TempDir::new().unwrap();
        write_store(
            root.path(),
            "m",
            &[
                r#"{"instance_id": "a__a-1", "model_patch": "diff one"}"#,
                r#"{"instance_id": "b__b-2", "model_patch": "diff two"}"#,
            ],
        );
        let store = root.path().join("m").join(PREDICTIONS_FILE);

        let pred = find_prediction(&store, "b__b-2").unwrap().unwrap();
        assert_eq!(pred.model_patch, "diff two");
        assert!(find_prediction(&store, "c__c-3").unwrap().is_none());
    }

    #[test]
    fn test_malformed_line_skipped_scan_continues() {
        let root = TempDir::new().unwrap();
        write_store(
            root.path(),
            "m",
            &[
                "{not json",
                r#"{"instance_id": "a__a-1", "model_patch": "diff"}"#,
            ],
        );
        let store = root.path().join("m").join(PREDICTIONS_FILE);

        let pred = find_prediction(&store, "a__a-1").unwrap().unwrap();
        assert_eq!(pred.model_patch, "diff");
    }

    #[test]
    fn test_last_record_wins_on_duplicate_instance() {
        let root = TempDir::new().unwrap();
        write_store(
            root.path(),
            "m",
            &[
                r#"{"instance_id": "a__a-1", "model_patch": "old"}"#,
                r#"{"instance_id": "a__a-1", "model_patch": "new"}"#,
            ],
        );
        let store = root.path().join("m").join(PREDICTIONS_FILE);

        let pred = find_prediction(&store, "a__a-1").unwrap().unwrap();
        assert_eq!(pred.model_patch, "new");
    }

    #[test]
    fn test_assemble_one_line_per_resolvable_winner() {
        let root = TempDir::new().unwrap();
        write_store(
            root.path(),
            "model_x",
            &[r#"{"instance_id": "a__a-1", "model_patch": "patch a"}"#],
        );
        write_store(
            root.path(),
            "model_y",
            &[r#"{"instance_id": "b__b-2", "model_patch": "patch b"}"#],
        );

        let mut best = BTreeMap::new();
        best.insert("a__a-1".to_string(), record("model_x"));
        best.insert("b__b-2".to_string(), record("model_y"));
        // Winner with no store on disk: no output line.
        best.insert("c__c-3".to_string(), record("model_gone"));

        let out = root.path().join("ensemble").join(PREDICTIONS_FILE);
        let written = assemble_ensemble(&best, root.path(), &out).unwrap();
        assert_eq!(written, 2);

        let content = fs::read_to_string(&out).unwrap();
        let lines: Vec<EnsemblePrediction> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].instance_id, "a__a-1");
        assert_eq!(lines[0].model_name_or_path, "model_x");
        assert_eq!(lines[0].model_patch, "patch a");
        assert_eq!(lines[1].instance_id, "b__b-2");
    }

    #[test]
    fn test_rerun_truncates_previous_output() {
        let root = TempDir::new().unwrap();
        write_store(
            root.path(),
            "m",
            &[r#"{"instance_id": "a__a-1", "model_patch": "patch"}"#],
        );

        let mut best = BTreeMap::new();
        best.insert("a__a-1".to_string(), record("m"));

        let out = root.path().join(PREDICTIONS_FILE);
        assemble_ensemble(&best, root.path(), &out).unwrap();
        assemble_ensemble(&best, root.path(), &out).unwrap();

        let content = fs::read_to_string(&out).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_winner_without_matching_record_skipped() {
        let root = TempDir::new().unwrap();
        write_store(
            root.path(),
            "m",
            &[r#"{"instance_id": "other__other-9", "model_patch": "patch"}"#],
        );

        let mut best = BTreeMap::new();
        best.insert("a__a-1".to_string(), record("m"));

        let out = root.path().join("out.jsonl");
        let written = assemble_ensemble(&best, root.path(), &out).unwrap();
        assert_eq!(written, 0);
        assert_eq!(fs::read_to_string(&out).unwrap(), "");
    }
}
