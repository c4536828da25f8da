//! Best-model selection: compare every trial's pass rate per task and keep
//! the winner.

use crate::error::EnsembleError;
use crate::instance::{instance_id_from_path, repo_from_instance_id};
use crate::pass_rate::pass_rates_for_dir;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The winning trial for one task, final only after every trial has been
/// considered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestModelRecord {
    pub model: String,
    pub pass_rate: f64,
    pub pass_count: usize,
    pub missing_count: usize,
    pub total_count: usize,
}

/// Cross-trial pass-rate table: task id → (trial name → pass rate).
pub type ResultsTable = BTreeMap<String, BTreeMap<String, f64>>;

/// Accumulators for one selection run, owned by the run itself.
#[derive(Debug, Default)]
pub struct SelectionOutcome {
    pub best_models: BTreeMap<String, BestModelRecord>,
    pub all_results: ResultsTable,
}

/// Trial name from its directory: the basename, with the `new_tests_`
/// staging prefix stripped when present.
pub fn trial_name_from_dir(trial_dir: &Path) -> String {
    let name = trial_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_prefix("new_tests_").unwrap_or(&name).to_string()
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>, EnsembleError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| EnsembleError::Io(format!("Failed to list {}: {e}", dir.display())))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| EnsembleError::Io(format!("Failed to list {}: {e}", dir.display())))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Subdirectories of the scan root, one per trial, sorted by name so that
/// the processing order (and therefore tie-breaking) is deterministic.
pub fn trial_directories(root: &Path) -> Result<Vec<PathBuf>, EnsembleError> {
    sorted_subdirs(root)
}

/// Directory whose children are the instance directories of a trial.
///
/// Trials normally hold their instance directories directly. Staged
/// evaluation trees nest them one level deeper, under a single
/// intermediate directory named after the model. When no direct child is
/// named like an instance id, descend into the trial's single child; a
/// trial with no children is skipped, and with several the
/// lexicographically first is used, each with a warning.
fn instance_root(trial_dir: &Path) -> Result<Option<PathBuf>, EnsembleError> {
    let children = sorted_subdirs(trial_dir)?;

    let has_instances = children
        .iter()
        .any(|child| repo_from_instance_id(&instance_id_from_path(child)).is_ok());
    if has_instances {
        return Ok(Some(trial_dir.to_path_buf()));
    }

    match children.as_slice() {
        [] => {
            warn!("No child directory found in {}", trial_dir.display());
            Ok(None)
        }
        [only] => Ok(Some(only.clone())),
        [first, ..] => {
            warn!(
                "Multiple child directories found in {}, using first one: {}",
                trial_dir.display(),
                first.display()
            );
            Ok(Some(first.clone()))
        }
    }
}

/// Find the best trial per task across `trial_dirs`.
///
/// Trials whose directory is missing or unreadable are skipped with a
/// warning and do not participate in the comparison. The running best is
/// replaced on a `>=` comparison, so with the sorted processing order of
/// [`trial_directories`] an equal pass rate is won by the lexicographically
/// later trial name.
pub fn find_best_model_per_task(trial_dirs: &[PathBuf]) -> SelectionOutcome {
    let mut outcome = SelectionOutcome::default();

    for trial_dir in trial_dirs {
        if !trial_dir.is_dir() {
            warn!("Trial directory not found: {}", trial_dir.display());
            continue;
        }

        let model_name = trial_name_from_dir(trial_dir);
        info!("Processing model trial: {model_name}");

        let scan_dir = match instance_root(trial_dir) {
            Ok(Some(dir)) => dir,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping trial {model_name}: {e}");
                continue;
            }
        };

        let stats_by_task = match pass_rates_for_dir(&scan_dir) {
            Ok(stats) => stats,
            Err(e) => {
                warn!("Skipping trial {model_name}: {e}");
                continue;
            }
        };

        for (task_id, stats) in stats_by_task {
            outcome
                .all_results
                .entry(task_id.clone())
                .or_default()
                .insert(model_name.clone(), stats.pass_rate);

            let replace = outcome
                .best_models
                .get(&task_id)
                .is_none_or(|best| stats.pass_rate >= best.pass_rate);
            if replace {
                outcome.best_models.insert(
                    task_id,
                    BestModelRecord {
                        model: model_name.clone(),
                        pass_rate: stats.pass_rate,
                        pass_count: stats.pass_count,
                        missing_count: stats.total_count - stats.pass_count,
                        total_count: stats.total_count,
                    },
                );
            }
        }
    }

    outcome
}
