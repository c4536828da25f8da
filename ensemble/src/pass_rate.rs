//! Pass-rate calculation: reduce a test-name → status mapping to
//! pass/total/rate, and walk a trial directory to produce per-instance
//! statistics.

use crate::dispatch::parse_test_logs;
use crate::error::EnsembleError;
use crate::instance::instance_id_from_path;
use log::warn;
use log_parsers::{TestResult, TestStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Pass statistics for one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRateStats {
    pub pass_count: usize,
    pub total_count: usize,
    /// Fraction of outcomes equal to `PASSED`, in `[0, 1]`.
    pub pass_rate: f64,
}

/// Reduce a [`TestResult`] to pass statistics.
///
/// Only entries whose status is exactly `PASSED` count as passing; `ERROR`
/// and `SKIPPED` count against the rate like any failure. An empty mapping
/// yields `(0, 0, 0.0)`, never a division error.
pub fn calculate_pass_rate(results: &TestResult) -> PassRateStats {
    let total_count = results.len();
    if total_count == 0 {
        return PassRateStats {
            pass_count: 0,
            total_count: 0,
            pass_rate: 0.0,
        };
    }

    let pass_count = results
        .values()
        .filter(|status| **status == TestStatus::Passed)
        .count();

    PassRateStats {
        pass_count,
        total_count,
        pass_rate: pass_count as f64 / total_count as f64,
    }
}

/// Compute pass statistics for every instance subdirectory of a trial
/// directory. Instances whose logs cannot be resolved or parsed are skipped
/// with a warning; the walk itself only fails if the directory cannot be
/// listed.
pub fn pass_rates_for_dir(trial_dir: &Path) -> Result<BTreeMap<String, PassRateStats>, EnsembleError> {
    let entries = fs::read_dir(trial_dir).map_err(|e| {
        EnsembleError::Io(format!("Failed to list {}: {e}", trial_dir.display()))
    })?;

    let mut results = BTreeMap::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            EnsembleError::Io(format!("Failed to list {}: {e}", trial_dir.display()))
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let instance_id = instance_id_from_path(&path);
        match parse_test_logs(&path) {
            Ok(test_results) if !test_results.is_empty() => {
                results.insert(instance_id, calculate_pass_rate(&test_results));
            }
            Ok(_) => warn!("No test results parsed for {instance_id}"),
            Err(e) => warn!("Skipping {instance_id}: {e}"),
        }
    }

    Ok(results)
}

/// Unweighted arithmetic mean of the per-instance pass rates.
///
/// This deliberately averages each instance's own rate rather than dividing
/// a global pass count by a global total: instances with huge suites would
/// otherwise dominate the summary statistic.
pub fn average_pass_rate(results: &BTreeMap<String, PassRateStats>) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.values().map(|s| s.pass_rate).sum::<f64>() / results.len() as f64
}
