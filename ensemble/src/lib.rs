//! # Ensemble Library
//!
//! Core logic for aggregating per-task test executions across many
//! patch-generation model trials and assembling an ensemble of winning
//! patches.
//!
//! ## Pipeline
//! 1. Each trial directory holds one subdirectory per instance id, each
//!    with a raw `test_output.txt` log. [`dispatch`] resolves the instance
//!    id to its project and invokes the registered log parser.
//! 2. [`pass_rate`] reduces the parsed test-name → status mapping to
//!    pass/total/rate statistics.
//! 3. [`best_model`] compares all trials per task and keeps the winner.
//! 4. [`predictions`] re-reads each winner's own prediction store and
//!    emits the ensemble JSONL stream.
//!
//! [`new_tests`] runs independently from the same parsed results to report
//! on the newly-added tests of an instance.
//!
//! Partial failure never aborts a run: every per-instance or per-line
//! problem is logged and the unit skipped. Only a missing top-level input
//! (the new-test-case file or the scan root) is fatal.

pub mod best_model;
pub mod dispatch;
pub mod error;
pub mod instance;
pub mod pass_rate;
pub mod predictions;
pub mod report;

pub use error::EnsembleError;
