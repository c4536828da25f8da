//! Ensemble Error Types
//!
//! This module defines the [`EnsembleError`] enum covering every failure
//! the aggregation pipeline can hit. Per-instance and per-line failures are
//! caught at their originating component, logged, and skipped; only a
//! missing top-level input halts a run.

use std::fmt;

/// Represents all error types that can occur in the aggregation pipeline.
#[derive(Debug)]
pub enum EnsembleError {
    /// Instance id does not split into an `owner/repo` pair.
    MalformedId(String),
    /// No log parser is registered for the resolved repository.
    UnsupportedRepo(String),
    /// The fixed-name raw log file is absent from an instance directory.
    LogNotFound(String),
    /// A single line of a multi-record file failed to parse.
    MalformedRecord(String),
    /// A short test name is absent from the simplified-name lookup.
    TestNameNotFound(String),
    /// JSON is malformed or does not match the expected schema.
    InvalidJson(String),
    /// I/O error (file not found, unreadable, etc.).
    Io(String),
}

impl fmt::Display for EnsembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnsembleError::MalformedId(id) => {
                write!(f, "could not derive owner/repo from instance id '{id}'")
            }
            EnsembleError::UnsupportedRepo(repo) => {
                write!(f, "no log parser registered for repository '{repo}'")
            }
            EnsembleError::LogNotFound(path) => {
                write!(f, "test output file not found at {path}")
            }
            EnsembleError::MalformedRecord(msg) => write!(f, "malformed record: {msg}"),
            EnsembleError::TestNameNotFound(name) => {
                write!(f, "test name not found in log: {name}")
            }
            EnsembleError::InvalidJson(msg) => write!(f, "invalid JSON: {msg}"),
            EnsembleError::Io(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EnsembleError {}
