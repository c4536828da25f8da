//! Parser for Django's test-runner output.
//!
//! Result lines look like:
//!
//! ```text
//! test_combine (migrations.test_operations.OperationTests) ... ok
//! test_rename (migrations.test_operations.OperationTests) ... skipped 'No oracle'
//! FAIL: test_clash (migrations.test_operations.OperationTests)
//! ERROR: test_crash (migrations.test_operations.OperationTests)
//! ```
//!
//! The full test-node identifier is the name plus its parenthetical
//! qualifier, e.g. `test_combine (migrations.test_operations.OperationTests)`.

use crate::{LogParser, TestResult, TestStatus};

pub struct DjangoParser;

impl LogParser for DjangoParser {
    fn parse(&self, log: &str) -> TestResult {
        let mut results = TestResult::new();

        for raw in log.lines() {
            let line = raw.trim();

            if let Some(name) = line.strip_suffix(" ... ok") {
                results.insert(name.to_string(), TestStatus::Passed);
            } else if let Some((name, _reason)) = line.split_once(" ... skipped") {
                results.insert(name.to_string(), TestStatus::Skipped);
            } else if let Some(name) = line.strip_suffix(" ... FAIL") {
                results.insert(name.to_string(), TestStatus::Failed);
            } else if let Some(name) = line.strip_suffix(" ... ERROR") {
                results.insert(name.to_string(), TestStatus::Error);
            } else if let Some(name) = line.strip_prefix("FAIL: ") {
                results.insert(name.to_string(), TestStatus::Failed);
            } else if let Some(name) = line.strip_prefix("ERROR: ") {
                results.insert(name.to_string(), TestStatus::Error);
            }
        }

        results
    }
}
