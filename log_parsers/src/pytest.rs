//! Parser for pytest verbose output, shared by every project whose suite
//! runs under plain pytest.
//!
//! Result lines carry the status first and the node id second:
//!
//! ```text
//! PASSED tests/test_sessions.py::test_login
//! FAILED tests/test_sessions.py::test_logout - AssertionError: boom
//! SKIPPED [1] tests/test_sessions.py::test_windows_only
//! ```

use crate::{LogParser, TestResult, TestStatus};

pub struct PytestParser;

fn status_from_token(token: &str) -> Option<TestStatus> {
    match token {
        "PASSED" => Some(TestStatus::Passed),
        "FAILED" => Some(TestStatus::Failed),
        "ERROR" => Some(TestStatus::Error),
        "SKIPPED" => Some(TestStatus::Skipped),
        _ => None,
    }
}

impl LogParser for PytestParser {
    fn parse(&self, log: &str) -> TestResult {
        let mut results = TestResult::new();

        for raw in log.lines() {
            let line = raw.trim();
            let mut tokens = line.split_whitespace();

            let Some(status) = tokens.next().and_then(status_from_token) else {
                continue;
            };

            // SKIPPED lines carry a "[count]" token before the node id.
            let node = tokens.find(|t| !t.starts_with('['));
            if let Some(node) = node {
                // FAILED lines may append "- <reason>"; the node id never
                // contains whitespace so the first token is the whole id.
                results.insert(node.to_string(), status);
            }
        }

        results
    }
}
