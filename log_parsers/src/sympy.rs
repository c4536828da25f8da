//! Parser for sympy's `bin/test` output, where each test name is followed
//! by a single outcome marker:
//!
//! ```text
//! test_core_basic ok
//! test_simplify F
//! test_integrals E
//! test_plotting s
//! ```

use crate::{LogParser, TestResult, TestStatus};
use once_cell::sync::Lazy;
use regex::Regex;

// Anchored on the test_ prefix so prose mentioning tests is skipped.
static LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(test_\S+)\s+(ok|E|F|f|s)$").expect("valid regex"));

pub struct SympyParser;

impl LogParser for SympyParser {
    fn parse(&self, log: &str) -> TestResult {
        let mut results = TestResult::new();

        for raw in log.lines() {
            let line = raw.trim();
            if let Some(caps) = LINE_RE.captures(line) {
                let name = caps[1].to_string();
                let status = match &caps[2] {
                    "ok" => TestStatus::Passed,
                    "E" => TestStatus::Error,
                    "F" | "f" => TestStatus::Failed,
                    _ => TestStatus::Skipped,
                };
                results.insert(name, status);
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_markers() {
        let log = "test_core_basic ok\n\
                   test_simplify F\n\
                   test_integrals E\n\
                   test_plotting s";
        let results = SympyParser.parse(log);
        assert_eq!(results["test_core_basic"], TestStatus::Passed);
        assert_eq!(results["test_simplify"], TestStatus::Failed);
        assert_eq!(results["test_integrals"], TestStatus::Error);
        assert_eq!(results["test_plotting"], TestStatus::Skipped);
    }

    #[test]
    fn test_prose_lines_ignored() {
        let log = "cache: no\nground types: python\nrandom seed: 1234\n\
                   test_foo passed quickly"; // no bare marker token
        assert!(SympyParser.parse(log).is_empty());
    }
}
