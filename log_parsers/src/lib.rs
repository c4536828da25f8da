//! # Log Parsers Library
//!
//! Per-project parsers for raw test-runner output. Each supported project
//! ships one [`LogParser`] implementation that translates that project's
//! log format into a uniform test-name → [`TestStatus`] mapping, and a
//! registry keyed by repository slug (`owner/repo`) selects the right
//! parser at runtime.
//!
//! ## Key Concepts
//! - **TestStatus**: normalized outcome of a single test (`PASSED`,
//!   `FAILED`, `ERROR`, `SKIPPED`).
//! - **TestResult**: full mapping of test-node identifiers to statuses for
//!   one instance, rebuilt from raw log text on every run.
//! - **Registry**: lookup table from repo slug to parser, open to new
//!   projects without touching any consumer.

pub mod django;
pub mod pytest;
pub mod sympy;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Normalized outcome of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    #[serde(rename = "PASSED")]
    Passed,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "SKIPPED")]
    Skipped,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TestStatus::Passed => "PASSED",
            TestStatus::Failed => "FAILED",
            TestStatus::Error => "ERROR",
            TestStatus::Skipped => "SKIPPED",
        };
        write!(f, "{s}")
    }
}

/// Mapping from test-node identifier (project-specific format, may include
/// parenthetical qualifiers) to its observed status.
pub type TestResult = BTreeMap<String, TestStatus>;

/// A parser for one project's raw test-runner output.
///
/// Implementors receive the full log text and return every test outcome
/// they can recognise; unrecognised lines are ignored rather than treated
/// as errors, since real logs interleave build output and stack traces
/// with the result lines.
pub trait LogParser: Send + Sync {
    fn parse(&self, log: &str) -> TestResult;
}

static PARSERS: Lazy<HashMap<&'static str, Box<dyn LogParser>>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, Box<dyn LogParser>> = HashMap::new();
    map.insert("django/django", Box::new(django::DjangoParser));
    map.insert("sympy/sympy", Box::new(sympy::SympyParser));

    // Projects whose suites run under plain pytest share one parser.
    for slug in [
        "astropy/astropy",
        "matplotlib/matplotlib",
        "mwaskom/seaborn",
        "pallets/flask",
        "psf/requests",
        "pydata/xarray",
        "pylint-dev/pylint",
        "pytest-dev/pytest",
        "scikit-learn/scikit-learn",
        "sphinx-doc/sphinx",
    ] {
        map.insert(slug, Box::new(pytest::PytestParser));
    }
    map
});

/// Look up the parser registered for a repository slug.
///
/// Returns `None` for unsupported projects; callers decide whether that is
/// fatal (here it never is — the instance is skipped).
pub fn parser_for(repo_slug: &str) -> Option<&'static dyn LogParser> {
    PARSERS.get(repo_slug).map(|p| p.as_ref())
}

/// Slugs with a registered parser, sorted for stable diagnostics.
pub fn supported_repos() -> Vec<&'static str> {
    let mut slugs: Vec<_> = PARSERS.keys().copied().collect();
    slugs.sort_unstable();
    slugs
}
