//! Log-parser dispatch: resolve an instance directory to its project's
//! parser and turn the raw log file into a [`TestResult`].

use crate::error::EnsembleError;
use crate::instance::{instance_id_from_path, repo_from_instance_id};
use log_parsers::TestResult;
use std::fs;
use std::path::Path;

/// Fixed name of the raw test log inside every instance directory.
pub const TEST_OUTPUT_FILE: &str = "test_output.txt";

/// Parse the test log of one instance directory.
///
/// The directory name is the instance id; it is resolved to a repository
/// slug, the registered parser is looked up, and the fixed-name log file is
/// read and parsed. The log is decoded lossily since real test output often
/// contains invalid UTF-8.
///
/// # Errors
///
/// * [`EnsembleError::MalformedId`] — directory name is not a valid instance id.
/// * [`EnsembleError::UnsupportedRepo`] — no parser registered for the project.
/// * [`EnsembleError::LogNotFound`] — the log file is absent.
/// * [`EnsembleError::Io`] — the log file could not be read.
///
/// All of these are skip-with-warning conditions at every call site.
pub fn parse_test_logs(instance_dir: &Path) -> Result<TestResult, EnsembleError> {
    let instance_id = instance_id_from_path(instance_dir);
    let repo = repo_from_instance_id(&instance_id)?;

    let parser =
        log_parsers::parser_for(&repo).ok_or_else(|| EnsembleError::UnsupportedRepo(repo.clone()))?;

    let log_path = instance_dir.join(TEST_OUTPUT_FILE);
    if !log_path.exists() {
        return Err(EnsembleError::LogNotFound(log_path.display().to_string()));
    }

    let bytes = fs::read(&log_path).map_err(|e| {
        EnsembleError::Io(format!("Failed to read {}: {e}", log_path.display()))
    })?;
    let content = String::from_utf8_lossy(&bytes);

    Ok(parser.parse(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use log_parsers::TestStatus;
    use std::fs;
    use tempfile::TempDir;

    fn instance_dir(root: &TempDir, instance_id: &str, log: Option<&str>) -> std::path::PathBuf {
        let dir = root.path().join(instance_id);
        fs::create_dir_all(&dir).unwrap();
        if let Some(content) = log {
            fs::write(dir.join(TEST_OUTPUT_FILE), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_dispatch_to_django_parser() {
        let root = TempDir::new().unwrap();
        let dir = instance_dir(
            &root,
            "django__django-15104",
            Some("test_fk (m.Cls) ... ok\nFAIL: test_pk (m.Cls)"),
        );

        let results = parse_test_logs(&dir).unwrap();
        assert_eq!(results["test_fk (m.Cls)"], TestStatus::Passed);
        assert_eq!(results["test_pk (m.Cls)"], TestStatus::Failed);
    }

    #[test]
    fn test_unsupported_repo() {
        let root = TempDir::new().unwrap();
        let dir = instance_dir(&root, "acme__widgets-1", Some(""));

        match parse_test_logs(&dir) {
            Err(EnsembleError::UnsupportedRepo(repo)) => assert_eq!(repo, "acme/widgets"),
            other => panic!("expected UnsupportedRepo, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_directory_name() {
        let root = TempDir::new().unwrap();
        let dir = instance_dir(&root, "not_an_instance", Some(""));

        assert!(matches!(
            parse_test_logs(&dir),
            Err(EnsembleError::MalformedId(_))
        ));
    }

    #[test]
    fn test_missing_log_file() {
        let root = TempDir::new().unwrap();
        let dir = instance_dir(&root, "django__django-11001", None);

        assert!(matches!(
            parse_test_logs(&dir),
            Err(EnsembleError::LogNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let root = TempDir::new().unwrap();
        let dir = instance_dir(&root, "django__django-11001", None);
        let mut bytes = b"test_a (m.C) ... ok\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        fs::write(dir.join(TEST_OUTPUT_FILE), bytes).unwrap();

        let results = parse_test_logs(&dir).unwrap();
        assert_eq!(results["test_a (m.C)"], TestStatus::Passed);
    }
}
