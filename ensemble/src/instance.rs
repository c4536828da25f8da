//! Instance-id handling: deriving the owning repository from an instance id
//! and recovering an instance id from a directory path.
//!
//! An instance id has the form `<owner>__<repo>-<number>`, e.g.
//! `django__django-15104`.

use crate::error::EnsembleError;
use std::path::Path;

/// Derive the `owner/repo` slug from an instance id.
///
/// Splits off the trailing `-<number>` on the last hyphen, then splits the
/// remainder on `__`. Owners and repos containing hyphens therefore resolve
/// correctly (`scikit-learn__scikit-learn-13142` → `scikit-learn/scikit-learn`).
///
/// # Errors
///
/// Returns [`EnsembleError::MalformedId`] when the remainder does not
/// contain a `__` separator. Callers treat this as skip-with-warning, never
/// as fatal to the overall run.
pub fn repo_from_instance_id(instance_id: &str) -> Result<String, EnsembleError> {
    let stem = match instance_id.rsplit_once('-') {
        Some((stem, _number)) => stem,
        None => instance_id,
    };

    let mut parts = stem.split("__");
    let owner = parts.next().unwrap_or_default();
    match parts.next() {
        Some(repo) if !owner.is_empty() && !repo.is_empty() => Ok(format!("{owner}/{repo}")),
        _ => Err(EnsembleError::MalformedId(instance_id.to_string())),
    }
}

/// The instance id is the final component of an instance directory path.
pub fn instance_id_from_path(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
