//! Target directory validation and lifecycle.
//!
//! Parses the operator-supplied directory and count lists, creates
//! missing directories, guards against provisioning into a directory
//! that already holds data, and removes directories created by a run
//! that later failed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{PaverError, PaverResult};

/// Parse a comma-separated directory list into unique absolute paths.
///
/// Order is preserved: the count list correlates with directories by
/// position. Duplicates after normalization are a configuration error,
/// reported with the offending index.
pub fn parse_target_dirs(raw: &str) -> PaverResult<Vec<PathBuf>> {
    if raw.is_empty() {
        return Err(PaverError::Config(
            "require at least one plot directory".into(),
        ));
    }

    let mut dirs = Vec::new();
    for (i, entry) in raw.split(',').enumerate() {
        let abs = std::path::absolute(entry).map_err(|e| {
            PaverError::storage(format!("cannot resolve plot directory {:?}", entry), e)
        })?;
        if dirs.contains(&abs) {
            return Err(PaverError::DuplicateDir {
                index: i,
                path: abs,
            });
        }
        dirs.push(abs);
    }
    Ok(dirs)
}

/// Parse a comma-separated plot count list against the directory count.
///
/// An empty string means "auto" (0) for every directory. Otherwise the
/// list length must match `dirs`, and every entry must be a
/// non-negative integer.
pub fn parse_plot_counts(raw: &str, dirs: usize) -> PaverResult<Vec<u32>> {
    if raw.is_empty() {
        return Ok(vec![0; dirs]);
    }

    let entries: Vec<&str> = raw.split(',').collect();
    if entries.len() != dirs {
        return Err(PaverError::CountListLength {
            expected: dirs,
            actual: entries.len(),
        });
    }

    let mut counts = Vec::with_capacity(dirs);
    for (i, entry) in entries.iter().enumerate() {
        let n: u32 = entry
            .trim()
            .parse()
            .map_err(|_| PaverError::InvalidCount {
                index: i,
                value: entry.to_string(),
            })?;
        counts.push(n);
    }
    Ok(counts)
}

/// Create missing target directories, recording each one created into
/// `created` so the caller can roll them back on a later failure.
///
/// `created` is filled incrementally: on error it holds exactly the
/// directories this call managed to create before failing.
pub fn ensure_dirs(dirs: &[PathBuf], created: &mut Vec<PathBuf>) -> PaverResult<()> {
    for dir in dirs {
        match fs::metadata(dir) {
            Ok(meta) => {
                if !meta.is_dir() {
                    return Err(PaverError::NotADirectory { path: dir.clone() });
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::create_dir_all(dir).map_err(|e| {
                    PaverError::storage(format!("cannot create plot directory {}", dir.display()), e)
                })?;
                tracing::debug!(path = %dir.display(), "created plot directory");
                created.push(dir.clone());
            }
            Err(e) => {
                return Err(PaverError::storage(
                    format!("cannot stat plot directory {}", dir.display()),
                    e,
                ));
            }
        }
    }
    Ok(())
}

/// Fail on the first directory that holds any entry.
///
/// A provisioning run must never write into a directory with prior
/// data; the operator has to back up and remove it first.
pub fn check_empty(dirs: &[PathBuf]) -> PaverResult<()> {
    for dir in dirs {
        let mut entries = fs::read_dir(dir).map_err(|e| {
            PaverError::storage(format!("cannot read plot directory {}", dir.display()), e)
        })?;
        if entries.next().is_some() {
            return Err(PaverError::DirNotEmpty { path: dir.clone() });
        }
    }
    Ok(())
}

/// Best-effort removal of directories created during a failed run.
///
/// The run has already failed for another reason; removal failures are
/// logged as warnings and never escalated.
pub fn remove_created_dirs(dirs: &[PathBuf]) {
    for dir in dirs {
        if let Err(e) = fs::remove_dir(dir) {
            tracing::warn!(path = %dir.display(), error = %e, "failed to remove created plot directory");
        } else {
            tracing::debug!(path = %dir.display(), "removed created plot directory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_target_dirs_empty() {
        let err = parse_target_dirs("").unwrap_err();
        assert!(matches!(err, PaverError::Config(_)));
    }

    #[test]
    fn test_parse_target_dirs_absolute_order_preserved() {
        let dirs = parse_target_dirs("/plots/b,/plots/a").unwrap();
        assert_eq!(
            dirs,
            vec![PathBuf::from("/plots/b"), PathBuf::from("/plots/a")]
        );
    }

    #[test]
    fn test_parse_target_dirs_duplicate_cites_index() {
        let err = parse_target_dirs("/plots/a,/plots/a").unwrap_err();
        match err {
            PaverError::DuplicateDir { index, path } => {
                assert_eq!(index, 1);
                assert_eq!(path, PathBuf::from("/plots/a"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_target_dirs_duplicate_after_normalization() {
        // Same directory spelled two ways.
        let err = parse_target_dirs("/plots/a,/plots/./a").unwrap_err();
        assert!(matches!(err, PaverError::DuplicateDir { index: 1, .. }));
    }

    #[test]
    fn test_parse_target_dirs_idempotent() {
        let first = parse_target_dirs("/plots/a,/plots/b").unwrap();
        let raw: Vec<String> = first.iter().map(|p| p.display().to_string()).collect();
        let second = parse_target_dirs(&raw.join(",")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_plot_counts_empty_means_auto() {
        assert_eq!(parse_plot_counts("", 3).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_parse_plot_counts_length_mismatch() {
        let err = parse_plot_counts("1,2", 3).unwrap_err();
        match err {
            PaverError::CountListLength { expected, actual } => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_plot_counts_invalid_value() {
        let err = parse_plot_counts("1,x,3", 3).unwrap_err();
        assert!(matches!(err, PaverError::InvalidCount { index: 1, .. }));

        // Negative numbers do not parse as u32.
        let err = parse_plot_counts("1,-2,3", 3).unwrap_err();
        assert!(matches!(err, PaverError::InvalidCount { index: 1, .. }));
    }

    #[test]
    fn test_ensure_dirs_creates_missing_only() {
        let tmp = TempDir::new().unwrap();
        let existing = tmp.path().join("existing");
        fs::create_dir(&existing).unwrap();
        let fresh = tmp.path().join("fresh/nested");

        let dirs = vec![existing.clone(), fresh.clone()];
        let mut created = Vec::new();
        ensure_dirs(&dirs, &mut created).unwrap();

        assert!(fresh.is_dir());
        assert_eq!(created, vec![fresh]);
    }

    #[test]
    fn test_ensure_dirs_rejects_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plot");
        fs::write(&file, b"data").unwrap();

        let mut created = Vec::new();
        let err = ensure_dirs(&[file.clone()], &mut created).unwrap_err();
        assert!(matches!(err, PaverError::NotADirectory { .. }));
        assert!(created.is_empty());
    }

    #[test]
    fn test_check_empty() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty");
        let full = tmp.path().join("full");
        fs::create_dir(&empty).unwrap();
        fs::create_dir(&full).unwrap();
        fs::write(full.join("stale.bin"), b"x").unwrap();

        check_empty(&[empty.clone()]).unwrap();
        let err = check_empty(&[empty, full.clone()]).unwrap_err();
        match err {
            PaverError::DirNotEmpty { path } => assert_eq!(path, full),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_remove_created_dirs_best_effort() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("gone");
        fs::create_dir(&gone).unwrap();
        let never_existed = tmp.path().join("never");

        // Must not panic or error on missing paths.
        remove_created_dirs(&[gone.clone(), never_existed]);
        assert!(!gone.exists());
    }
}
