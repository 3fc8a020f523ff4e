//! Error types for paver.
//!
//! A small closed set of tagged kinds so callers can branch
//! programmatically; the human-readable rendering lives in the
//! `Display` impls. Every kind is fatal — rollback of partial side
//! effects always runs before one of these surfaces, and rollback
//! failures are downgraded to warnings so they never mask the
//! original error.

use std::path::PathBuf;

pub type PaverResult<T> = Result<T, PaverError>;

#[derive(Debug, thiserror::Error)]
pub enum PaverError {
    /// Malformed or invalid operator input (config file, passwords,
    /// empty directory list).
    #[error("{0}")]
    Config(String),

    /// The same directory appears twice after absolute-path
    /// normalization.
    #[error("duplicate plot directory at index {index}: {}", .path.display())]
    DuplicateDir { index: usize, path: PathBuf },

    /// The plot count list does not line up with the directory list.
    #[error("plot count list must have {expected} entries, got {actual}")]
    CountListLength { expected: usize, actual: usize },

    /// A plot count entry failed to parse as a non-negative integer.
    #[error("invalid plot count at index {index}: {value:?}")]
    InvalidCount { index: usize, value: String },

    /// A target path exists but is not a directory.
    #[error("plot directory is not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },

    /// A pre-existing target directory holds prior data. Provisioning
    /// never writes into one; the operator must back up and remove.
    #[error("plot directory must be empty: {} (back up and remove its contents first)", .path.display())]
    DirNotEmpty { path: PathBuf },

    /// The disk usage oracle could not answer for a path.
    #[error("cannot read disk usage for {}: {reason}", .path.display())]
    DiskUsage { path: PathBuf, reason: String },

    /// Every target directory resolved to zero capacity.
    #[error("not enough free disk space: every plot directory resolved to zero capacity")]
    InsufficientSpace,

    /// The key supplier failed. Non-retryable.
    #[error("key source failure: {0}")]
    KeySource(String),

    /// Filesystem I/O failure with context.
    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PaverError {
    /// Wrap an I/O error with a human-readable context line.
    pub fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }
}
