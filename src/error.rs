use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single planned action (rewrite or rename) on one entry.
///
/// These are collected into the run report instead of aborting the run,
/// unless `--fail-fast` is set.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The file could not be read, written, or renamed.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not text in an encoding we can round-trip.
    #[error("Cannot decode {path:?} as text: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// The rename target is already taken.
    #[error("Cannot rename {from:?}: {to:?} already exists")]
    Conflict { from: PathBuf, to: PathBuf },
}

impl RenameError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenameError::Io { path: path.into(), source }
    }

    /// Short machine-readable class, used in the JSON report.
    pub fn kind(&self) -> &'static str {
        match self {
            RenameError::Io { .. } => "io",
            RenameError::Decode { .. } => "decode",
            RenameError::Conflict { .. } => "conflict",
        }
    }
}
