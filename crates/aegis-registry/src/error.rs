//! Revocation registry errors

use std::path::{Path, PathBuf};

/// Failures opening, replaying, or appending to the revocation log.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The log file could not be created or opened.
    #[error("revocation log open failed at {}: {reason}", .path.display())]
    Open {
        /// Log file path.
        path: PathBuf,
        /// Underlying io error message.
        reason: String,
    },

    /// A revocation record could not be appended durably.
    #[error("revocation log append failed: {reason}")]
    Append {
        /// Underlying io or serializer message.
        reason: String,
    },

    /// An existing log line failed to parse during startup replay.
    #[error("revocation log replay failed at {} line {line}: {reason}", .path.display())]
    Replay {
        /// Log file path.
        path: PathBuf,
        /// 1-based line number of the bad record.
        line: usize,
        /// Underlying parse error message.
        reason: String,
    },
}

impl RegistryError {
    pub(crate) fn open(path: &Path, err: std::io::Error) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn append(err: std::io::Error) -> Self {
        Self::Append {
            reason: err.to_string(),
        }
    }

    pub(crate) fn replay(path: &Path, line: usize, reason: impl Into<String>) -> Self {
        Self::Replay {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}
