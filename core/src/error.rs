use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::document::DocId;

pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors surfaced by index operations.
///
/// `NotFound` and `LockConflict` are expected conditions the caller handles;
/// `InvariantViolation` signals a bug in the mutation path and is never
/// silently swallowed.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("document {0} not found")]
    NotFound(DocId),

    #[error("index invariant violated: {0}")]
    InvariantViolation(String),

    #[error("{op} failed")]
    Io {
        op: String,
        #[source]
        source: io::Error,
    },

    #[error("index at {} is locked by another writer", path.display())]
    LockConflict {
        path: PathBuf,
        /// Owning PID when the lock file could be read.
        pid: Option<u32>,
    },
}

impl SearchError {
    pub(crate) fn io(op: impl Into<String>, source: io::Error) -> Self {
        SearchError::Io {
            op: op.into(),
            source,
        }
    }

    pub(crate) fn codec(op: impl Into<String>, source: bincode::Error) -> Self {
        SearchError::Io {
            op: op.into(),
            source: io::Error::new(io::ErrorKind::InvalidData, source),
        }
    }

    /// Whether retrying the failed operation can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SearchError::Io { .. } | SearchError::LockConflict { .. }
        )
    }
}
