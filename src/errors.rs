//! Typed error definitions for atomic_mv.
//! Every fatal outcome of a move is one of these; the cross-device signal is
//! not an error and lives in `fs_ops::MoveOutcome`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::describe_io_error;

#[derive(Debug, Error)]
pub enum AtomicMvError {
    #[error("{0}")]
    Usage(String),

    #[error("Source is not a regular file: {0}")]
    NotRegularFile(PathBuf),

    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("Destination has no file name: {0}")]
    InvalidDestination(PathBuf),

    #[error("Staging file already exists (left over from an earlier run?): {0}")]
    StagingCollision(PathBuf),

    #[error("{}", describe_io_error(.op, .path, .source))]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to allocate a {bytes} byte copy buffer")]
    Allocation { bytes: usize },
}

impl AtomicMvError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u8 {
        match self {
            AtomicMvError::Usage(_) => 2,
            AtomicMvError::NotRegularFile(_) => 3,
            AtomicMvError::DestinationExists(_) => 4,
            AtomicMvError::InvalidDestination(_) => 5,
            AtomicMvError::StagingCollision(_) => 6,
            AtomicMvError::Io { .. } => 7,
            AtomicMvError::Allocation { .. } => 8,
        }
    }

    /// Short machine-friendly name, used as the `kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AtomicMvError::Usage(_) => "usage",
            AtomicMvError::NotRegularFile(_) => "not_regular_file",
            AtomicMvError::DestinationExists(_) => "destination_exists",
            AtomicMvError::InvalidDestination(_) => "invalid_destination",
            AtomicMvError::StagingCollision(_) => "staging_collision",
            AtomicMvError::Io { .. } => "io",
            AtomicMvError::Allocation { .. } => "allocation",
        }
    }

    /// Build an `Io` variant; `op` names the failing operation.
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| AtomicMvError::Io { op, path, source }
    }

    /// Underlying OS error, if this failure came from a system call.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            AtomicMvError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AtomicMvError>;
