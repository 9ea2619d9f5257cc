use std::path::PathBuf;
use std::time::SystemTimeError;

use thiserror::Error;

use crate::outcome::OperationRecord;

/// Fatal conditions raised by the patch engine.
///
/// Missing anchors are not errors; they surface as
/// [`SkipReason`](crate::SkipReason) entries in the report.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("target file not found: {}", .path.display())]
    TargetNotFound { path: PathBuf },

    #[error("invalid target {}: {reason}", .path.display())]
    InvalidTarget { path: PathBuf, reason: String },

    #[error("invalid operation '{label}': {reason}")]
    InvalidOperation { label: String, reason: String },

    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("backup {} does not match the original content", .path.display())]
    BackupMismatch { path: PathBuf },

    #[error(
        "failed to write patched {}; original content is preserved in {}: {source}",
        .path.display(),
        .backup.display()
    )]
    TargetWrite {
        path: PathBuf,
        backup: PathBuf,
        /// Patched buffer that could not be persisted.
        patched: String,
        /// Per-operation outcomes that went into `patched`.
        records: Vec<OperationRecord>,
        #[source]
        source: Box<PatchError>,
    },

    #[error("failed to derive temporary path for {}: {source}", .path.display())]
    TempPath {
        path: PathBuf,
        #[source]
        source: SystemTimeError,
    },
}

impl PatchError {
    /// Buffer left over from a failed target write, if any.
    pub fn unsaved_buffer(&self) -> Option<&str> {
        match self {
            PatchError::TargetWrite { patched, .. } => Some(patched),
            _ => None,
        }
    }

    /// Per-operation outcomes of a run whose target write failed.
    pub fn records(&self) -> &[OperationRecord] {
        match self {
            PatchError::TargetWrite { records, .. } => records,
            _ => &[],
        }
    }
}
