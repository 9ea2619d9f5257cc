use std::fs::Permissions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::PatchError;
use crate::operation::PatchOperation;

/// Everything checked before the first byte is written.
pub(super) struct PreparedRun<'a> {
    pub(super) target: PathBuf,
    pub(super) permissions: Permissions,
    pub(super) operations: &'a [PatchOperation],
}

pub(super) async fn plan_run<'a>(
    target: &Path,
    operations: &'a [PatchOperation],
) -> Result<PreparedRun<'a>, PatchError> {
    let metadata = fs::metadata(target).await.map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            PatchError::TargetNotFound {
                path: target.to_path_buf(),
            }
        } else {
            PatchError::Io {
                action: "inspect",
                path: target.to_path_buf(),
                source: err,
            }
        }
    })?;

    if metadata.is_dir() {
        return Err(PatchError::InvalidTarget {
            path: target.to_path_buf(),
            reason: "target is a directory".to_string(),
        });
    }

    for operation in operations {
        operation.validate()?;
    }

    Ok(PreparedRun {
        target: target.to_path_buf(),
        permissions: metadata.permissions(),
        operations,
    })
}
