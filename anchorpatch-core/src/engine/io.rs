use std::ffi::OsString;
use std::fs::Permissions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::error::PatchError;

/// Writes into a sibling temp file and renames it over the destination, so
/// readers only ever see the old or the complete new content.
pub(super) struct AtomicWriter {
    path: PathBuf,
    temp_path: PathBuf,
    writer: BufWriter<fs::File>,
    permissions: Option<Permissions>,
}

impl AtomicWriter {
    pub(super) async fn create(
        path: &Path,
        permissions: Option<Permissions>,
    ) -> Result<Self, PatchError> {
        let temp_path = temporary_path(path)?;
        let file = fs::File::create(&temp_path)
            .await
            .map_err(|err| PatchError::Io {
                action: "create",
                path: temp_path.clone(),
                source: err,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            temp_path,
            writer: BufWriter::new(file),
            permissions,
        })
    }

    pub(super) async fn write_all(&mut self, bytes: &[u8]) -> Result<(), PatchError> {
        self.writer
            .write_all(bytes)
            .await
            .map_err(|err| PatchError::Io {
                action: "write",
                path: self.temp_path.clone(),
                source: err,
            })
    }

    pub(super) async fn commit(mut self) -> Result<(), PatchError> {
        if let Err(err) = self.flush_to_disk().await {
            discard_temp(&self.temp_path).await;
            return Err(err);
        }

        let AtomicWriter {
            path,
            temp_path,
            writer,
            permissions,
        } = self;
        drop(writer);

        if let Some(permissions) = permissions {
            if let Err(err) = fs::set_permissions(&temp_path, permissions).await {
                discard_temp(&temp_path).await;
                return Err(PatchError::Io {
                    action: "set permissions",
                    path: temp_path,
                    source: err,
                });
            }
        }

        match fs::rename(&temp_path, &path).await {
            Ok(()) => Ok(()),
            Err(err) => {
                discard_temp(&temp_path).await;
                Err(PatchError::Io {
                    action: "rename",
                    path,
                    source: err,
                })
            }
        }
    }

    pub(super) async fn rollback(self) {
        let AtomicWriter {
            temp_path, writer, ..
        } = self;
        drop(writer);
        discard_temp(&temp_path).await;
    }

    async fn flush_to_disk(&mut self) -> Result<(), PatchError> {
        self.writer.flush().await.map_err(|err| PatchError::Io {
            action: "flush",
            path: self.temp_path.clone(),
            source: err,
        })?;
        self.writer
            .get_ref()
            .sync_all()
            .await
            .map_err(|err| PatchError::Io {
                action: "sync",
                path: self.temp_path.clone(),
                source: err,
            })
    }
}

async fn discard_temp(temp_path: &Path) {
    match fs::remove_file(temp_path).await {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => debug!(
            path = %temp_path.display(),
            error = %err,
            "failed to remove temporary file"
        ),
    }
}

pub(super) async fn write_atomically(
    path: &Path,
    contents: &str,
    permissions: Option<Permissions>,
) -> Result<(), PatchError> {
    let mut writer = AtomicWriter::create(path, permissions).await?;
    if let Err(err) = writer.write_all(contents.as_bytes()).await {
        writer.rollback().await;
        return Err(err);
    }
    writer.commit().await
}

pub(super) async fn read_source(path: &Path) -> Result<String, PatchError> {
    fs::read_to_string(path)
        .await
        .map_err(|err| PatchError::Io {
            action: "read",
            path: path.to_path_buf(),
            source: err,
        })
}

/// Writes the snapshot and reads it back, so a short or failed write never
/// goes unnoticed before the target is touched.
pub(super) async fn write_backup(
    path: &Path,
    original: &str,
    permissions: Permissions,
) -> Result<(), PatchError> {
    write_atomically(path, original, Some(permissions)).await?;

    let written = fs::read(path).await.map_err(|err| PatchError::Io {
        action: "verify",
        path: path.to_path_buf(),
        source: err,
    })?;
    if written != original.as_bytes() {
        return Err(PatchError::BackupMismatch {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), bytes = written.len(), "backup verified");
    Ok(())
}

/// `src/App.js` + `.backup` -> `src/App.js.backup`.
pub fn backup_path_for(target: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = target.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

fn temporary_path(target: &Path) -> Result<PathBuf, PatchError> {
    let parent = target
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = target
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("anchorpatch");
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| PatchError::TempPath {
            path: target.to_path_buf(),
            source: err,
        })?
        .as_nanos();
    let pid = std::process::id();
    Ok(parent.join(format!(".{file_name}.{pid}.{timestamp}.tmp")))
}
