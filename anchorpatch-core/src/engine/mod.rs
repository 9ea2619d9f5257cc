//! Load, back up, patch and persist a single target file.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::buffer::SourceBuffer;
use crate::error::PatchError;
use crate::operation::{PatchOperation, RerunPolicy};
use crate::outcome::PatchReport;

mod io;
mod journal;
mod planner;
mod runner;

pub use io::backup_path_for;

pub const DEFAULT_BACKUP_SUFFIX: &str = ".backup";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Appended to the target path to name the backup file.
    pub backup_suffix: String,
    pub rerun: RerunPolicy,
    /// Compute the report without writing the backup or the target.
    pub dry_run: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            rerun: RerunPolicy::default(),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatchEngine {
    options: EngineOptions,
}

impl PatchEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn backup_path(&self, target: &Path) -> PathBuf {
        backup_path_for(target, &self.options.backup_suffix)
    }

    /// Runs `operations` against `target` in declaration order.
    ///
    /// A missing target aborts before anything is written. The backup is
    /// written with the target's permissions and verified before the target is
    /// touched, and the target is rewritten even when every operation skips.
    pub async fn run(
        &self,
        target: &Path,
        operations: &[PatchOperation],
    ) -> Result<PatchReport, PatchError> {
        let plan = planner::plan_run(target, operations).await?;
        let original = io::read_source(&plan.target).await?;
        debug!(
            file = %plan.target.display(),
            bytes = original.len(),
            operations = operations.len(),
            "loaded target"
        );

        let backup = if self.options.dry_run {
            None
        } else {
            let backup = self.backup_path(&plan.target);
            io::write_backup(&backup, &original, plan.permissions.clone()).await?;
            info!(backup = %backup.display(), "backup created");
            Some(backup)
        };

        let (buffer, records) =
            runner::execute_plan(&plan, SourceBuffer::new(original.as_str()), self.options.rerun);
        let patched = buffer.into_string();

        if let Some(backup) = &backup {
            if let Err(err) =
                io::write_atomically(&plan.target, &patched, Some(plan.permissions.clone())).await
            {
                error!(
                    file = %plan.target.display(),
                    backup = %backup.display(),
                    error = %err,
                    "failed to write patched target; restore from the backup"
                );
                return Err(PatchError::TargetWrite {
                    path: plan.target,
                    backup: backup.clone(),
                    patched,
                    records,
                    source: Box::new(err),
                });
            }
            debug!(file = %plan.target.display(), bytes = patched.len(), "target written");
        }

        Ok(PatchReport {
            changed: patched != original,
            target: plan.target,
            backup,
            records,
            dry_run: self.options.dry_run,
            original,
            patched,
        })
    }
}
