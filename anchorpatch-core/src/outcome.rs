use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::operation::OperationKind;

/// Why an operation left the buffer alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    AnchorNotFound,
    /// The replacement text is already in the buffer.
    AlreadyApplied,
}

impl SkipReason {
    pub fn describe(self) -> &'static str {
        match self {
            SkipReason::AnchorNotFound => "anchor not found",
            SkipReason::AlreadyApplied => "replacement already present",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PatchOutcome {
    Applied { occurrences: usize },
    Skipped { reason: SkipReason },
}

impl PatchOutcome {
    pub(crate) fn applied(occurrences: usize) -> Self {
        PatchOutcome::Applied { occurrences }
    }

    pub(crate) fn skipped(reason: SkipReason) -> Self {
        PatchOutcome::Skipped { reason }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, PatchOutcome::Applied { .. })
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            PatchOutcome::Skipped { reason } => Some(*reason),
            PatchOutcome::Applied { .. } => None,
        }
    }
}

/// Outcome of one operation, tagged with its position in the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationRecord {
    /// 1-based position in declaration order.
    pub index: usize,
    pub label: String,
    pub kind: OperationKind,
    pub outcome: PatchOutcome,
}

/// Structured result of a run, returned to programmatic callers.
#[derive(Debug, Clone)]
pub struct PatchReport {
    pub target: PathBuf,
    /// `None` for dry runs, where nothing is written.
    pub backup: Option<PathBuf>,
    pub records: Vec<OperationRecord>,
    pub changed: bool,
    pub dry_run: bool,
    pub original: String,
    pub patched: String,
}

/// Serialized shape of a [`PatchReport`]: counts up front, file contents left out.
#[derive(Serialize)]
struct ReportSummary<'a> {
    target: &'a Path,
    backup: Option<&'a Path>,
    applied: usize,
    skipped: usize,
    changed: bool,
    dry_run: bool,
    records: &'a [OperationRecord],
}

impl Serialize for PatchReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ReportSummary {
            target: &self.target,
            backup: self.backup.as_deref(),
            applied: self.applied(),
            skipped: self.skipped(),
            changed: self.changed,
            dry_run: self.dry_run,
            records: &self.records,
        }
        .serialize(serializer)
    }
}

impl PatchReport {
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn applied(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.outcome.is_applied())
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.total() - self.applied()
    }

    pub fn skipped_with(&self, reason: SkipReason) -> usize {
        self.records
            .iter()
            .filter(|record| record.outcome.skip_reason() == Some(reason))
            .count()
    }

    /// True when no operation was skipped.
    pub fn is_complete(&self) -> bool {
        self.skipped() == 0
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
