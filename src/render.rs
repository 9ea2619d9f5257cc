//! Human-facing report lines.

use std::fmt::Write as _;

use anchorpatch_core::{
    DiffBundle, OperationRecord, PatchError, PatchOutcome, PatchReport, Recipe,
};
use anstyle::{AnsiColor, Color, Effects, Style};
use is_terminal::IsTerminal;

const RULE_WIDTH: usize = 60;

pub struct ReportRenderer {
    styled: bool,
}

impl ReportRenderer {
    pub fn new(styled: bool) -> Self {
        Self { styled }
    }

    pub fn for_stdout() -> Self {
        Self::new(std::io::stdout().is_terminal())
    }

    pub fn for_stderr() -> Self {
        Self::new(std::io::stderr().is_terminal())
    }

    fn paint(&self, text: &str, color: AnsiColor, effects: Effects) -> String {
        if !self.styled {
            return text.to_string();
        }
        let style = Style::new()
            .fg_color(Some(Color::Ansi(color)))
            .effects(effects);
        format!("{style}{text}{}", style.render_reset())
    }

    pub fn header(&self, recipe: &Recipe, report: &PatchReport) -> String {
        let title = format!(
            "anchorpatch: recipe '{}' on {}",
            recipe.name,
            report.target.display()
        );
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.paint(&title, AnsiColor::Cyan, Effects::BOLD));
        let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
        match &report.backup {
            Some(backup) => {
                let _ = writeln!(out, "Backup created: {}", backup.display());
            }
            None => {
                let _ = writeln!(
                    out,
                    "{}",
                    self.paint("Dry run: nothing will be written", AnsiColor::Yellow, Effects::new())
                );
            }
        }
        out
    }

    pub fn record_line(&self, record: &OperationRecord, total: usize) -> String {
        let marker = format!("[{}/{}]", record.index, total);
        match record.outcome {
            PatchOutcome::Applied { occurrences } => {
                let detail = if occurrences == 1 {
                    String::new()
                } else {
                    format!(" ({occurrences} occurrences)")
                };
                format!(
                    "{marker} {} {}{detail}",
                    self.paint("Applied:", AnsiColor::Green, Effects::BOLD),
                    record.label
                )
            }
            PatchOutcome::Skipped { reason } => format!(
                "{marker} {} {} ({reason})",
                self.paint("Skipped:", AnsiColor::Yellow, Effects::BOLD),
                record.label
            ),
        }
    }

    pub fn summary(&self, report: &PatchReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
        let totals = format!(
            "{} applied, {} skipped, {} total",
            report.applied(),
            report.skipped(),
            report.total()
        );
        let color = if report.is_complete() {
            AnsiColor::Green
        } else {
            AnsiColor::Yellow
        };
        let _ = writeln!(out, "{}", self.paint(&totals, color, Effects::BOLD));

        let target = report.target.display();
        match &report.backup {
            Some(backup) => {
                let backup = backup.display();
                let _ = writeln!(out);
                let _ = writeln!(out, "Next steps:");
                let _ = writeln!(out, "  1. Review the patched file: {target}");
                let _ = writeln!(out, "  2. When satisfied, delete the backup: rm {backup}");
                let _ = writeln!(out, "  3. To undo, restore it: mv {backup} {target}");
            }
            None if report.changed => {
                let _ = writeln!(out, "Run again without --dry-run to write {target}");
            }
            None => {
                let _ = writeln!(out, "No changes for {target}");
            }
        }
        out
    }

    pub fn diff(&self, bundle: &DiffBundle) -> String {
        if bundle.is_empty {
            return "No differences\n".to_string();
        }
        let mut out = String::new();
        for line in bundle.formatted.lines() {
            let painted = if line.starts_with("+++") || line.starts_with("---") {
                self.paint(line, AnsiColor::White, Effects::BOLD)
            } else if line.starts_with('+') {
                self.paint(line, AnsiColor::Green, Effects::new())
            } else if line.starts_with('-') {
                self.paint(line, AnsiColor::Red, Effects::new())
            } else if line.starts_with("@@") {
                self.paint(line, AnsiColor::Cyan, Effects::new())
            } else {
                line.to_string()
            };
            let _ = writeln!(out, "{painted}");
        }
        let _ = writeln!(
            out,
            "{} insertions(+), {} deletions(-)",
            bundle.insertions, bundle.deletions
        );
        out
    }

    pub fn report(&self, recipe: &Recipe, report: &PatchReport) -> String {
        let mut out = self.header(recipe, report);
        for record in &report.records {
            let _ = writeln!(out, "{}", self.record_line(record, report.total()));
        }
        out.push_str(&self.summary(report));
        out
    }

    pub fn fatal(&self, err: &anyhow::Error) -> String {
        let mut out = format!(
            "{} {err:#}",
            self.paint("error:", AnsiColor::Red, Effects::BOLD)
        );
        let patch_err = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<PatchError>());
        if let Some(patch_err) = patch_err {
            let records = patch_err.records();
            for record in records {
                let _ = write!(out, "\n{}", self.record_line(record, records.len()));
            }
        }
        let hint = patch_err.and_then(|patch_err| match patch_err {
            PatchError::TargetNotFound { .. } => Some(
                "run from the project root or pass --target / --workspace".to_string(),
            ),
            PatchError::TargetWrite { path, backup, .. } => Some(format!(
                "the original is intact in {}; restore with: mv {} {}",
                backup.display(),
                backup.display(),
                path.display()
            )),
            _ => None,
        });
        if let Some(hint) = hint {
            let _ = write!(out, "\n  {} {hint}", self.paint("hint:", AnsiColor::Cyan, Effects::BOLD));
        }
        out
    }
}
