use serde::{Deserialize, Serialize};

use crate::buffer::SourceBuffer;
use crate::error::PatchError;
use crate::outcome::{PatchOutcome, SkipReason};

/// How an operation treats a buffer that already holds its replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerunPolicy {
    /// Skip when the replacement is already present.
    #[default]
    Guarded,
    /// Only look for the anchor. Additive operations insert again on every
    /// rerun; substitutions skip once their anchor is gone.
    Unguarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// The replacement starts with the anchor, so the anchor survives.
    Additive,
    Substitution,
}

/// One anchored edit: replace every `anchor` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOperation {
    label: String,
    anchor: String,
    replacement: String,
}

/// Result of applying one operation to a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub buffer: SourceBuffer,
    pub outcome: PatchOutcome,
}

impl PatchOperation {
    pub fn substitute(
        label: impl Into<String>,
        anchor: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            anchor: anchor.into(),
            replacement: replacement.into(),
        }
    }

    /// Keeps `anchor` in place and appends `text` right after it.
    pub fn insert_after(
        label: impl Into<String>,
        anchor: impl Into<String>,
        text: impl AsRef<str>,
    ) -> Self {
        let anchor = anchor.into();
        let replacement = format!("{anchor}{}", text.as_ref());
        Self {
            label: label.into(),
            anchor,
            replacement,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn kind(&self) -> OperationKind {
        if self.replacement.starts_with(&self.anchor) {
            OperationKind::Additive
        } else {
            OperationKind::Substitution
        }
    }

    pub fn validate(&self) -> Result<(), PatchError> {
        if self.anchor.is_empty() {
            return Err(PatchError::InvalidOperation {
                label: self.label.clone(),
                reason: "anchor must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Guarded runs only rewrite anchors that are not already part of a
    /// replacement, so patched sites are left alone while unpatched ones
    /// elsewhere in the buffer still get replaced.
    pub fn apply(&self, buffer: SourceBuffer, policy: RerunPolicy) -> Step {
        let (buffer, occurrences) = match policy {
            RerunPolicy::Guarded => buffer.replace_uncovered(&self.anchor, &self.replacement),
            RerunPolicy::Unguarded => buffer.replace_all(&self.anchor, &self.replacement),
        };

        let outcome = if occurrences > 0 {
            PatchOutcome::applied(occurrences)
        } else if policy == RerunPolicy::Guarded
            && !self.replacement.is_empty()
            && buffer.contains(&self.replacement)
        {
            PatchOutcome::skipped(SkipReason::AlreadyApplied)
        } else {
            PatchOutcome::skipped(SkipReason::AnchorNotFound)
        };
        Step { buffer, outcome }
    }
}

/// Folds `operations` over `buffer` in declaration order.
pub fn apply_all(
    buffer: SourceBuffer,
    operations: &[PatchOperation],
    policy: RerunPolicy,
) -> (SourceBuffer, Vec<PatchOutcome>) {
    let mut outcomes = Vec::with_capacity(operations.len());
    let buffer = operations.iter().fold(buffer, |buffer, operation| {
        let step = operation.apply(buffer, policy);
        outcomes.push(step.outcome);
        step.buffer
    });
    (buffer, outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append_w() -> PatchOperation {
        PatchOperation::substitute("append W", "X; Y; Z;", "X; Y; Z; W;")
    }

    #[test]
    fn present_anchor_is_applied() {
        let step = append_w().apply(
            SourceBuffer::from("A = () => { X; Y; Z; }"),
            RerunPolicy::Unguarded,
        );
        assert_eq!(step.buffer.as_str(), "A = () => { X; Y; Z; W; }");
        assert_eq!(step.outcome, PatchOutcome::Applied { occurrences: 1 });
    }

    #[test]
    fn unguarded_additive_rerun_duplicates_insertion() {
        let op = append_w();
        let first = op.apply(
            SourceBuffer::from("A = () => { X; Y; Z; }"),
            RerunPolicy::Unguarded,
        );
        let second = op.apply(first.buffer, RerunPolicy::Unguarded);
        assert_eq!(second.buffer.as_str(), "A = () => { X; Y; Z; W; W; }");
        assert!(second.outcome.is_applied());
    }

    #[test]
    fn guarded_rerun_is_a_no_op() {
        let op = append_w();
        let first = op.apply(
            SourceBuffer::from("A = () => { X; Y; Z; }"),
            RerunPolicy::Guarded,
        );
        let expected = first.buffer.clone();
        let second = op.apply(first.buffer, RerunPolicy::Guarded);
        assert_eq!(second.buffer, expected);
        assert_eq!(second.outcome.skip_reason(), Some(SkipReason::AlreadyApplied));
    }

    #[test]
    fn guarded_substitution_applies_when_replacement_exists_elsewhere() {
        let op = PatchOperation::substitute("swap", "legacy();", "modern();");
        let step = op.apply(
            SourceBuffer::from("legacy();\nmodern();\n"),
            RerunPolicy::Guarded,
        );
        assert_eq!(step.buffer.as_str(), "modern();\nmodern();\n");
        assert_eq!(step.outcome, PatchOutcome::Applied { occurrences: 1 });
    }

    #[test]
    fn guarded_additive_patches_remaining_sites() {
        let op = PatchOperation::insert_after("mark", "f()", " // seen");
        let step = op.apply(SourceBuffer::from("f() // seen\nf()\n"), RerunPolicy::Guarded);
        assert_eq!(step.buffer.as_str(), "f() // seen\nf() // seen\n");
        assert_eq!(step.outcome, PatchOutcome::Applied { occurrences: 1 });

        let again = op.apply(step.buffer, RerunPolicy::Guarded);
        assert_eq!(again.buffer.as_str(), "f() // seen\nf() // seen\n");
        assert_eq!(again.outcome.skip_reason(), Some(SkipReason::AlreadyApplied));
    }

    #[test]
    fn guarded_substitution_rerun_reports_already_applied() {
        let op = PatchOperation::substitute("swap", "legacy();", "modern();");
        let first = op.apply(SourceBuffer::from("legacy();"), RerunPolicy::Guarded);
        let second = op.apply(first.buffer, RerunPolicy::Guarded);
        assert_eq!(second.buffer.as_str(), "modern();");
        assert_eq!(second.outcome.skip_reason(), Some(SkipReason::AlreadyApplied));
    }

    #[test]
    fn substitution_destroys_its_anchor() {
        let op = PatchOperation::substitute("swap", "old();", "new();");
        assert_eq!(op.kind(), OperationKind::Substitution);

        let first = op.apply(SourceBuffer::from("old();"), RerunPolicy::Unguarded);
        let second = op.apply(first.buffer, RerunPolicy::Unguarded);
        assert_eq!(second.buffer.as_str(), "new();");
        assert_eq!(second.outcome.skip_reason(), Some(SkipReason::AnchorNotFound));
    }

    #[test]
    fn missing_anchor_leaves_buffer_identical() {
        let op = PatchOperation::substitute("missing", "MISSING_TOKEN", "...");
        let input = "const a = 1;\n";
        let step = op.apply(SourceBuffer::from(input), RerunPolicy::Guarded);
        assert_eq!(step.buffer.as_str(), input);
        assert_eq!(step.outcome.skip_reason(), Some(SkipReason::AnchorNotFound));
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let op = PatchOperation::insert_after("mark", "fn()", " // seen");
        let step = op.apply(SourceBuffer::from("fn()\nfn()\n"), RerunPolicy::Unguarded);
        assert_eq!(step.buffer.as_str(), "fn() // seen\nfn() // seen\n");
        assert_eq!(step.outcome, PatchOutcome::Applied { occurrences: 2 });
    }

    #[test]
    fn insert_after_keeps_anchor_as_prefix() {
        let op = PatchOperation::insert_after("imports", "import a;", "\nimport b;");
        assert_eq!(op.replacement(), "import a;\nimport b;");
        assert_eq!(op.kind(), OperationKind::Additive);
    }

    #[test]
    fn empty_anchor_is_rejected() {
        let op = PatchOperation::substitute("broken", "", "x");
        assert!(matches!(
            op.validate(),
            Err(PatchError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn later_operations_see_earlier_output() {
        let operations = vec![
            PatchOperation::substitute("first", "a", "b"),
            PatchOperation::substitute("second", "b", "c"),
            PatchOperation::substitute("missing", "zzz", "y"),
        ];
        let (buffer, outcomes) =
            apply_all(SourceBuffer::from("a"), &operations, RerunPolicy::Unguarded);
        assert_eq!(buffer.as_str(), "c");
        assert!(outcomes[0].is_applied());
        assert!(outcomes[1].is_applied());
        assert_eq!(outcomes[2].skip_reason(), Some(SkipReason::AnchorNotFound));
    }
}
