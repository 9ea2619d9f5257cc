//! Unified diff preview of a patch run.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

#[derive(Debug, Clone)]
pub struct DiffOptions<'a> {
    /// Number of context lines around changes.
    pub context_lines: usize,
    pub old_label: Option<&'a str>,
    pub new_label: Option<&'a str>,
}

impl Default for DiffOptions<'_> {
    fn default() -> Self {
        Self {
            context_lines: 3,
            old_label: None,
            new_label: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiffBundle {
    /// Unified diff formatted as plain text.
    pub formatted: String,
    pub insertions: usize,
    pub deletions: usize,
    pub is_empty: bool,
}

pub fn compute_diff(old: &str, new: &str, options: DiffOptions<'_>) -> DiffBundle {
    let diff = TextDiff::from_lines(old, new);

    let (insertions, deletions) =
        diff.iter_all_changes()
            .fold((0, 0), |(ins, del), change| match change.tag() {
                ChangeTag::Insert => (ins + 1, del),
                ChangeTag::Delete => (ins, del + 1),
                ChangeTag::Equal => (ins, del),
            });

    let mut unified = diff.unified_diff();
    unified.context_radius(options.context_lines);
    match (options.old_label, options.new_label) {
        (Some(old_label), Some(new_label)) => {
            unified.header(old_label, new_label);
        }
        (Some(label), None) | (None, Some(label)) => {
            unified.header(label, label);
        }
        (None, None) => {}
    }

    DiffBundle {
        formatted: unified.to_string(),
        insertions,
        deletions,
        is_empty: insertions == 0 && deletions == 0,
    }
}
