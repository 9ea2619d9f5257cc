use crate::operation::PatchOperation;
use crate::outcome::{OperationRecord, PatchOutcome};

/// Collects per-operation outcomes in the order they happened.
pub(super) struct OutcomeJournal {
    records: Vec<OperationRecord>,
}

impl OutcomeJournal {
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub(super) fn record(&mut self, operation: &PatchOperation, outcome: PatchOutcome) {
        self.records.push(OperationRecord {
            index: self.records.len() + 1,
            label: operation.label().to_string(),
            kind: operation.kind(),
            outcome,
        });
    }

    pub(super) fn into_records(self) -> Vec<OperationRecord> {
        self.records
    }
}
