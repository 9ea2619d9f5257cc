use tracing::{info, warn};

use super::journal::OutcomeJournal;
use super::planner::PreparedRun;
use crate::buffer::SourceBuffer;
use crate::operation::RerunPolicy;
use crate::outcome::{OperationRecord, PatchOutcome};

pub(super) fn execute_plan(
    plan: &PreparedRun<'_>,
    mut buffer: SourceBuffer,
    policy: RerunPolicy,
) -> (SourceBuffer, Vec<OperationRecord>) {
    let total = plan.operations.len();
    let mut journal = OutcomeJournal::with_capacity(total);

    for (index, operation) in plan.operations.iter().enumerate() {
        let step = operation.apply(buffer, policy);
        match step.outcome {
            PatchOutcome::Applied { occurrences } => info!(
                step = index + 1,
                total,
                label = operation.label(),
                occurrences,
                "patch applied"
            ),
            PatchOutcome::Skipped { reason } => warn!(
                step = index + 1,
                total,
                label = operation.label(),
                reason = reason.describe(),
                "patch skipped"
            ),
        }
        journal.record(operation, step.outcome);
        buffer = step.buffer;
    }

    (buffer, journal.into_records())
}
