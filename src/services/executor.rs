//! Cleanup execution
//!
//! Applies a deletion plan against the cluster, one workload at a time, in
//! plan order. Deletions are irreversible, so the pass is strictly sequential
//! and best-effort, fully reported: one item's failure never aborts the rest,
//! and every item gets exactly one outcome.
//!
//! Protection is re-verified against the matcher handed in at execute time,
//! immediately before each delete call. A plan built before a protection
//! pattern update can therefore never delete a newly protected workload.

use crate::domain::{DeletionOutcome, DeletionPlanItem, OutcomeResult};
use crate::kube::WorkloadDeleter;
use crate::services::protection::ProtectionMatcher;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Reason recorded for items skipped by the live protection re-check.
pub const SKIP_PROTECTED: &str = "protected";

/// Reason recorded for items not attempted after a pass-level cancellation.
pub const SKIP_CANCELLED: &str = "cancelled";

/// Executes deletion plans.
pub struct CleanupExecutor {
    deleter: Arc<dyn WorkloadDeleter>,
}

impl CleanupExecutor {
    pub fn new(deleter: Arc<dyn WorkloadDeleter>) -> Self {
        Self { deleter }
    }

    /// Execute the plan. Returns one outcome per item, in plan order.
    ///
    /// Cancellation is honored between items only: the current delete call
    /// finishes, remaining items record `Skipped("cancelled")` so the outcome
    /// list stays exactly as long as the plan.
    pub async fn execute(
        &self,
        plan: &[DeletionPlanItem],
        protection: &ProtectionMatcher,
        cancel: &CancellationToken,
    ) -> Vec<DeletionOutcome> {
        let mut outcomes = Vec::with_capacity(plan.len());

        for item in plan {
            if cancel.is_cancelled() {
                warn!(workload = %item.workload, "Execution cancelled, skipping remaining item");
                outcomes
                    .push(DeletionOutcome::new(item.workload.clone(), OutcomeResult::Skipped(SKIP_CANCELLED.to_string())));
                continue;
            }

            // Live re-check, not trusted from plan time.
            if let Some(pattern) = protection.matching_pattern(&item.workload.name) {
                info!(workload = %item.workload, pattern = %pattern, "Workload protected, not deleting");
                outcomes.push(DeletionOutcome::new(
                    item.workload.clone(),
                    OutcomeResult::Skipped(SKIP_PROTECTED.to_string()),
                ));
                continue;
            }

            info!(workload = %item.workload, host = %item.host, rationale = %item.rationale, "Deleting workload");
            let result = match self.deleter.delete_workload(&item.workload).await {
                Ok(()) => {
                    info!(workload = %item.workload, "Workload deleted");
                    OutcomeResult::Succeeded
                }
                Err(kind) => {
                    error!(workload = %item.workload, error = %kind, "Workload deletion failed");
                    OutcomeResult::Failed(kind)
                }
            };
            outcomes.push(DeletionOutcome::new(item.workload.clone(), result));
        }

        let succeeded = outcomes.iter().filter(|o| o.result == OutcomeResult::Succeeded).count();
        info!(
            plan_items = plan.len(),
            succeeded,
            skipped = outcomes.iter().filter(|o| !o.was_attempted()).count(),
            "Execution pass complete"
        );

        outcomes
    }
}
