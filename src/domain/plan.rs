//! Deletion plan and outcome types
//!
//! A plan item is one proposed deletion with its rationale and protection
//! status; it is never mutated after the planner produces it. Outcomes form
//! the append-only audit log for one execution pass, exactly one per item.

use crate::domain::{Classification, WorkloadRef};
use crate::errors::DeleteError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One proposed deletion.
///
/// Protected candidates stay in the plan with `protected = true` so the
/// operator sees what was excluded and why; the executor never acts on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionPlanItem {
    /// The workload proposed for deletion
    pub workload: WorkloadRef,

    /// Host whose missing records motivated the item
    pub host: String,

    /// Classification that selected the route
    pub classification: Classification,

    /// Whether a protection pattern matched the workload name at plan time
    pub protected: bool,

    /// Human-readable justification, including the matched pattern when protected
    pub rationale: String,
}

/// Terminal result of one attempted plan item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeResult {
    /// The delete call succeeded
    Succeeded,
    /// The delete call was made and failed
    Failed(DeleteError),
    /// No delete call was made, with the reason
    Skipped(String),
}

impl fmt::Display for OutcomeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeResult::Succeeded => write!(f, "succeeded"),
            OutcomeResult::Failed(e) => write!(f, "failed: {}", e),
            OutcomeResult::Skipped(reason) => write!(f, "skipped: {}", reason),
        }
    }
}

/// One entry of the per-run deletion audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionOutcome {
    /// The workload the plan item referred to
    pub workload: WorkloadRef,

    /// What happened to it
    pub result: OutcomeResult,

    /// When the item was decided
    pub recorded_at: DateTime<Utc>,
}

impl DeletionOutcome {
    pub fn new(workload: WorkloadRef, result: OutcomeResult) -> Self {
        Self { workload, result, recorded_at: Utc::now() }
    }

    /// Whether a delete call was actually issued for this item
    pub fn was_attempted(&self) -> bool {
        !matches!(self.result, OutcomeResult::Skipped(_))
    }
}
