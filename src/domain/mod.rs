//! Domain types for route reconciliation
//!
//! Pure value types with no infrastructure dependencies: routes and workload
//! references, registry record status and its classification, and the
//! deletion plan/outcome pair that the cleanup services exchange.

pub mod plan;
pub mod record;
pub mod route;

pub use plan::{DeletionOutcome, DeletionPlanItem, OutcomeResult};
pub use record::{classify, Classification, RecordStatus};
pub use route::{Route, SuffixTrimNamer, WorkloadNamer, WorkloadRef};
