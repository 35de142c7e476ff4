//! Reconciliation and cleanup services
//!
//! The decision engine of routewarden: resolving routes against the registry,
//! classifying them, matching protection patterns, and planning and executing
//! deletions. The session module ties the pieces into one operator-driven
//! state machine.

pub mod classifier;
pub mod executor;
pub mod planner;
pub mod protection;
pub mod resolver;
pub mod session;

pub use classifier::{classify_all, ClassifiedRoute};
pub use executor::CleanupExecutor;
pub use planner::{CleanupPlanner, CleanupTarget};
pub use protection::ProtectionMatcher;
pub use resolver::RecordResolver;
pub use session::{ReconcileSession, SessionState};
