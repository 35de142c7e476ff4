//! Registry record status and classification
//!
//! `RecordStatus` is the resolved view of one route against the registry;
//! the enum shape guarantees the exclusivity invariant that a failed query
//! never reports a record as absent. `classify` is the total, deterministic
//! mapping from status to classification.

use crate::errors::QueryErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of resolving one route against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Both existence checks answered on a single consistent view
    Resolved {
        /// A DnsRecord exists for the host
        dns_record: bool,
        /// An ApplicationDeploymentRecord exists for the host
        deployment_record: bool,
    },

    /// At least one sub-query failed; any sibling result was discarded
    QueryFailed(QueryErrorKind),
}

impl RecordStatus {
    pub fn resolved(dns_record: bool, deployment_record: bool) -> Self {
        Self::Resolved { dns_record, deployment_record }
    }
}

/// Classification of a route by which expected records are missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    /// Both records present
    Complete,

    /// DNS record present, deployment record missing
    MissingDeploymentOnly,

    /// Both records missing
    MissingBoth,

    /// DNS record missing while a deployment record exists. Inconsistent
    /// registry state: reported, never used as a deletion trigger.
    Anomalous,

    /// The registry could not be queried for this route. Never eligible
    /// for deletion.
    QueryFailed,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Complete => write!(f, "complete"),
            Classification::MissingDeploymentOnly => write!(f, "missing-deployment-only"),
            Classification::MissingBoth => write!(f, "missing-both"),
            Classification::Anomalous => write!(f, "anomalous"),
            Classification::QueryFailed => write!(f, "query-failed"),
        }
    }
}

/// Map a record status to its classification.
///
/// Total and deterministic over the whole input domain; no error path.
pub fn classify(status: &RecordStatus) -> Classification {
    match status {
        RecordStatus::Resolved { dns_record: true, deployment_record: true } => {
            Classification::Complete
        }
        RecordStatus::Resolved { dns_record: true, deployment_record: false } => {
            Classification::MissingDeploymentOnly
        }
        RecordStatus::Resolved { dns_record: false, deployment_record: false } => {
            Classification::MissingBoth
        }
        RecordStatus::Resolved { dns_record: false, deployment_record: true } => {
            Classification::Anomalous
        }
        RecordStatus::QueryFailed(_) => Classification::QueryFailed,
    }
}
