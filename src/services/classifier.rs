//! Classification report
//!
//! Maps the resolver's ordered output to an ordered report of classified
//! routes. Pure and side-effect free beyond a summary log; classification
//! never begins on a partial result set because the resolver joins before
//! handing off.

use crate::domain::{classify, Classification, RecordStatus, Route};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// One row of the classification report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRoute {
    pub route: Route,
    pub status: RecordStatus,
    pub classification: Classification,
}

/// Classify every resolved route, preserving order.
pub fn classify_all(resolved: Vec<(Route, RecordStatus)>) -> Vec<ClassifiedRoute> {
    let report: Vec<ClassifiedRoute> = resolved
        .into_iter()
        .map(|(route, status)| {
            let classification = classify(&status);
            ClassifiedRoute { route, status, classification }
        })
        .collect();

    let mut counts: BTreeMap<Classification, usize> = BTreeMap::new();
    for row in &report {
        *counts.entry(row.classification).or_default() += 1;
    }
    info!(routes = report.len(), ?counts, "Classification complete");

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WorkloadRef;
    use crate::errors::QueryErrorKind;

    fn route(host: &str) -> Route {
        Route {
            host: host.to_string(),
            ingress_name: format!("{host}-ingress"),
            namespace: "apps".to_string(),
            workload: WorkloadRef::new("apps", host),
        }
    }

    #[test]
    fn test_classify_all_preserves_order_and_maps() {
        let resolved = vec![
            (route("a.test"), RecordStatus::resolved(true, true)),
            (route("b.test"), RecordStatus::resolved(false, false)),
            (route("c.test"), RecordStatus::QueryFailed(QueryErrorKind::Timeout)),
        ];

        let report = classify_all(resolved);
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].route.host, "a.test");
        assert_eq!(report[0].classification, Classification::Complete);
        assert_eq!(report[1].classification, Classification::MissingBoth);
        assert_eq!(report[2].classification, Classification::QueryFailed);
    }

    #[test]
    fn test_classify_all_empty() {
        assert!(classify_all(vec![]).is_empty());
    }
}
