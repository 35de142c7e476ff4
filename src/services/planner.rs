//! Cleanup planning
//!
//! Turns a classification report and a target set into an ordered,
//! deduplicated deletion plan. Pure given its inputs: no network calls, and
//! identical inputs yield item-for-item identical plans. Protected candidates
//! stay in the plan, marked, so the operator sees what was excluded and why;
//! the executor never acts on them.

use crate::domain::{Classification, DeletionPlanItem};
use crate::services::classifier::ClassifiedRoute;
use crate::services::protection::ProtectionMatcher;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::info;

/// The two supported cleanup modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CleanupTarget {
    /// Routes where both the DNS record and the deployment record are missing
    MissingBoth,
    /// Routes where only the deployment record is missing
    MissingDeploymentOnly,
}

impl CleanupTarget {
    /// The classification set this mode selects.
    pub fn classifications(&self) -> BTreeSet<Classification> {
        match self {
            CleanupTarget::MissingBoth => BTreeSet::from([Classification::MissingBoth]),
            CleanupTarget::MissingDeploymentOnly => {
                BTreeSet::from([Classification::MissingDeploymentOnly])
            }
        }
    }
}

/// Produces deletion plans from classification reports.
pub struct CleanupPlanner;

impl CleanupPlanner {
    /// Build a plan for every route whose classification is in `targets`.
    ///
    /// `QueryFailed` and `Anomalous` are excluded unconditionally, whatever
    /// the caller requests: neither is ever a deletion trigger. Duplicate
    /// workload refs keep their first occurrence only.
    pub fn plan(
        report: &[ClassifiedRoute],
        targets: &BTreeSet<Classification>,
        matcher: &ProtectionMatcher,
    ) -> Vec<DeletionPlanItem> {
        let mut planned_workloads = HashSet::new();
        let mut items = Vec::new();

        for row in report {
            if !targets.contains(&row.classification) {
                continue;
            }
            if matches!(
                row.classification,
                Classification::QueryFailed | Classification::Anomalous
            ) {
                continue;
            }
            if !planned_workloads.insert(row.route.workload.clone()) {
                continue;
            }

            let (protected, rationale) = match matcher.matching_pattern(&row.route.workload.name) {
                Some(pattern) => (
                    true,
                    format!(
                        "host '{}' classified {}; protected by pattern '{}'",
                        row.route.host, row.classification, pattern
                    ),
                ),
                None => (
                    false,
                    format!("host '{}' classified {}", row.route.host, row.classification),
                ),
            };

            items.push(DeletionPlanItem {
                workload: row.route.workload.clone(),
                host: row.route.host.clone(),
                classification: row.classification,
                protected,
                rationale,
            });
        }

        let protected_count = items.iter().filter(|i| i.protected).count();
        info!(
            plan_items = items.len(),
            protected = protected_count,
            targets = ?targets,
            "Cleanup plan built"
        );

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordStatus, Route, WorkloadRef};

    fn row(host: &str, workload: &str, classification: Classification) -> ClassifiedRoute {
        let status = match classification {
            Classification::Complete => RecordStatus::resolved(true, true),
            Classification::MissingDeploymentOnly => RecordStatus::resolved(true, false),
            Classification::MissingBoth => RecordStatus::resolved(false, false),
            Classification::Anomalous => RecordStatus::resolved(false, true),
            Classification::QueryFailed => {
                RecordStatus::QueryFailed(crate::errors::QueryErrorKind::Timeout)
            }
        };
        ClassifiedRoute {
            route: Route {
                host: host.to_string(),
                ingress_name: format!("{host}-ingress"),
                namespace: "apps".to_string(),
                workload: WorkloadRef::new("apps", workload),
            },
            status,
            classification,
        }
    }

    fn no_protection() -> ProtectionMatcher {
        ProtectionMatcher::new::<&str>(&[]).unwrap()
    }

    #[test]
    fn test_plans_only_target_classifications() {
        let report = vec![
            row("a.test", "a", Classification::Complete),
            row("b.test", "b", Classification::MissingBoth),
            row("c.test", "c", Classification::MissingDeploymentOnly),
        ];

        let plan = CleanupPlanner::plan(
            &report,
            &CleanupTarget::MissingBoth.classifications(),
            &no_protection(),
        );
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].workload.name, "b");
        assert!(!plan[0].protected);
    }

    #[test]
    fn test_query_failed_and_anomalous_never_planned() {
        let report = vec![
            row("x.test", "x", Classification::QueryFailed),
            row("y.test", "y", Classification::Anomalous),
        ];
        // Even when a caller explicitly asks for them.
        let targets =
            BTreeSet::from([Classification::QueryFailed, Classification::Anomalous]);

        let plan = CleanupPlanner::plan(&report, &targets, &no_protection());
        assert!(plan.is_empty());
    }

    #[test]
    fn test_protected_items_stay_in_plan_marked() {
        let report = vec![row(
            "api.pwa.cluster1",
            "webapp-deployer-api.pwa.cluster1",
            Classification::MissingBoth,
        )];
        let matcher = ProtectionMatcher::new(&["webapp-deployer-api.pwa.*"]).unwrap();

        let plan =
            CleanupPlanner::plan(&report, &CleanupTarget::MissingBoth.classifications(), &matcher);
        assert_eq!(plan.len(), 1);
        assert!(plan[0].protected);
        assert!(plan[0].rationale.contains("webapp-deployer-api.pwa.*"));
    }

    #[test]
    fn test_duplicate_workloads_planned_once() {
        let report = vec![
            row("a.test", "shared", Classification::MissingBoth),
            row("b.test", "shared", Classification::MissingBoth),
        ];

        let plan = CleanupPlanner::plan(
            &report,
            &CleanupTarget::MissingBoth.classifications(),
            &no_protection(),
        );
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].host, "a.test");
    }

    #[test]
    fn test_planning_is_idempotent() {
        let report = vec![
            row("a.test", "a", Classification::MissingBoth),
            row("b.test", "webapp-deployer-ui.pwa.x", Classification::MissingBoth),
        ];
        let matcher = ProtectionMatcher::new(&["webapp-deployer-ui.pwa.*"]).unwrap();
        let targets = CleanupTarget::MissingBoth.classifications();

        let first = CleanupPlanner::plan(&report, &targets, &matcher);
        let second = CleanupPlanner::plan(&report, &targets, &matcher);
        assert_eq!(first, second);
    }

    #[test]
    fn test_target_classification_sets() {
        assert_eq!(
            CleanupTarget::MissingBoth.classifications(),
            BTreeSet::from([Classification::MissingBoth])
        );
        assert_eq!(
            CleanupTarget::MissingDeploymentOnly.classifications(),
            BTreeSet::from([Classification::MissingDeploymentOnly])
        );
    }
}
