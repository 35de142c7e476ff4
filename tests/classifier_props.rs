//! Property tests over route classification

use proptest::prelude::*;
use routewarden::domain::{classify, Classification, RecordStatus};
use routewarden::errors::QueryErrorKind;

fn arb_status() -> impl Strategy<Value = RecordStatus> {
    prop_oneof![
        (any::<bool>(), any::<bool>()).prop_map(|(dns, dep)| RecordStatus::resolved(dns, dep)),
        Just(RecordStatus::QueryFailed(QueryErrorKind::Timeout)),
        ".{0,40}".prop_map(|msg| RecordStatus::QueryFailed(QueryErrorKind::Transport(msg))),
        ".{0,40}".prop_map(|msg| RecordStatus::QueryFailed(QueryErrorKind::BadResponse(msg))),
    ]
}

proptest! {
    /// Every status classifies, and classifying twice gives the same answer.
    #[test]
    fn classification_is_total_and_deterministic(status in arb_status()) {
        let first = classify(&status);
        let second = classify(&status);
        prop_assert_eq!(first, second);
    }

    /// A query failure never classifies as anything deletable.
    #[test]
    fn failures_never_classify_deletable(msg in ".{0,40}") {
        let status = RecordStatus::QueryFailed(QueryErrorKind::Transport(msg));
        prop_assert_eq!(classify(&status), Classification::QueryFailed);
    }

    /// Resolved statuses map one-to-one onto the record truth table.
    #[test]
    fn resolved_truth_table(dns in any::<bool>(), deployment in any::<bool>()) {
        let got = classify(&RecordStatus::resolved(dns, deployment));
        let want = match (dns, deployment) {
            (true, true) => Classification::Complete,
            (true, false) => Classification::MissingDeploymentOnly,
            (false, false) => Classification::MissingBoth,
            (false, true) => Classification::Anomalous,
        };
        prop_assert_eq!(got, want);
    }

    /// Only MissingBoth and MissingDeploymentOnly are ever deletion
    /// candidates; the other three states are report-only.
    #[test]
    fn deletable_states_are_closed(status in arb_status()) {
        let deletable = matches!(
            classify(&status),
            Classification::MissingBoth | Classification::MissingDeploymentOnly
        );
        if deletable {
            prop_assert!(
                matches!(
                    status,
                    RecordStatus::Resolved { deployment_record: false, .. }
                ),
                "deletable classification from non-deletable status: {:?}",
                status
            );
        }
    }
}
