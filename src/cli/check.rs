//! Inventory and classification commands
//!
//! `routes` lists the current ingress hosts; `check` resolves the whole
//! inventory against the registry and prints the classification report,
//! optionally filtered to one classification.

use anyhow::Result;
use clap::ValueEnum;

use crate::domain::{Classification, RecordStatus};
use crate::services::{ClassifiedRoute, ReconcileSession};

use super::output::{print_output, print_table_header, truncate};

/// Report filter, mirroring the classification taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowFilter {
    Complete,
    MissingDeployment,
    MissingBoth,
    Anomalous,
    QueryFailed,
}

impl ShowFilter {
    fn classification(&self) -> Classification {
        match self {
            ShowFilter::Complete => Classification::Complete,
            ShowFilter::MissingDeployment => Classification::MissingDeploymentOnly,
            ShowFilter::MissingBoth => Classification::MissingBoth,
            ShowFilter::Anomalous => Classification::Anomalous,
            ShowFilter::QueryFailed => Classification::QueryFailed,
        }
    }
}

/// List all ingress hosts in the cluster.
pub async fn handle_routes(session: &mut ReconcileSession, output: &str) -> Result<()> {
    let routes = session.load_inventory().await?.to_vec();

    if output == "table" {
        print_table_header(&[("INGRESS", 40), ("NAMESPACE", 16), ("HOST", 40)]);
        for route in &routes {
            println!(
                "{:<40} {:<16} {:<40}",
                truncate(&route.ingress_name, 40),
                truncate(&route.namespace, 16),
                truncate(&route.host, 40)
            );
        }
        println!("\n{} route(s)", routes.len());
    } else {
        print_output(&routes, output)?;
    }

    Ok(())
}

/// Resolve and classify the whole inventory.
pub async fn handle_check(
    session: &mut ReconcileSession,
    show: Option<ShowFilter>,
    output: &str,
) -> Result<()> {
    session.load_inventory().await?;
    session.resolve().await?;
    let report = session.classify()?;

    let rows: Vec<&ClassifiedRoute> = match show {
        Some(filter) => {
            let wanted = filter.classification();
            report.iter().filter(|row| row.classification == wanted).collect()
        }
        None => report.iter().collect(),
    };

    if output == "table" {
        print_report_table(&rows);
    } else {
        print_output(&rows, output)?;
    }

    // Query failures are surfaced one by one; the operator must see exactly
    // which hosts could not be classified and why.
    for row in report {
        if let RecordStatus::QueryFailed(kind) = &row.status {
            eprintln!("warning: query failed for host '{}': {}", row.route.host, kind);
        }
    }

    Ok(())
}

fn print_report_table(rows: &[&ClassifiedRoute]) {
    print_table_header(&[
        ("HOST", 40),
        ("INGRESS", 36),
        ("DNS", 4),
        ("DEPLOY", 6),
        ("CLASSIFICATION", 24),
    ]);

    for row in rows {
        let (dns, deploy) = match &row.status {
            RecordStatus::Resolved { dns_record, deployment_record } => {
                (mark(*dns_record), mark(*deployment_record))
            }
            RecordStatus::QueryFailed(_) => ("?", "?"),
        };
        println!(
            "{:<40} {:<36} {:<4} {:<6} {:<24}",
            truncate(&row.route.host, 40),
            truncate(&row.route.ingress_name, 36),
            dns,
            deploy,
            row.classification
        );
    }
    println!("\n{} route(s)", rows.len());
}

fn mark(present: bool) -> &'static str {
    if present {
        "ok"
    } else {
        "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_filter_maps_to_classification() {
        assert_eq!(ShowFilter::Complete.classification(), Classification::Complete);
        assert_eq!(
            ShowFilter::MissingDeployment.classification(),
            Classification::MissingDeploymentOnly
        );
        assert_eq!(ShowFilter::MissingBoth.classification(), Classification::MissingBoth);
        assert_eq!(ShowFilter::Anomalous.classification(), Classification::Anomalous);
        assert_eq!(ShowFilter::QueryFailed.classification(), Classification::QueryFailed);
    }

    #[test]
    fn test_mark() {
        assert_eq!(mark(true), "ok");
        assert_eq!(mark(false), "-");
    }
}
