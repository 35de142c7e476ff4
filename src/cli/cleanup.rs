//! Cleanup command
//!
//! Runs one full reconciliation session: inventory, resolve, classify, plan,
//! operator confirmation, execute, report. `--dry-run` stops after displaying
//! the plan; `--yes` skips the confirmation prompt. Protected items appear in
//! the plan, marked, and are never deleted.

use anyhow::Result;

use crate::domain::{DeletionOutcome, DeletionPlanItem, RecordStatus};
use crate::services::{CleanupTarget, ReconcileSession};

use super::output::{print_output, print_table_header, truncate};

/// Plan and (after confirmation) execute a cleanup pass.
pub async fn handle_cleanup(
    session: &mut ReconcileSession,
    target: CleanupTarget,
    dry_run: bool,
    yes: bool,
    output: &str,
) -> Result<()> {
    session.load_inventory().await?;
    session.resolve().await?;
    let report = session.classify()?;

    // Hosts that could not be classified are reported before any plan is
    // shown; they are never deletion candidates.
    for row in report {
        if let RecordStatus::QueryFailed(kind) = &row.status {
            eprintln!("warning: query failed for host '{}': {}", row.route.host, kind);
        }
    }

    let plan = session.plan_cleanup(target)?.to_vec();

    if plan.is_empty() {
        println!("Nothing to clean up.");
        return Ok(());
    }

    if output == "table" {
        print_plan_table(&plan);
    } else {
        print_output(&plan, output)?;
    }

    if dry_run {
        println!("Dry run: no deletions executed.");
        return Ok(());
    }

    let deletable = plan.iter().filter(|item| !item.protected).count();
    if deletable == 0 {
        println!("All plan items are protected; nothing to delete.");
        return Ok(());
    }

    if !yes {
        println!(
            "\nAbout to delete {} workload(s) ({} protected item(s) will be skipped). Continue? (y/N)",
            deletable,
            plan.len() - deletable
        );
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled");
            return Ok(());
        }
    }

    let outcomes = session.execute().await?;

    if output == "table" {
        print_outcomes_table(&outcomes);
    } else {
        print_output(&outcomes, output)?;
    }

    Ok(())
}

fn print_plan_table(plan: &[DeletionPlanItem]) {
    print_table_header(&[
        ("WORKLOAD", 44),
        ("HOST", 32),
        ("PROTECTED", 9),
        ("RATIONALE", 56),
    ]);
    for item in plan {
        println!(
            "{:<44} {:<32} {:<9} {:<56}",
            truncate(&item.workload.to_string(), 44),
            truncate(&item.host, 32),
            if item.protected { "yes" } else { "no" },
            truncate(&item.rationale, 56)
        );
    }
    println!("\n{} plan item(s)", plan.len());
}

fn print_outcomes_table(outcomes: &[DeletionOutcome]) {
    print_table_header(&[("WORKLOAD", 44), ("RESULT", 40)]);
    for outcome in outcomes {
        println!(
            "{:<44} {:<40}",
            truncate(&outcome.workload.to_string(), 44),
            truncate(&outcome.result.to_string(), 40)
        );
    }
    println!("\n{} outcome(s)", outcomes.len());
}
