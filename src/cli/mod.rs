//! # Command Line Interface
//!
//! Subcommands over one reconciliation session: listing routes, checking the
//! inventory against the registry, and running protected cleanup passes. The
//! CLI only drives session transitions; classification and deletion logic
//! live in the services layer.

pub mod check;
pub mod cleanup;
pub mod output;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::SuffixTrimNamer;
use crate::kube::KubeClient;
use crate::observability::init_logging;
use crate::registry::LaconicClient;
use crate::services::{
    CleanupExecutor, CleanupTarget, ProtectionMatcher, ReconcileSession, RecordResolver,
};

#[derive(Parser)]
#[command(name = "routewarden")]
#[command(about = "Reconcile ingress routes against a record registry and clean up orphaned workloads")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Registry GraphQL endpoint override
    #[arg(long, global = true)]
    pub registry_url: Option<String>,

    /// Kubernetes API URL override
    #[arg(long, global = true)]
    pub kube_api_url: Option<String>,

    /// Per-route registry query timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all ingress hosts in the cluster
    Routes {
        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "table", value_parser = ["json", "yaml", "table"])]
        output: String,
    },

    /// Check every ingress host against the registry and classify it
    #[command(
        long_about = "Resolve the whole route inventory against the registry and print the classification report.\n\nQuery failures are reported per host and never classified as missing records.",
        after_help = "EXAMPLES:\n    # Full report\n    routewarden check\n\n    # Only routes with both records missing\n    routewarden check --show missing-both\n\n    # Machine-readable\n    routewarden check --output json"
    )]
    Check {
        /// Only show routes with this classification
        #[arg(long, value_enum)]
        show: Option<check::ShowFilter>,

        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "table", value_parser = ["json", "yaml", "table"])]
        output: String,
    },

    /// Plan and execute deletion of workloads backing orphaned routes
    #[command(
        long_about = "Build a deletion plan for routes whose registry records are missing, show it (protected workloads included, marked), and execute it after confirmation.\n\nWARNING: executed deletions are irreversible. Protection patterns are re-checked immediately before every delete call.",
        after_help = "EXAMPLES:\n    # Show what would be deleted\n    routewarden cleanup --target missing-both --dry-run\n\n    # Delete after interactive confirmation\n    routewarden cleanup --target missing-both\n\n    # Non-interactive\n    routewarden cleanup --target missing-deployment-only --yes"
    )]
    Cleanup {
        /// Which classification to clean up
        #[arg(long, value_enum)]
        target: CleanupTarget,

        /// Show the plan without executing it
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "table", value_parser = ["json", "yaml", "table"])]
        output: String,
    },
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.registry_url {
        config.registry.endpoint = url;
    }
    if let Some(url) = cli.kube_api_url {
        config.kube.api_url = url;
    }
    if let Some(timeout) = cli.timeout {
        config.registry.query_timeout_seconds = timeout;
    }
    config.validate_all()?;

    init_logging(&config.observability, cli.verbose);

    let mut session = build_session(&config)?;

    match cli.command {
        Commands::Routes { output } => check::handle_routes(&mut session, &output).await?,
        Commands::Check { show, output } => {
            check::handle_check(&mut session, show, &output).await?
        }
        Commands::Cleanup { target, dry_run, yes, output } => {
            cleanup::handle_cleanup(&mut session, target, dry_run, yes, &output).await?
        }
    }

    Ok(())
}

/// Wire a session from configuration: Kubernetes adapter for inventory and
/// deletion, GraphQL client for registry queries.
fn build_session(config: &AppConfig) -> crate::errors::Result<ReconcileSession> {
    let namer = Arc::new(SuffixTrimNamer::new(config.cleanup.workload_suffix.clone()));
    let kube = Arc::new(KubeClient::new(config.kube.clone(), namer)?);
    let registry = Arc::new(LaconicClient::new(&config.registry)?);

    let resolver = RecordResolver::new(
        registry,
        config.registry.query_concurrency,
        config.registry.query_timeout(),
    );
    let executor = CleanupExecutor::new(kube.clone());
    let protection = ProtectionMatcher::new(&config.cleanup.protected_patterns)?;

    Ok(ReconcileSession::new(kube, resolver, executor, protection))
}
