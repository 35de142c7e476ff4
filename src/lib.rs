//! # routewarden
//!
//! Reconciles a cluster's externally exposed routes (Ingress hosts) against an
//! external registry of expected records, classifies each route by which
//! records are missing, and — on explicit operator confirmation — removes the
//! workloads backing orphaned routes. A configured set of protection patterns
//! names workloads that are never deleted, whatever their classification.
//!
//! ## Architecture
//!
//! ```text
//! Route Inventory (Kubernetes API)
//!        ↓
//! Record Resolver ── Registry Query Client (GraphQL)
//!        ↓
//! Classifier → report (display)
//!        ↓
//! Cleanup Planner ── Protection Matcher
//!        ↓
//! Cleanup Executor → per-item outcomes
//! ```
//!
//! The decision engine lives in [`services`]; the cluster and registry are
//! reached only through the narrow capability traits in [`kube`] and
//! [`registry`], so every piece is substitutable with fakes in tests.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod kube;
pub mod observability;
pub mod registry;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
