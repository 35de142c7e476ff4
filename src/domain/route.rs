//! Route and workload domain types
//!
//! A route is one externally exposed host taken from an Ingress rule, paired
//! with the workload reference derived from the ingress naming convention.
//! Routes are immutable snapshot values for the lifetime of one
//! reconciliation pass and are not persisted between passes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the deployable unit backing a route. The unit of deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkloadRef {
    /// Kubernetes namespace holding the workload
    pub namespace: String,

    /// Deployment name. Protection patterns match against this value.
    pub name: String,
}

impl WorkloadRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), name: name.into() }
    }
}

impl fmt::Display for WorkloadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// One externally exposed host mapped to its backing workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Externally visible host name
    pub host: String,

    /// Name of the Ingress resource the host was read from
    pub ingress_name: String,

    /// Namespace of the Ingress resource
    pub namespace: String,

    /// Backing workload, derived at inventory time
    pub workload: WorkloadRef,
}

/// Derivation rule linking an ingress to its backing workload.
///
/// The naming convention is deployment-specific, so the rule is a trait
/// rather than a fixed string transformation. Implementations must be pure.
pub trait WorkloadNamer: Send + Sync {
    /// Derive the workload reference for an ingress in a namespace.
    fn workload_ref(&self, ingress_name: &str, namespace: &str) -> WorkloadRef;
}

/// Default naming convention: the workload is the ingress name with a fixed
/// suffix removed. `myapp.example.com-ingress` backs `myapp.example.com`.
/// An ingress without the suffix maps to its own name unchanged.
#[derive(Debug, Clone)]
pub struct SuffixTrimNamer {
    suffix: String,
}

impl SuffixTrimNamer {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }
}

impl Default for SuffixTrimNamer {
    fn default() -> Self {
        Self::new("-ingress")
    }
}

impl WorkloadNamer for SuffixTrimNamer {
    fn workload_ref(&self, ingress_name: &str, namespace: &str) -> WorkloadRef {
        // Trim at the first occurrence, matching deployments named after the
        // full host even when the host itself contains the suffix text.
        let name = match ingress_name.split_once(self.suffix.as_str()) {
            Some((prefix, _)) if !prefix.is_empty() => prefix,
            _ => ingress_name,
        };
        WorkloadRef::new(namespace, name)
    }
}
