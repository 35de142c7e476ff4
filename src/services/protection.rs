//! Workload protection matching
//!
//! Evaluates workload names against the configured list of glob patterns.
//! Matching is case-sensitive and whole-string: `webapp-deployer-api.pwa.*`
//! protects `webapp-deployer-api.pwa.cluster1` but not
//! `not-webapp-deployer-api.pwa.cluster1`. No substring heuristics.

use crate::errors::{Error, Result};
use glob::Pattern;

/// An ordered, immutable set of protection patterns.
///
/// The boolean answer is a union over all patterns; order only determines
/// which pattern is reported as the match for audit purposes.
#[derive(Debug, Clone)]
pub struct ProtectionMatcher {
    patterns: Vec<(String, Pattern)>,
}

impl ProtectionMatcher {
    /// Compile the configured patterns. Invalid globs are a configuration
    /// error; a matcher is never built from a partially valid list.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for raw in patterns {
            let raw = raw.as_ref();
            let pattern = Pattern::new(raw)
                .map_err(|e| Error::config(format!("invalid protection pattern '{}': {}", raw, e)))?;
            compiled.push((raw.to_string(), pattern));
        }
        Ok(Self { patterns: compiled })
    }

    /// Is this workload name protected by any pattern?
    pub fn is_protected(&self, workload_name: &str) -> bool {
        self.matching_pattern(workload_name).is_some()
    }

    /// The first pattern matching this workload name, for audit reporting.
    pub fn matching_pattern(&self, workload_name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, pattern)| pattern.matches(workload_name))
            .map(|(raw, _)| raw.as_str())
    }

    /// The configured patterns, in order.
    pub fn patterns(&self) -> Vec<&str> {
        self.patterns.iter().map(|(raw, _)| raw.as_str()).collect()
    }
}
