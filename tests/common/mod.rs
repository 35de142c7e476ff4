//! Shared fakes for integration tests
//!
//! In-memory implementations of the three capability traits so end-to-end
//! flows run without a cluster or registry.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use routewarden::domain::{Route, WorkloadRef};
use routewarden::errors::{DeleteError, Error, QueryErrorKind, Result};
use routewarden::kube::{RouteInventorySource, WorkloadDeleter};
use routewarden::registry::RegistryQueryClient;

/// Build a route whose workload name equals the host, in namespace `apps`.
pub fn route(host: &str) -> Route {
    Route {
        host: host.to_string(),
        ingress_name: format!("{host}-ingress"),
        namespace: "apps".to_string(),
        workload: WorkloadRef::new("apps", host),
    }
}

/// Build a route backed by an explicitly named workload.
pub fn route_with_workload(host: &str, workload: &str) -> Route {
    Route {
        host: host.to_string(),
        ingress_name: format!("{host}-ingress"),
        namespace: "apps".to_string(),
        workload: WorkloadRef::new("apps", workload),
    }
}

/// Fixed route inventory.
pub struct FakeInventory {
    routes: Vec<Route>,
    unreachable: bool,
}

impl FakeInventory {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes, unreachable: false }
    }

    pub fn unreachable() -> Self {
        Self { routes: Vec::new(), unreachable: true }
    }
}

#[async_trait]
impl RouteInventorySource for FakeInventory {
    async fn list_routes(&self) -> Result<Vec<Route>> {
        if self.unreachable {
            return Err(Error::connectivity("fake cluster API unreachable"));
        }
        Ok(self.routes.clone())
    }
}

/// Registry answering from a fixed host map; unknown hosts report both
/// records absent, hosts in `failing` fail their queries.
pub struct FakeRegistry {
    answers: HashMap<String, (bool, bool)>,
    failing: HashSet<String>,
}

impl FakeRegistry {
    pub fn new(answers: &[(&str, bool, bool)]) -> Self {
        Self {
            answers: answers.iter().map(|(h, dns, dep)| (h.to_string(), (*dns, *dep))).collect(),
            failing: HashSet::new(),
        }
    }

    pub fn failing_for(mut self, hosts: &[&str]) -> Self {
        self.failing = hosts.iter().map(|h| h.to_string()).collect();
        self
    }
}

#[async_trait]
impl RegistryQueryClient for FakeRegistry {
    async fn query_dns_record(&self, host: &str) -> std::result::Result<bool, QueryErrorKind> {
        if self.failing.contains(host) {
            return Err(QueryErrorKind::Transport("fake registry down".into()));
        }
        Ok(self.answers.get(host).map(|(dns, _)| *dns).unwrap_or(false))
    }

    async fn query_deployment_record(
        &self,
        host: &str,
    ) -> std::result::Result<bool, QueryErrorKind> {
        if self.failing.contains(host) {
            return Err(QueryErrorKind::Transport("fake registry down".into()));
        }
        Ok(self.answers.get(host).map(|(_, dep)| *dep).unwrap_or(false))
    }
}

/// Deleter that records every call and can fail scripted workloads.
pub struct FakeDeleter {
    pub deleted: Mutex<Vec<WorkloadRef>>,
    fail_on: HashSet<String>,
}

impl FakeDeleter {
    pub fn new() -> Self {
        Self { deleted: Mutex::new(Vec::new()), fail_on: HashSet::new() }
    }

    pub fn failing_on(workloads: &[&str]) -> Self {
        Self {
            deleted: Mutex::new(Vec::new()),
            fail_on: workloads.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn deleted_names(&self) -> Vec<String> {
        self.deleted.lock().unwrap().iter().map(|w| w.name.clone()).collect()
    }
}

#[async_trait]
impl WorkloadDeleter for FakeDeleter {
    async fn delete_workload(
        &self,
        workload: &WorkloadRef,
    ) -> std::result::Result<(), DeleteError> {
        if self.fail_on.contains(&workload.name) {
            return Err(DeleteError::Other("scripted delete failure".into()));
        }
        self.deleted.lock().unwrap().push(workload.clone());
        Ok(())
    }
}
