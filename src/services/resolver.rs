//! Record resolution
//!
//! Joins the route inventory with the registry: one `RecordStatus` per unique
//! host, queried with bounded concurrency and a per-route timeout. Queries for
//! one host are attempted together; either sub-query failing collapses the
//! whole status to `QueryFailed` so a host is never partially classified.
//! No automatic retries; a retry is an operator-driven re-run.

use crate::domain::{RecordStatus, Route};
use crate::errors::QueryErrorKind;
use crate::registry::RegistryQueryClient;
use futures::StreamExt;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Resolves the full route inventory against the registry.
pub struct RecordResolver {
    client: Arc<dyn RegistryQueryClient>,
    concurrency: usize,
    query_timeout: Duration,
}

impl RecordResolver {
    /// Create a resolver. `concurrency` bounds in-flight registry queries;
    /// `query_timeout` caps each route's combined lookup.
    pub fn new(
        client: Arc<dyn RegistryQueryClient>,
        concurrency: usize,
        query_timeout: Duration,
    ) -> Self {
        Self { client, concurrency: concurrency.max(1), query_timeout }
    }

    /// Resolve every route, returning one status per unique host in inventory
    /// order. Duplicate hosts are dropped before querying, first occurrence
    /// wins. Cancellation stops new dispatches between routes; already
    /// dispatched queries complete and are included in the result.
    pub async fn resolve_all(
        &self,
        routes: &[Route],
        cancel: &CancellationToken,
    ) -> Vec<(Route, RecordStatus)> {
        let mut seen = HashSet::new();
        let unique: Vec<Route> = routes
            .iter()
            .filter(|route| {
                if seen.insert(route.host.clone()) {
                    true
                } else {
                    debug!(host = %route.host, "Duplicate host in inventory, keeping first occurrence");
                    false
                }
            })
            .cloned()
            .collect();

        let total = unique.len();
        info!(total, concurrency = self.concurrency, "Resolving routes against registry");

        // `buffered` preserves inventory order and pulls lazily from the
        // source stream, so the cancellation gate stops new dispatches while
        // in-flight queries run to completion.
        let resolved: Vec<(Route, RecordStatus)> = futures::stream::iter(unique)
            .take_while(|_| futures::future::ready(!cancel.is_cancelled()))
            .map(|route| {
                let client = Arc::clone(&self.client);
                let query_timeout = self.query_timeout;
                async move {
                    let status = resolve_one(client.as_ref(), &route, query_timeout).await;
                    (route, status)
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        if resolved.len() < total {
            warn!(resolved = resolved.len(), total, "Resolve pass cancelled before completion");
        }

        let failures = resolved
            .iter()
            .filter(|(_, status)| matches!(status, RecordStatus::QueryFailed(_)))
            .count();
        info!(resolved = resolved.len(), failures, "Resolve pass complete");

        resolved
    }
}

/// Resolve one route. Both existence checks are attempted together; the pair
/// shares one timeout and either failure discards the sibling result.
async fn resolve_one(
    client: &dyn RegistryQueryClient,
    route: &Route,
    query_timeout: Duration,
) -> RecordStatus {
    let lookups = async {
        futures::try_join!(
            client.query_dns_record(&route.host),
            client.query_deployment_record(&route.host)
        )
    };

    match tokio::time::timeout(query_timeout, lookups).await {
        Ok(Ok((dns_record, deployment_record))) => {
            debug!(host = %route.host, dns_record, deployment_record, "Route resolved");
            RecordStatus::resolved(dns_record, deployment_record)
        }
        Ok(Err(kind)) => {
            warn!(host = %route.host, error = %kind, "Registry query failed");
            RecordStatus::QueryFailed(kind)
        }
        Err(_) => {
            warn!(host = %route.host, timeout_ms = query_timeout.as_millis() as u64, "Registry query timed out");
            RecordStatus::QueryFailed(QueryErrorKind::Timeout)
        }
    }
}
