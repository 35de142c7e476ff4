//! Kubernetes API adapter
//!
//! Two narrow capability traits cover everything routewarden needs from the
//! cluster: listing ingress routes and deleting a workload. Both are
//! substitutable with fakes in tests; `KubeClient` is the HTTP implementation
//! against the Kubernetes API server.

use crate::config::KubeConfig;
use crate::domain::{Route, WorkloadNamer, WorkloadRef};
use crate::errors::{DeleteError, Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Supplies the current set of exposed routes.
#[async_trait]
pub trait RouteInventorySource: Send + Sync {
    /// List all routes, in cluster iteration order.
    ///
    /// Fails with `Error::Connectivity` when the cluster API is unreachable;
    /// that failure is fatal to the whole reconciliation session.
    async fn list_routes(&self) -> Result<Vec<Route>>;
}

/// The cluster mutation surface: deletes one workload.
#[async_trait]
pub trait WorkloadDeleter: Send + Sync {
    /// Delete the deployment backing a route.
    async fn delete_workload(&self, workload: &WorkloadRef) -> std::result::Result<(), DeleteError>;
}

/// HTTP client for the Kubernetes API server.
pub struct KubeClient {
    client: Client,
    config: KubeConfig,
    namer: Arc<dyn WorkloadNamer>,
}

impl KubeClient {
    /// Create a new client from configuration and a workload naming rule.
    pub fn new(config: KubeConfig, namer: Arc<dyn WorkloadNamer>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.insecure_tls)
            .build()
            .map_err(|e| Error::config(format!("failed to build Kubernetes HTTP client: {}", e)))?;

        Ok(Self { client, config, namer })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.config.token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.config.token)
        }
    }
}

#[async_trait]
impl RouteInventorySource for KubeClient {
    async fn list_routes(&self) -> Result<Vec<Route>> {
        let url = self.url("/apis/networking.k8s.io/v1/ingresses");
        debug!(url = %url, "Listing ingresses across namespaces");

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::connectivity(format!("cannot reach cluster API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::connectivity(format!(
                "ingress listing failed with status {}: {}",
                status, body
            )));
        }

        let list: IngressList = response
            .json()
            .await
            .map_err(|e| Error::connectivity(format!("unparseable ingress listing: {}", e)))?;

        let mut routes = Vec::new();
        for item in list.items {
            let name = item.metadata.name;
            let namespace = item.metadata.namespace;
            let rules = item.spec.map(|s| s.rules).unwrap_or_default();

            let hosts: Vec<String> = rules.into_iter().filter_map(|r| r.host).collect();
            if hosts.is_empty() {
                debug!(ingress = %name, namespace = %namespace, "Ingress has no host rules, skipping");
                continue;
            }

            for host in hosts {
                let workload = self.namer.workload_ref(&name, &namespace);
                routes.push(Route {
                    host,
                    ingress_name: name.clone(),
                    namespace: namespace.clone(),
                    workload,
                });
            }
        }

        info!(route_count = routes.len(), "Collected route inventory");
        Ok(routes)
    }
}

#[async_trait]
impl WorkloadDeleter for KubeClient {
    async fn delete_workload(&self, workload: &WorkloadRef) -> std::result::Result<(), DeleteError> {
        let url = self.url(&format!(
            "/apis/apps/v1/namespaces/{}/deployments/{}",
            workload.namespace, workload.name
        ));
        debug!(workload = %workload, url = %url, "Deleting deployment");

        let response = self.authorized(self.client.delete(&url)).send().await.map_err(|e| {
            if e.is_timeout() {
                DeleteError::Timeout
            } else {
                DeleteError::Other(format!("delete request failed: {}", e))
            }
        })?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(DeleteError::NotFound),
            StatusCode::FORBIDDEN => Err(DeleteError::Forbidden),
            status => {
                let body = response.text().await.unwrap_or_default();
                warn!(workload = %workload, status = %status, "Unexpected delete response");
                Err(DeleteError::Other(format!("status {}: {}", status, body)))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct IngressList {
    #[serde(default)]
    items: Vec<Ingress>,
}

#[derive(Debug, Deserialize)]
struct Ingress {
    metadata: IngressMetadata,
    spec: Option<IngressSpec>,
}

#[derive(Debug, Deserialize)]
struct IngressMetadata {
    name: String,
    namespace: String,
}

#[derive(Debug, Deserialize)]
struct IngressSpec {
    #[serde(default)]
    rules: Vec<IngressRule>,
}

#[derive(Debug, Deserialize)]
struct IngressRule {
    host: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SuffixTrimNamer;

    fn test_client() -> KubeClient {
        let config = KubeConfig {
            api_url: "https://kube.test:6443/".to_string(),
            token: "tok".to_string(),
            insecure_tls: false,
            timeout_seconds: 5,
        };
        KubeClient::new(config, Arc::new(SuffixTrimNamer::default())).unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = test_client();
        assert_eq!(
            client.url("/apis/networking.k8s.io/v1/ingresses"),
            "https://kube.test:6443/apis/networking.k8s.io/v1/ingresses"
        );
    }

    #[test]
    fn test_ingress_list_parsing() {
        let json = r#"{
            "items": [
                {
                    "metadata": {"name": "shop.example.com-ingress", "namespace": "apps"},
                    "spec": {"rules": [{"host": "shop.example.com"}]}
                },
                {
                    "metadata": {"name": "bare-ingress", "namespace": "apps"},
                    "spec": {"rules": [{}]}
                },
                {
                    "metadata": {"name": "no-spec", "namespace": "apps"}
                }
            ]
        }"#;

        let list: IngressList = serde_json::from_str(json).unwrap();
        assert_eq!(list.items.len(), 3);
        assert_eq!(list.items[0].metadata.name, "shop.example.com-ingress");
        assert_eq!(
            list.items[0].spec.as_ref().unwrap().rules[0].host.as_deref(),
            Some("shop.example.com")
        );
        assert!(list.items[1].spec.as_ref().unwrap().rules[0].host.is_none());
        assert!(list.items[2].spec.is_none());
    }
}
