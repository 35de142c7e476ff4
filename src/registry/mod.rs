//! Record registry client
//!
//! Answers, per route host, whether a DNS record and an application-deployment
//! record exist in the external registry. The capability trait keeps the core
//! substitutable with fakes; `LaconicClient` is the GraphQL implementation
//! against a laconicd registry endpoint.

use crate::config::RegistryConfig;
use crate::errors::QueryErrorKind;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, trace};

/// Per-host existence checks against the registry.
///
/// Both methods answer presence as a boolean; a failure is a `QueryErrorKind`,
/// never a silent "absent".
#[async_trait]
pub trait RegistryQueryClient: Send + Sync {
    /// Does a DnsRecord exist for this host?
    async fn query_dns_record(&self, host: &str) -> std::result::Result<bool, QueryErrorKind>;

    /// Does an ApplicationDeploymentRecord exist for this host?
    async fn query_deployment_record(&self, host: &str)
        -> std::result::Result<bool, QueryErrorKind>;
}

/// Record listing query, filtered by record type plus one identifying attribute.
const RECORDS_QUERY: &str = r#"
query($type: String!, $attrKey: String!, $attrValue: String!) {
  records: queryRecords(attributes: [
    {key: "type", value: {string: $type}},
    {key: $attrKey, value: {string: $attrValue}}
  ]) {
    id
  }
}
"#;

/// GraphQL client for a laconicd record registry.
pub struct LaconicClient {
    client: Client,
    endpoint: String,
}

impl LaconicClient {
    /// Create a new registry client from configuration.
    pub fn new(config: &RegistryConfig) -> crate::errors::Result<Self> {
        let client = Client::builder()
            .timeout(config.query_timeout())
            .build()
            .map_err(|e| crate::errors::Error::config(format!("failed to build registry HTTP client: {}", e)))?;

        Ok(Self { client, endpoint: config.endpoint.clone() })
    }

    async fn query_records(
        &self,
        record_type: &str,
        attr_key: &str,
        attr_value: &str,
    ) -> std::result::Result<bool, QueryErrorKind> {
        let body = json!({
            "query": RECORDS_QUERY,
            "variables": {
                "type": record_type,
                "attrKey": attr_key,
                "attrValue": attr_value,
            }
        });

        debug!(record_type = %record_type, %attr_key, %attr_value, "Querying registry");

        let response = self.client.post(&self.endpoint).json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                QueryErrorKind::Timeout
            } else {
                QueryErrorKind::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryErrorKind::BadResponse(format!("status {}", status)));
        }

        let body: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| QueryErrorKind::BadResponse(format!("unparseable body: {}", e)))?;

        if let Some(errors) = body.errors {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(QueryErrorKind::BadResponse(messages.join("; ")));
        }

        let records = body.data.map(|d| d.records).unwrap_or_default();
        trace!(record_count = records.len(), "Registry answered");
        Ok(!records.is_empty())
    }
}

#[async_trait]
impl RegistryQueryClient for LaconicClient {
    async fn query_dns_record(&self, host: &str) -> std::result::Result<bool, QueryErrorKind> {
        self.query_records("DnsRecord", "name", host).await
    }

    async fn query_deployment_record(
        &self,
        host: &str,
    ) -> std::result::Result<bool, QueryErrorKind> {
        // Deployment records key on the application URL, not the bare host.
        let app_url = format!("https://{}", host);
        self.query_records("ApplicationDeploymentRecord", "url", &app_url).await
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<RecordsData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Default, Deserialize)]
struct RecordsData {
    #[serde(default)]
    records: Vec<RecordStub>,
}

#[derive(Debug, Deserialize)]
struct RecordStub {
    #[allow(dead_code)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}
