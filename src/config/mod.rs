//! # Configuration Management
//!
//! Environment-driven configuration for routewarden. Every knob has a default
//! suitable for a lab cluster; production deployments set the `ROUTEWARDEN_*`
//! variables (or a `.env` file, loaded by the binary before anything reads
//! the environment).

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Default registry GraphQL endpoint
pub const DEFAULT_REGISTRY_ENDPOINT: &str = "https://laconicd.laconic.com/api";

/// Workload name patterns that must never be deleted, in the order they are
/// reported. Overridable via `ROUTEWARDEN_PROTECTED_PATTERNS`.
pub const DEFAULT_PROTECTED_PATTERNS: &[&str] = &[
    "webapp-deployer-api.pwa.*",
    "container-registry.pwa.*",
    "webapp-deployer-ui.pwa.*",
];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    /// Kubernetes API configuration
    #[validate(nested)]
    pub kube: KubeConfig,

    /// Registry query configuration
    #[validate(nested)]
    pub registry: RegistryConfig,

    /// Cleanup and protection configuration
    #[validate(nested)]
    pub cleanup: CleanupConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load the full configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            kube: KubeConfig::from_env()?,
            registry: RegistryConfig::from_env()?,
            cleanup: CleanupConfig::from_env(),
            observability: ObservabilityConfig::from_env(),
        };
        config.validate_all()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate_all(&self) -> Result<()> {
        Validate::validate(self)
            .map_err(|e| Error::config(format!("invalid configuration: {}", e)))?;
        self.validate_custom()
    }

    /// Custom validation beyond what the validator derive covers
    fn validate_custom(&self) -> Result<()> {
        url::Url::parse(&self.registry.endpoint)
            .map_err(|e| Error::config(format!("invalid registry endpoint: {}", e)))?;
        url::Url::parse(&self.kube.api_url)
            .map_err(|e| Error::config(format!("invalid Kubernetes API URL: {}", e)))?;

        for pattern in &self.cleanup.protected_patterns {
            glob::Pattern::new(pattern)
                .map_err(|e| Error::config(format!("invalid protection pattern '{}': {}", pattern, e)))?;
        }

        Ok(())
    }
}

/// Kubernetes API access configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct KubeConfig {
    /// Base URL of the Kubernetes API server
    #[validate(length(min = 1, message = "Kubernetes API URL cannot be empty"))]
    pub api_url: String,

    /// Bearer token for API authentication (empty for anonymous/local access)
    pub token: String,

    /// Accept self-signed API server certificates (lab clusters only)
    pub insecure_tls: bool,

    /// Request timeout in seconds, also applied to delete calls
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,
}

impl Default for KubeConfig {
    fn default() -> Self {
        Self {
            api_url: "https://127.0.0.1:6443".to_string(),
            token: String::new(),
            insecure_tls: false,
            timeout_seconds: 30,
        }
    }
}

impl KubeConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let token = match std::env::var("ROUTEWARDEN_KUBE_TOKEN") {
            Ok(token) => token,
            Err(_) => match std::env::var("ROUTEWARDEN_KUBE_TOKEN_FILE") {
                Ok(path) => std::fs::read_to_string(&path)
                    .map_err(|e| Error::config(format!("cannot read token file '{}': {}", path, e)))?
                    .trim()
                    .to_string(),
                Err(_) => String::new(),
            },
        };

        Ok(Self {
            api_url: std::env::var("ROUTEWARDEN_KUBE_API_URL").unwrap_or(defaults.api_url),
            token,
            insecure_tls: env_bool("ROUTEWARDEN_KUBE_INSECURE_TLS", defaults.insecure_tls)?,
            timeout_seconds: env_u64("ROUTEWARDEN_KUBE_TIMEOUT_SECS", defaults.timeout_seconds)?,
        })
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Registry query configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegistryConfig {
    /// GraphQL endpoint of the record registry
    #[validate(length(min = 1, message = "Registry endpoint cannot be empty"))]
    pub endpoint: String,

    /// Per-route query timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub query_timeout_seconds: u64,

    /// Maximum number of in-flight registry queries
    #[validate(range(min = 1, max = 64, message = "Concurrency must be between 1 and 64"))]
    pub query_concurrency: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_REGISTRY_ENDPOINT.to_string(),
            query_timeout_seconds: 30,
            query_concurrency: 8,
        }
    }
}

impl RegistryConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            endpoint: std::env::var("ROUTEWARDEN_REGISTRY_ENDPOINT").unwrap_or(defaults.endpoint),
            query_timeout_seconds: env_u64(
                "ROUTEWARDEN_QUERY_TIMEOUT_SECS",
                defaults.query_timeout_seconds,
            )?,
            query_concurrency: env_u64("ROUTEWARDEN_QUERY_CONCURRENCY", defaults.query_concurrency as u64)?
                as usize,
        })
    }

    /// Per-route query timeout as a Duration
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_seconds)
    }
}

/// Cleanup behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CleanupConfig {
    /// Ordered glob patterns naming workloads that must never be deleted
    pub protected_patterns: Vec<String>,

    /// Suffix trimmed from an ingress name to derive its workload name
    #[validate(length(min = 1, message = "Workload suffix cannot be empty"))]
    pub workload_suffix: String,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            protected_patterns: DEFAULT_PROTECTED_PATTERNS.iter().map(|s| s.to_string()).collect(),
            workload_suffix: "-ingress".to_string(),
        }
    }
}

impl CleanupConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let protected_patterns = match std::env::var("ROUTEWARDEN_PROTECTED_PATTERNS") {
            Ok(raw) => raw
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            Err(_) => defaults.protected_patterns,
        };

        Self {
            protected_patterns,
            workload_suffix: std::env::var("ROUTEWARDEN_WORKLOAD_SUFFIX")
                .unwrap_or(defaults.workload_suffix),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ObservabilityConfig {
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
}

impl ObservabilityConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self { log_json: env_bool("ROUTEWARDEN_LOG_JSON", false).unwrap_or(false) }
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|e| Error::config(format!("invalid {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

fn env_bool(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(raw) => match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(Error::config(format!("invalid {}: '{}'", key, other))),
        },
        Err(_) => Ok(default),
    }
}
