//! # Error Handling
//!
//! Error types for routewarden using `thiserror`. The taxonomy mirrors the
//! three failure domains of a reconciliation run: inventory connectivity
//! (fatal), per-route registry queries (recovered as a classification), and
//! per-item deletions (recovered as an outcome).

use std::fmt;

/// Custom result type for routewarden operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for routewarden
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cluster API unreachable while listing routes. Fatal to the session:
    /// no partial classification is attempted on top of a missing inventory.
    #[error("Cluster connectivity error: {0}")]
    Connectivity(String),

    /// Per-route registry query failure, carried so callers can surface which
    /// host could not be classified.
    #[error("Registry query failed for '{host}': {kind}")]
    Query { host: String, kind: QueryErrorKind },

    /// Workload deletion failure
    #[error("Delete failed for '{workload}': {kind}")]
    Delete { workload: String, kind: DeleteError },

    /// Invalid session state transition
    #[error("Session error: {0}")]
    Session(String),

    /// Operation exceeded its caller-supplied timeout
    #[error("Operation timed out: {operation} after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new connectivity error
    pub fn connectivity<S: Into<String>>(message: S) -> Self {
        Self::Connectivity(message.into())
    }

    /// Create a new per-host query error
    pub fn query<S: Into<String>>(host: S, kind: QueryErrorKind) -> Self {
        Self::Query { host: host.into(), kind }
    }

    /// Create a new session state error
    pub fn session<S: Into<String>>(message: S) -> Self {
        Self::Session(message.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(operation: S, duration_ms: u64) -> Self {
        Self::Timeout { operation: operation.into(), duration_ms }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }
}

/// Why a single registry query could not produce an answer.
///
/// A failed query never reports a record as absent; it is carried as-is so the
/// route classifies as `QueryFailed` instead of becoming a deletion candidate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum QueryErrorKind {
    /// The query did not complete within the configured timeout
    Timeout,
    /// The registry endpoint could not be reached
    Transport(String),
    /// The registry answered with a non-success status or an unparseable body
    BadResponse(String),
}

impl fmt::Display for QueryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryErrorKind::Timeout => write!(f, "timeout"),
            QueryErrorKind::Transport(msg) => write!(f, "transport error: {}", msg),
            QueryErrorKind::BadResponse(msg) => write!(f, "bad response: {}", msg),
        }
    }
}

/// Per-item deletion failure kinds, mapped from the cluster mutation surface.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DeleteError {
    /// The workload no longer exists
    NotFound,
    /// The credentials are not allowed to delete the workload
    Forbidden,
    /// The delete call did not complete within the configured timeout
    Timeout,
    /// Any other failure, with the upstream message
    Other(String),
}

impl fmt::Display for DeleteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteError::NotFound => write!(f, "not found"),
            DeleteError::Forbidden => write!(f, "forbidden"),
            DeleteError::Timeout => write!(f, "timeout"),
            DeleteError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DeleteError {}
