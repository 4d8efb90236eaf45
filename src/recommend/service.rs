use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

/// Errors that can occur while asking the service for recommendations.
/// Every variant ends the turn with the same apology bubble; the detail is
/// only for the log.
#[derive(Debug)]
pub enum ServiceError {
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// Service returned a non-2xx status.
    Api { status: u16, message: String },
    /// Body was not the JSON we expected.
    Parse(String),
    /// Body exceeded the configured size limit.
    TooLarge { limit: usize },
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Network(msg) => write!(f, "network error: {msg}"),
            ServiceError::Api { status, message } => {
                write!(f, "service error (HTTP {status}): {message}")
            }
            ServiceError::Parse(msg) => write!(f, "parse error: {msg}"),
            ServiceError::TooLarge { limit } => {
                write!(f, "response larger than {limit} bytes")
            }
        }
    }
}

impl std::error::Error for ServiceError {}

#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// Short name for logs and the title bar.
    fn name(&self) -> &str;

    /// Sends one query and returns the `recommendation` field of the reply.
    async fn recommend(&self, query: &str) -> Result<Value, ServiceError>;
}
