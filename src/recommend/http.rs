//! HTTP client for the recommendation service.
//!
//! One `POST {base_url}/recommend` per turn with `{"query": ...}`. The reply
//! body is read chunk by chunk so an oversized reply is cut off early instead
//! of being buffered whole. Error bodies are cut to a short preview the same
//! way before they reach the log.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::Value;

use crate::core::config::{DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_SERVICE_BASE_URL};
use crate::recommend::{RecommendRequest, RecommendResponse, RecommendationService, ServiceError};

/// Bytes of a non-2xx body kept for the error message.
pub const ERROR_BODY_PREVIEW: usize = 512;

pub struct HttpRecommendationService {
    base_url: String,
    max_response_bytes: usize,
    client: reqwest::Client,
}

impl HttpRecommendationService {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_SERVICE_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_max_response_bytes(mut self, limit: usize) -> Self {
        self.max_response_bytes = limit;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/recommend", self.base_url)
    }
}

#[async_trait]
impl RecommendationService for HttpRecommendationService {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn recommend(&self, query: &str) -> Result<Value, ServiceError> {
        let body = RecommendRequest {
            query: query.to_string(),
        };

        info!("POST {} ({} chars)", self.endpoint(), query.chars().count());

        let mut response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        debug!("Recommendation service status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let limit = ERROR_BODY_PREVIEW.min(self.max_response_bytes);
            let err_body = match read_capped(&mut response, limit).await {
                Ok((raw, false)) => String::from_utf8_lossy(&raw).into_owned(),
                Ok((raw, true)) => format!("{}...", String::from_utf8_lossy(&raw)),
                Err(_) => "unknown error".to_string(),
            };
            warn!("Recommendation service error: {} - {}", status, err_body);
            return Err(ServiceError::Api {
                status,
                message: err_body,
            });
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_response_bytes as u64)
        {
            return Err(ServiceError::TooLarge {
                limit: self.max_response_bytes,
            });
        }

        let (raw, truncated) = read_capped(&mut response, self.max_response_bytes)
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        if truncated {
            return Err(ServiceError::TooLarge {
                limit: self.max_response_bytes,
            });
        }

        let decoded: RecommendResponse =
            serde_json::from_slice(&raw).map_err(|e| ServiceError::Parse(e.to_string()))?;
        debug!("Recommendation payload: {}", decoded.recommendation);

        Ok(decoded.recommendation)
    }
}

/// Reads at most `limit` bytes of the body, stopping at the first chunk that
/// crosses it. The flag is true when the body was longer.
async fn read_capped(
    response: &mut reqwest::Response,
    limit: usize,
) -> Result<(Vec<u8>, bool), reqwest::Error> {
    let mut raw = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = limit - raw.len();
        if chunk.len() > room {
            raw.extend_from_slice(&chunk[..room]);
            return Ok((raw, true));
        }
        raw.extend_from_slice(&chunk);
    }
    Ok((raw, false))
}
