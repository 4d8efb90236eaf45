//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::recommend::{RecommendationService, ServiceError};

/// A scripted service: fails once if told to, otherwise returns a fixed reply.
/// Records every query it receives.
pub struct StubService {
    reply: Value,
    failure: Mutex<Option<ServiceError>>,
    queries: Mutex<Vec<String>>,
}

impl Default for StubService {
    fn default() -> Self {
        Self::replying(Value::Null)
    }
}

impl StubService {
    pub fn replying(reply: Value) -> Self {
        Self {
            reply,
            failure: Mutex::new(None),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            reply: Value::Null,
            failure: Mutex::new(Some(error)),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecommendationService for StubService {
    fn name(&self) -> &str {
        "stub"
    }

    async fn recommend(&self, query: &str) -> Result<Value, ServiceError> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(error) = self.failure.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self.reply.clone())
    }
}

/// A service whose request future panics, for exercising the turn guard.
pub struct PanickingService;

#[async_trait]
impl RecommendationService for PanickingService {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn recommend(&self, _query: &str) -> Result<Value, ServiceError> {
        panic!("service exploded mid-request");
    }
}

/// Creates a test App with a StubService and no greeting.
pub fn test_app() -> App {
    let config = ResolvedConfig {
        greeting: None,
        ..Default::default()
    };
    App::from_config(Arc::new(StubService::default()), &config)
}
