//! Common test utilities and fixtures for search testing
#![allow(dead_code)]

use async_trait::async_trait;
use cmr_search::config::Config;
use cmr_search::search::client::{SearchTransport, TransportResponse};
use cmr_search::search::{CmrError, PreparedRequest};
use serde_json::Value;
use std::sync::Mutex;

/// In-memory transport returning a canned response and recording requests
pub struct FakeTransport {
    status: u16,
    body: String,
    sent: Mutex<Vec<PreparedRequest>>,
}

impl FakeTransport {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn ok_json(body: &Value) -> Self {
        Self::new(200, body.to_string())
    }

    /// Requests seen so far
    pub fn sent(&self) -> Vec<PreparedRequest> {
        self.sent.lock().expect("transport lock poisoned").clone()
    }
}

#[async_trait]
impl SearchTransport for FakeTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<TransportResponse, CmrError> {
        self.sent
            .lock()
            .expect("transport lock poisoned")
            .push(request.clone());
        Ok(TransportResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

/// Default configuration with a predictable placeholder image
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.application.unavailable_image = "image-unavailable.svg".to_string();
    config.application.umm_collection_version = "1.15.3".to_string();
    config
}
