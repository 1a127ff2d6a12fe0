use super::params::SearchParams;
use super::{CmrError, PreparedRequest, RequestAdapter, RequestBody};
use crate::logging::redact_secrets;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Response format used when the caller does not ask for one
pub const DEFAULT_EXT: &str = "json";

/// Raw HTTP response handed back by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,

    /// Raw response body
    pub body: String,
}

/// Transport abstraction - sends a prepared request somewhere
#[async_trait::async_trait]
pub trait SearchTransport: Send + Sync {
    async fn send(&self, request: &PreparedRequest) -> Result<TransportResponse, CmrError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, CmrError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, CmrError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait::async_trait]
impl SearchTransport for HttpTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<TransportResponse, CmrError> {
        let mut builder = self
            .client
            .post(&request.url)
            .header("Content-Type", request.body.content_type());

        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        builder = match &request.body {
            RequestBody::Form(encoded) => builder.body(encoded.clone()),
            RequestBody::Json(value) => builder.body(serde_json::to_vec(value)?),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}

/// Map an HTTP status to success or a typed error.
///
/// CMR error bodies look like `{"errors": ["..."]}`; those messages are surfaced.
pub fn classify_status(status: u16, body: &str) -> Result<(), CmrError> {
    if (200..300).contains(&status) {
        return Ok(());
    }

    let message = error_message(body);
    match status {
        401 | 403 => Err(CmrError::Unauthorized(message)),
        429 => Err(CmrError::RateLimited),
        _ => Err(CmrError::Api { status, message }),
    }
}

fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let errors = parsed
        .as_ref()
        .and_then(|v| v.get("errors"))
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; ")
        })
        .filter(|joined| !joined.is_empty());

    errors.unwrap_or_else(|| body.trim().to_string())
}

/// Runs searches for one adapter over a transport
pub struct SearchClient<A: RequestAdapter> {
    adapter: A,
    transport: Arc<dyn SearchTransport>,
}

impl<A: RequestAdapter> SearchClient<A> {
    pub fn new(adapter: A, transport: Arc<dyn SearchTransport>) -> Self {
        Self { adapter, transport }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Prepare, send and transform one search.
    pub async fn search(&self, params: &SearchParams, ext: &str) -> Result<Value, CmrError> {
        let request = self.adapter.prepare(params, ext);

        tracing::debug!(
            concept = ?self.adapter.concept(),
            url = %request.url,
            headers = %redact_secrets(&format!("{:?}", request.headers)),
            "sending cmr search"
        );

        let response = self.transport.send(&request).await?;

        if let Err(err) = classify_status(response.status, &response.body) {
            tracing::warn!(
                status = response.status,
                error = %err,
                "cmr search failed"
            );
            return Err(err);
        }

        let data: Value = if response.body.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(&response.body)?
        };

        let transformed = self.adapter.transform_response(data);

        tracing::debug!(
            concept = ?self.adapter.concept(),
            status = response.status,
            "cmr search completed"
        );

        Ok(transformed)
    }
}
