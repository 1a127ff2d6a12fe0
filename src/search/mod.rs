//! CMR search request adapters
//!
//! Each adapter knows how to shape outgoing parameters for one concept type
//! and how to reshape the JSON the CMR hands back. The HTTP call itself goes
//! through a [`client::SearchTransport`].

pub mod adapters;
pub mod browse;
pub mod client;
pub mod header;
pub mod params;
pub mod tags;
pub mod temporal;

use crate::config::Config;
use header::HeaderResolver;
use params::SearchParams;
use serde_json::{json, Value};

/// Logical CMR concept types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConceptType {
    Collection,
    Granule,
    Service,
    Variable,
}

/// Host and path a request object targets, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequestConfig {
    /// Host the search is posted to (API host or CMR host)
    pub base_host: String,

    /// Path below the host, before any extension is applied
    pub search_path: String,

    /// True when an auth token was supplied
    pub authenticated: bool,

    /// Token sent as a bearer credential
    pub auth_token: Option<String>,
}

impl SearchRequestConfig {
    /// Pick the authenticated API host when a non-empty token is supplied,
    /// otherwise the public CMR host of the configured environment.
    pub fn resolve(
        config: &Config,
        auth_token: Option<&str>,
        authenticated_path: &str,
        public_path: &str,
    ) -> Self {
        match auth_token.filter(|token| !token.is_empty()) {
            Some(token) => Self {
                base_host: config.environment.api_host.clone(),
                search_path: authenticated_path.to_string(),
                authenticated: true,
                auth_token: Some(token.to_string()),
            },
            None => Self {
                base_host: config.earthdata_config().cmr_host,
                search_path: public_path.to_string(),
                authenticated: false,
                auth_token: None,
            },
        }
    }
}

/// Body of an outgoing search request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` query string
    Form(String),
    /// JSON document sent to the authenticated API
    Json(Value),
}

impl RequestBody {
    pub fn content_type(&self) -> &'static str {
        match self {
            RequestBody::Form(_) => "application/x-www-form-urlencoded",
            RequestBody::Json(_) => "application/json",
        }
    }
}

/// Fully prepared POST request, ready for a transport
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    /// Absolute URL (`<base_host>/<path>`)
    pub url: String,

    /// Path relative to the base host
    pub path: String,

    /// `Accept` and, when authenticated, `Authorization`
    pub headers: Vec<(&'static str, String)>,

    pub body: RequestBody,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Request adapter abstraction - one implementation per concept type
pub trait RequestAdapter: Send + Sync {
    fn concept(&self) -> ConceptType;

    fn request_config(&self) -> &SearchRequestConfig;

    fn header_resolver(&self) -> &HeaderResolver;

    /// Keys allowed to reach the CMR for the given response format
    fn permitted_cmr_keys(&self, ext: &str) -> &'static [&'static str];

    /// Keys whose array values are encoded as `key[]=` rather than `key[0]=`
    fn non_indexed_keys(&self) -> &'static [&'static str];

    /// Path (relative to the base host) the search is posted to
    fn target_path(&self, ext: &str) -> String;

    /// Adjust caller parameters before encoding. Returns a new set.
    fn prepare_params(&self, params: &SearchParams) -> SearchParams {
        params.clone()
    }

    /// Reshape a successful response payload
    fn transform_response(&self, data: Value) -> Value;

    fn resolve_headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Accept", self.header_resolver().accept_header(self.concept()))];
        if let Some(token) = &self.request_config().auth_token {
            headers.push(("Authorization", format!("Bearer {token}")));
        }
        headers
    }

    fn build_query(&self, params: &SearchParams, ext: &str) -> RequestBody {
        let filtered = params
            .snake_cased()
            .permitted(self.permitted_cmr_keys(ext));

        if self.request_config().authenticated {
            RequestBody::Json(json!({
                "params": filtered.into_value(),
                "ext": ext,
            }))
        } else {
            RequestBody::Form(filtered.encode_form(self.non_indexed_keys()))
        }
    }

    fn prepare(&self, params: &SearchParams, ext: &str) -> PreparedRequest {
        let params = self.prepare_params(params);
        let path = self.target_path(ext);
        let base = self.request_config().base_host.trim_end_matches('/');

        PreparedRequest {
            url: format!("{base}/{path}"),
            headers: self.resolve_headers(),
            body: self.build_query(&params, ext),
            path,
        }
    }
}

/// Returns true when the payload carries a `statusCode` other than 200.
///
/// A missing status code means the upstream call succeeded. The comparison is
/// numeric, so `200.0` counts as success while the string `"200"` does not.
pub(crate) fn is_error_status(data: &Value) -> bool {
    match data.get("statusCode") {
        Some(Value::Number(code)) => code.as_f64() != Some(200.0),
        Some(_) => true,
        None => false,
    }
}

/// The entry's `id` when it is usable: a non-empty string or a non-zero number.
pub(crate) fn entry_id(entry: &Value) -> Option<String> {
    match entry.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) if id.as_f64() != Some(0.0) => Some(id.to_string()),
        _ => None,
    }
}

/// Search-related errors
#[derive(Debug, thiserror::Error)]
pub enum CmrError {
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Invalid response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
