use crate::config::Config;
use crate::search::browse::first_browse_href;
use crate::search::header::HeaderResolver;
use crate::search::temporal::format_temporal;
use crate::search::{entry_id, is_error_status, ConceptType, RequestAdapter, SearchRequestConfig};
use serde_json::{json, Map, Value};

const PERMITTED_KEYS: &[&str] = &[
    "bounding_box",
    "browse_only",
    "cloud_cover",
    "day_night_flag",
    "echo_collection_id",
    "equator_crossing_date",
    "equator_crossing_longitude",
    "exclude",
    "line",
    "online_only",
    "options",
    "orbit_number",
    "page_num",
    "page_size",
    "point",
    "polygon",
    "readable_granule_name",
    "sort_key",
    "temporal",
    "two_d_coordinate_system",
];

const NON_INDEXED_KEYS: &[&str] = &["readable_granule_name", "sort_key"];

/// Granule search request
#[derive(Debug, Clone)]
pub struct GranuleRequest {
    config: SearchRequestConfig,
    headers: HeaderResolver,
}

impl GranuleRequest {
    pub fn new(config: &Config, auth_token: Option<&str>) -> Self {
        Self {
            config: SearchRequestConfig::resolve(
                config,
                auth_token,
                "granules",
                "search/granules.json",
            ),
            headers: HeaderResolver::new(&config.application),
        }
    }

    fn enrich(entry: Value) -> Value {
        let derived = GranuleFields::derive(&entry);
        match entry {
            Value::Object(mut fields) => {
                derived.apply(&mut fields);
                Value::Object(fields)
            }
            other => other,
        }
    }
}

/// Derived fields for one granule entry
#[derive(Debug, Clone, PartialEq, Eq)]
struct GranuleFields {
    formatted_temporal: [Option<String>; 2],
    browse_url: Option<String>,
    thumbnail: Option<String>,
}

impl GranuleFields {
    fn derive(entry: &Value) -> Self {
        let browse = first_browse_href(entry).map(str::to_string);
        let has_id = entry_id(entry).is_some();

        Self {
            formatted_temporal: format_temporal(
                entry.get("time_start").and_then(Value::as_str),
                entry.get("time_end").and_then(Value::as_str),
            ),
            thumbnail: if has_id { browse.clone() } else { None },
            browse_url: browse,
        }
    }

    fn apply(self, fields: &mut Map<String, Value>) {
        // Granules never come from CWIC on this path
        fields.insert("is_cwic".to_string(), Value::Bool(false));
        fields.insert("formatted_temporal".to_string(), json!(self.formatted_temporal));
        if let Some(url) = self.browse_url {
            fields.insert("browse_url".to_string(), Value::String(url));
        }
        if let Some(url) = self.thumbnail {
            fields.insert("thumbnail".to_string(), Value::String(url));
        }
    }
}

impl RequestAdapter for GranuleRequest {
    fn concept(&self) -> ConceptType {
        ConceptType::Granule
    }

    fn request_config(&self) -> &SearchRequestConfig {
        &self.config
    }

    fn header_resolver(&self) -> &HeaderResolver {
        &self.headers
    }

    fn permitted_cmr_keys(&self, _ext: &str) -> &'static [&'static str] {
        PERMITTED_KEYS
    }

    fn non_indexed_keys(&self) -> &'static [&'static str] {
        NON_INDEXED_KEYS
    }

    fn target_path(&self, _ext: &str) -> String {
        self.config.search_path.clone()
    }

    fn transform_response(&self, data: Value) -> Value {
        if is_error_status(&data) {
            return data;
        }

        let entries = match data {
            Value::Object(mut body) => match body.remove("feed") {
                Some(Value::Object(mut feed)) => match feed.remove("entry") {
                    Some(Value::Array(entries)) => entries,
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        let entry: Vec<Value> = entries.into_iter().map(Self::enrich).collect();

        json!({ "feed": { "entry": entry } })
    }
}
