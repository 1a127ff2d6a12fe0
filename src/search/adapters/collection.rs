use crate::config::Config;
use crate::search::browse::{browse_scaler_url, first_browse_href};
use crate::search::header::HeaderResolver;
use crate::search::params::SearchParams;
use crate::search::tags::{has_exact_tag, has_tag, CWIC_TAG};
use crate::search::{entry_id, is_error_status, ConceptType, RequestAdapter, SearchRequestConfig};
use serde_json::{Map, Value};

const PERMITTED_KEYS: &[&str] = &[
    "params",
    "bounding_box",
    "collection_data_type",
    "concept_id",
    "data_center_h",
    "data_center",
    "echo_collection_id",
    "format",
    "facets_size",
    "granule_data_format_h",
    "has_granules",
    "has_granules_or_cwic",
    "include_facets",
    "include_granule_counts",
    "include_has_granules",
    "include_tags",
    "instrument_h",
    "keyword",
    "line",
    "options",
    "page_num",
    "page_size",
    "platform_h",
    "point",
    "polygon",
    "processing_level_id_h",
    "project_h",
    "project",
    "science_keywords_h",
    "sort_key",
    "tag_key",
    "temporal",
    "two_d_coordinate_system",
];

const UMM_JSON_PERMITTED_KEYS: &[&str] = &["concept_id"];

const NON_INDEXED_KEYS: &[&str] = &[
    "collection_data_type",
    "concept_id",
    "data_center_h",
    "granule_data_format_h",
    "instrument_h",
    "platform_h",
    "processing_level_id_h",
    "project_h",
    "sort_key",
    "tag_key",
];

/// Where collection thumbnails come from when no browse link exists
#[derive(Debug, Clone, PartialEq, Eq)]
struct ThumbnailSource {
    cmr_host: String,
    height: u32,
    width: u32,
    unavailable_image: String,
}

/// Collection search request
///
/// With an auth token the search goes through the application API;
/// without one it goes straight to the public CMR.
#[derive(Debug, Clone)]
pub struct CollectionRequest {
    config: SearchRequestConfig,
    headers: HeaderResolver,
    thumbnails: ThumbnailSource,
}

impl CollectionRequest {
    pub fn new(config: &Config, auth_token: Option<&str>) -> Self {
        let application = &config.application;

        Self {
            config: SearchRequestConfig::resolve(
                config,
                auth_token,
                "collections",
                "search/collections",
            ),
            headers: HeaderResolver::new(application),
            thumbnails: ThumbnailSource {
                cmr_host: config.earthdata_config().cmr_host,
                height: application.thumbnail_size.height,
                width: application.thumbnail_size.width,
                unavailable_image: application.unavailable_image.clone(),
            },
        }
    }

    fn enrich(&self, entry: Value) -> Value {
        if !entry.is_object() {
            return entry;
        }
        let flags = CollectionFlags::derive(&entry, &self.thumbnails);
        match entry {
            Value::Object(mut fields) => {
                flags.apply(&mut fields);
                Value::Object(fields)
            }
            other => other,
        }
    }
}

/// Derived fields for one collection entry
#[derive(Debug, Clone, PartialEq, Eq)]
struct CollectionFlags {
    is_cwic: bool,
    is_nrt: bool,
    has_map_imagery: bool,
    thumbnail: Option<String>,
}

impl CollectionFlags {
    fn derive(entry: &Value, thumbnails: &ThumbnailSource) -> Self {
        let is_cwic = has_exact_tag(entry, CWIC_TAG)
            && entry.get("has_granules").and_then(Value::as_bool) == Some(false);

        let is_nrt = entry.get("collection_data_type").and_then(Value::as_str)
            == Some("NEAR_REAL_TIME");

        let thumbnail = entry_id(entry).map(|id| Self::thumbnail(entry, &id, thumbnails));

        Self {
            is_cwic,
            is_nrt,
            has_map_imagery: has_tag(entry, "gibs"),
            thumbnail,
        }
    }

    // Browse link first, then the scaler when CMR says imagery exists
    fn thumbnail(entry: &Value, id: &str, source: &ThumbnailSource) -> String {
        if let Some(href) = first_browse_href(entry) {
            return href.to_string();
        }

        if entry.get("browse_flag").and_then(Value::as_bool) == Some(true) {
            return browse_scaler_url(&source.cmr_host, id, source.height, source.width);
        }

        source.unavailable_image.clone()
    }

    fn apply(self, fields: &mut Map<String, Value>) {
        fields.insert("is_cwic".to_string(), Value::Bool(self.is_cwic));
        fields.insert("is_nrt".to_string(), Value::Bool(self.is_nrt));
        fields.insert("has_map_imagery".to_string(), Value::Bool(self.has_map_imagery));
        if let Some(thumbnail) = self.thumbnail {
            fields.insert("thumbnail".to_string(), Value::String(thumbnail));
        }
    }
}

impl RequestAdapter for CollectionRequest {
    fn concept(&self) -> ConceptType {
        ConceptType::Collection
    }

    fn request_config(&self) -> &SearchRequestConfig {
        &self.config
    }

    fn header_resolver(&self) -> &HeaderResolver {
        &self.headers
    }

    fn permitted_cmr_keys(&self, ext: &str) -> &'static [&'static str] {
        if ext == "umm_json" {
            UMM_JSON_PERMITTED_KEYS
        } else {
            PERMITTED_KEYS
        }
    }

    fn non_indexed_keys(&self) -> &'static [&'static str] {
        NON_INDEXED_KEYS
    }

    fn target_path(&self, ext: &str) -> String {
        if self.config.authenticated {
            format!("{}/{}", self.config.search_path, ext)
        } else {
            format!("{}.{}", self.config.search_path, ext)
        }
    }

    fn prepare_params(&self, params: &SearchParams) -> SearchParams {
        // Coordinates are already encoded in the system name
        params
            .without_nested("twoDCoordinateSystem", "coordinates")
            .without_nested("two_d_coordinate_system", "coordinates")
    }

    fn transform_response(&self, data: Value) -> Value {
        if is_error_status(&data) {
            return data;
        }

        let Value::Object(mut body) = data else {
            return data;
        };
        if body.is_empty() {
            return Value::Object(body);
        }

        // `items` wins only when it actually holds a list
        let use_items = matches!(body.get("items"), Some(Value::Array(_)));
        let entries = if use_items {
            body.get_mut("items")
        } else {
            body.get_mut("feed").and_then(|feed| feed.get_mut("entry"))
        };

        if let Some(Value::Array(entries)) = entries {
            let enriched = std::mem::take(entries)
                .into_iter()
                .map(|entry| self.enrich(entry))
                .collect();
            *entries = enriched;
        } else {
            tracing::debug!("collection response carried no entry list");
        }

        Value::Object(body)
    }
}
