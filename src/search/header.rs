use super::ConceptType;
use crate::config::settings::ApplicationConfig;

/// Granule searches ignore UMM versioning and always ask for plain JSON
pub const GRANULE_ACCEPT_HEADER: &str = "application/json";

/// Build the versioned UMM results media type
pub fn umm_version_header(version: &str) -> String {
    format!("application/vnd.nasa.cmr.umm_results+json; version={version}")
}

/// Maps a concept type to the `Accept` header sent with its searches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderResolver {
    collection_version: String,
    service_version: String,
    variable_version: String,
}

impl HeaderResolver {
    pub fn new(application: &ApplicationConfig) -> Self {
        Self {
            collection_version: application.umm_collection_version.clone(),
            service_version: application.umm_service_version.clone(),
            variable_version: application.umm_variable_version.clone(),
        }
    }

    pub fn accept_header(&self, concept: ConceptType) -> String {
        match concept {
            ConceptType::Granule => GRANULE_ACCEPT_HEADER.to_string(),
            ConceptType::Collection => umm_version_header(&self.collection_version),
            ConceptType::Service => umm_version_header(&self.service_version),
            ConceptType::Variable => umm_version_header(&self.variable_version),
        }
    }
}
