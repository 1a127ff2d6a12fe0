use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// CMR environment used for unauthenticated searches
    #[serde(default)]
    pub cmr_env: CmrEnvironment,

    /// Deployment environment settings (authenticated API host)
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// CMR hosts keyed by environment name
    #[serde(default = "default_earthdata")]
    pub earthdata: HashMap<String, EarthdataConfig>,

    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Enable debug logging to file
    #[serde(default)]
    pub debug: bool,

    /// Optional log file or directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_path: Option<String>,

    /// Log rotation strategy (defaults to `none`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_rotation: Option<DebugLogRotation>,

    /// Number of rotated log files to keep
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_keep: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cmr_env: CmrEnvironment::default(),
            environment: EnvironmentConfig::default(),
            earthdata: default_earthdata(),
            application: ApplicationConfig::default(),
            debug: false,
            debug_log_path: None,
            debug_log_rotation: None,
            debug_log_keep: None,
        }
    }
}

impl Config {
    /// Earthdata settings for the active CMR environment.
    ///
    /// Falls back to the built-in host when the environment is missing from the file.
    pub fn earthdata_config(&self) -> EarthdataConfig {
        self.earthdata
            .get(self.cmr_env.as_str())
            .cloned()
            .unwrap_or_else(|| EarthdataConfig {
                cmr_host: self.cmr_env.default_cmr_host().to_string(),
            })
    }

    /// Apply `CMR_ENV` from the process environment, if set and valid.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var("CMR_ENV") {
            match raw.parse::<CmrEnvironment>() {
                Ok(env) => self.cmr_env = env,
                Err(_) => {
                    tracing::warn!(cmr_env = %raw, "unknown CMR_ENV value, keeping configured environment");
                }
            }
        }
        self
    }
}

/// CMR deployment environments
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CmrEnvironment {
    #[default]
    Prod,
    Uat,
    Sit,
}

impl CmrEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmrEnvironment::Prod => "prod",
            CmrEnvironment::Uat => "uat",
            CmrEnvironment::Sit => "sit",
        }
    }

    pub fn default_cmr_host(&self) -> &'static str {
        match self {
            CmrEnvironment::Prod => "https://cmr.earthdata.nasa.gov",
            CmrEnvironment::Uat => "https://cmr.uat.earthdata.nasa.gov",
            CmrEnvironment::Sit => "https://cmr.sit.earthdata.nasa.gov",
        }
    }
}

impl std::str::FromStr for CmrEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" | "ops" => Ok(CmrEnvironment::Prod),
            "uat" => Ok(CmrEnvironment::Uat),
            "sit" => Ok(CmrEnvironment::Sit),
            other => Err(format!("unknown CMR environment: {other}")),
        }
    }
}

/// Deployment environment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Host of the application API used for authenticated searches
    #[serde(default = "default_api_host")]
    pub api_host: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            api_host: default_api_host(),
        }
    }
}

/// Earthdata settings for one CMR environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EarthdataConfig {
    /// Public CMR host for this environment
    pub cmr_host: String,
}

/// Application-wide search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// UMM version requested for collection results
    #[serde(default = "default_umm_collection_version")]
    pub umm_collection_version: String,

    /// UMM version requested for service results
    #[serde(default = "default_umm_service_version")]
    pub umm_service_version: String,

    /// UMM version requested for variable results
    #[serde(default = "default_umm_variable_version")]
    pub umm_variable_version: String,

    /// Size passed to the browse-scaler for collection thumbnails
    #[serde(default)]
    pub thumbnail_size: ThumbnailSize,

    /// Image shown when a collection has no browse imagery
    #[serde(default = "default_unavailable_image")]
    pub unavailable_image: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            umm_collection_version: default_umm_collection_version(),
            umm_service_version: default_umm_service_version(),
            umm_variable_version: default_umm_variable_version(),
            thumbnail_size: ThumbnailSize::default(),
            unavailable_image: default_unavailable_image(),
        }
    }
}

/// Thumbnail dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThumbnailSize {
    /// Height in pixels
    pub height: u32,

    /// Width in pixels
    pub width: u32,
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        Self {
            height: 85,
            width: 85,
        }
    }
}

/// How debug log files are rotated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DebugLogRotation {
    None,
    Daily,
}

fn default_earthdata() -> HashMap<String, EarthdataConfig> {
    [CmrEnvironment::Prod, CmrEnvironment::Uat, CmrEnvironment::Sit]
        .into_iter()
        .map(|env| {
            (
                env.as_str().to_string(),
                EarthdataConfig {
                    cmr_host: env.default_cmr_host().to_string(),
                },
            )
        })
        .collect()
}

fn default_api_host() -> String {
    "http://localhost:3001".to_string()
}

fn default_umm_collection_version() -> String {
    "1.15.3".to_string()
}

fn default_umm_service_version() -> String {
    "1.3.1".to_string()
}

fn default_umm_variable_version() -> String {
    "1.6".to_string()
}

fn default_unavailable_image() -> String {
    "assets/images/image-unavailable.svg".to_string()
}
