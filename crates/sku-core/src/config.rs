//! skuctl.toml configuration parser.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{MemoryConversion, ResolveMode};

pub const DEFAULT_ARM_ENDPOINT: &str = "https://management.azure.com";
pub const DEFAULT_API_VERSION: &str = "2021-07-01";
pub const DEFAULT_TOKEN_ENV: &str = "AZURE_ACCESS_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("invalid duration {0:?} (expected e.g. \"30s\", \"10m\", \"1h\")")]
    InvalidDuration(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub resolver: ResolverSection,
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub remote: RemoteSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverSection {
    #[serde(default)]
    pub mode: ResolveMode,
    #[serde(default)]
    pub memory_conversion: MemoryConversion,
    /// Upper bound for one resolution, enforced by the caller.
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSection {
    /// Start from the built-in SKU table.
    #[serde(default = "default_true")]
    pub builtin: bool,
    /// TOML catalog files layered on top, in order.
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub subscription_id: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Read SKUs from a JSON snapshot instead of the remote API.
    pub snapshot: Option<PathBuf>,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: String,
    #[serde(default = "default_timeout")]
    pub request_timeout: String,
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> String {
    "30s".to_string()
}

fn default_cache_ttl() -> String {
    "10m".to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ARM_ENDPOINT.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

impl Default for ResolverSection {
    fn default() -> Self {
        Self {
            mode: ResolveMode::default(),
            memory_conversion: MemoryConversion::default(),
            timeout: default_timeout(),
        }
    }
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            builtin: true,
            paths: Vec::new(),
        }
    }
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            subscription_id: None,
            api_version: default_api_version(),
            token_env: default_token_env(),
            snapshot: None,
            cache_ttl: default_cache_ttl(),
            request_timeout: default_timeout(),
        }
    }
}

impl ResolverConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ResolverConfig = toml::from_str(content)?;
        // Surface bad durations at load time rather than mid-resolution.
        config.timeout()?;
        config.remote.cache_ttl()?;
        config.remote.request_timeout()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a skuctl.toml that resolves remotely with a static fallback.
    pub fn scaffold(subscription_id: &str) -> Self {
        ResolverConfig {
            resolver: ResolverSection {
                mode: ResolveMode::DynamicThenStatic,
                ..ResolverSection::default()
            },
            catalog: CatalogSection::default(),
            remote: RemoteSection {
                subscription_id: Some(subscription_id.to_string()),
                ..RemoteSection::default()
            },
        }
    }

    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.resolver.timeout)
    }
}

impl RemoteSection {
    pub fn cache_ttl(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.cache_ttl)
    }

    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.request_timeout)
    }
}

/// Parse a duration string like "500ms", "30s", "5m", "1h".
///
/// A bare number is read as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    let invalid = || ConfigError::InvalidDuration(s.to_string());

    let (digits, scale_ms) = if let Some(ms) = s.strip_suffix("ms") {
        (ms, 1)
    } else if let Some(secs) = s.strip_suffix('s') {
        (secs, 1_000)
    } else if let Some(mins) = s.strip_suffix('m') {
        (mins, 60_000)
    } else if let Some(hours) = s.strip_suffix('h') {
        (hours, 3_600_000)
    } else {
        (s, 1_000)
    };

    let value = digits.trim().parse::<u64>().map_err(|_| invalid())?;
    let millis = value.checked_mul(scale_ms).ok_or_else(invalid)?;
    Ok(Duration::from_millis(millis))
}
