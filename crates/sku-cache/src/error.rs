//! Remote SKU catalog error types.

use std::path::PathBuf;

use sku_core::ResourceKind;
use thiserror::Error;

/// Result type alias for SKU catalog operations.
pub type SkuResult<T> = Result<T, SkuError>;

/// Errors from building a SKU cache or reading a descriptor.
#[derive(Debug, Error)]
pub enum SkuError {
    #[error("missing credentials: {0}")]
    Credentials(String),

    #[error("invalid sku client configuration: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sku api returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode sku listing: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("sku listing pagination failed: {0}")]
    Pagination(String),

    #[error("sku listing cancelled")]
    Cancelled,

    #[error("failed to find {kind} sku {name:?} in {region}")]
    NotFound {
        name: String,
        kind: ResourceKind,
        region: String,
    },

    #[error("capability {0:?} not found")]
    CapabilityNotFound(String),

    #[error("capability {name:?} has unparseable value {value:?}")]
    CapabilityParse { name: String, value: String },

    #[error("capability {name:?} has invalid value {value:?}")]
    InvalidCapability { name: String, value: String },
}

impl SkuError {
    /// Whether this is a plain lookup miss rather than a transport problem.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SkuError::NotFound { .. })
    }
}
