//! Error types for catalog loading.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while assembling a static catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate sku {0:?} (names are case-insensitive)")]
    DuplicateSku(String),

    #[error("sku {0:?} has zero vcpus")]
    ZeroVcpu(String),

    #[error("sku entry with empty name")]
    EmptyName,
}
