//! Resolution error types.

use std::fmt;

use sku_cache::SkuError;
use sku_core::ResolveMode;
use thiserror::Error;

/// Result type alias for resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// The fact being read from a SKU descriptor when extraction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fact {
    Vcpu,
    Gpu,
    Memory,
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Fact::Vcpu => "vcpu",
            Fact::Gpu => "gpu",
            Fact::Memory => "memory",
        })
    }
}

/// Errors that can occur while resolving an instance type.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Neither the SKU nor its promo-stripped name is known. Carries the
    /// name as the caller gave it.
    #[error("instance type {sku:?} not supported")]
    NotSupported {
        sku: String,
        #[source]
        source: Option<SkuError>,
    },

    /// The region-scoped SKU cache could not be obtained.
    #[error("failed to build sku cache for region {region:?}: {source}")]
    CacheConstruction {
        region: String,
        #[source]
        source: SkuError,
    },

    /// A descriptor was found but one of its facts is unusable.
    #[error("failed to parse {fact} from sku {sku:?}: {source}")]
    FactExtraction {
        sku: String,
        fact: Fact,
        #[source]
        source: SkuError,
    },

    #[error("resolve mode {0} needs a sku cache factory")]
    MissingFactory(ResolveMode),
}

impl ResolveError {
    /// Unknown SKU, as opposed to an infrastructure or data problem.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, ResolveError::NotSupported { .. })
    }

    /// The SKU name the error is about, if any.
    pub fn sku(&self) -> Option<&str> {
        match self {
            ResolveError::NotSupported { sku, .. } | ResolveError::FactExtraction { sku, .. } => {
                Some(sku)
            }
            _ => None,
        }
    }
}
