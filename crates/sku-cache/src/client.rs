//! SKU listing transports.
//!
//! A [`ResourceSkuClient`] produces every SKU descriptor offered in one
//! region. Caches are built from whatever a client returns, so the client
//! is the only place that performs I/O.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{SkuError, SkuResult};
use crate::sku::ResourceSku;

/// Boxed future alias for SKU listings.
pub type ListSkusFuture<'a> =
    Pin<Box<dyn Future<Output = SkuResult<Vec<ResourceSku>>> + Send + 'a>>;

/// Lists SKU descriptors for a region. Injected for testability.
///
/// Implementations honour `cancel` by returning [`SkuError::Cancelled`].
pub trait ResourceSkuClient: Send + Sync {
    fn list_skus<'a>(&'a self, region: &'a str, cancel: &'a CancellationToken) -> ListSkusFuture<'a>;
}

impl<C: ResourceSkuClient + ?Sized> ResourceSkuClient for Arc<C> {
    fn list_skus<'a>(&'a self, region: &'a str, cancel: &'a CancellationToken) -> ListSkusFuture<'a> {
        (**self).list_skus(region, cancel)
    }
}

/// Serves a fixed set of descriptors.
#[derive(Debug, Clone, Default)]
pub struct InMemorySkuClient {
    skus: Vec<ResourceSku>,
}

impl InMemorySkuClient {
    pub fn new(skus: Vec<ResourceSku>) -> Self {
        Self { skus }
    }

    pub fn skus(&self) -> &[ResourceSku] {
        &self.skus
    }
}

impl ResourceSkuClient for InMemorySkuClient {
    fn list_skus<'a>(&'a self, region: &'a str, cancel: &'a CancellationToken) -> ListSkusFuture<'a> {
        Box::pin(async move {
            if cancel.is_cancelled() {
                return Err(SkuError::Cancelled);
            }
            Ok(self
                .skus
                .iter()
                .filter(|sku| sku.is_available_in(region))
                .cloned()
                .collect())
        })
    }
}

/// Serves descriptors from a JSON snapshot of the SKU listing.
///
/// The snapshot is either a bare array of descriptors or a saved API page
/// (`{ "value": [...] }`). It is read once, at construction.
#[derive(Debug, Clone)]
pub struct FileSkuClient {
    inner: InMemorySkuClient,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    Bare(Vec<ResourceSku>),
    Page { value: Vec<ResourceSku> },
}

impl FileSkuClient {
    pub fn open(path: &Path) -> SkuResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SkuError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let client = Self::from_json(&content)?;
        debug!(path = %path.display(), skus = client.inner.skus.len(), "sku snapshot loaded");
        Ok(client)
    }

    pub fn from_json(content: &str) -> SkuResult<Self> {
        let skus = match serde_json::from_str::<Snapshot>(content)? {
            Snapshot::Bare(skus) | Snapshot::Page { value: skus } => skus,
        };
        Ok(Self {
            inner: InMemorySkuClient::new(skus),
        })
    }
}

impl ResourceSkuClient for FileSkuClient {
    fn list_skus<'a>(&'a self, region: &'a str, cancel: &'a CancellationToken) -> ListSkusFuture<'a> {
        self.inner.list_skus(region, cancel)
    }
}
