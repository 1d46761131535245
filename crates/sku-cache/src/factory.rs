//! SKU cache construction and per-region pooling.
//!
//! [`ClientCacheFactory`] builds a fresh [`SkuCache`] on every call by
//! listing through a [`ResourceSkuClient`]. [`RemoteCacheFactory`] does the
//! same but constructs its client from the `[remote]` config on every
//! build, so credential problems surface as build errors.
//! [`RegionCachePool`] wraps any factory and hands out the same cache per
//! region until its TTL expires.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use sku_core::config::RemoteSection;
use sku_core::normalize_region;

use crate::arm::ArmSkuClient;
use crate::cache::SkuCache;
use crate::client::{FileSkuClient, ResourceSkuClient};
use crate::error::{SkuError, SkuResult};

/// Boxed future alias for cache construction.
pub type BuildCacheFuture<'a> =
    Pin<Box<dyn Future<Output = SkuResult<Arc<SkuCache>>> + Send + 'a>>;

/// Obtains a region-scoped SKU cache. Injected for testability.
pub trait SkuCacheFactory: Send + Sync {
    fn build<'a>(&'a self, region: &'a str, cancel: &'a CancellationToken) -> BuildCacheFuture<'a>;
}

impl<F: SkuCacheFactory + ?Sized> SkuCacheFactory for Arc<F> {
    fn build<'a>(&'a self, region: &'a str, cancel: &'a CancellationToken) -> BuildCacheFuture<'a> {
        (**self).build(region, cancel)
    }
}

/// Builds a new cache per call from a client listing.
#[derive(Debug, Clone)]
pub struct ClientCacheFactory<C> {
    client: C,
}

impl<C: ResourceSkuClient> ClientCacheFactory<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: ResourceSkuClient> SkuCacheFactory for ClientCacheFactory<C> {
    fn build<'a>(&'a self, region: &'a str, cancel: &'a CancellationToken) -> BuildCacheFuture<'a> {
        Box::pin(async move {
            let skus = self.client.list_skus(region, cancel).await?;
            let cache = SkuCache::new(region, skus);
            info!(region = %cache.region(), skus = cache.len(), "sku cache built");
            Ok(Arc::new(cache))
        })
    }
}

/// Builds caches from a `[remote]` section: a JSON snapshot when one is
/// configured, the ARM listing otherwise.
#[derive(Debug, Clone)]
pub struct RemoteCacheFactory {
    remote: RemoteSection,
}

impl RemoteCacheFactory {
    pub fn new(remote: RemoteSection) -> Self {
        Self { remote }
    }

    /// Pool caches from this factory for the configured `cache_ttl`.
    pub fn pooled(self) -> SkuResult<RegionCachePool<Self>> {
        let ttl = self
            .remote
            .cache_ttl()
            .map_err(|e| SkuError::Config(e.to_string()))?;
        Ok(RegionCachePool::new(self, ttl))
    }
}

impl SkuCacheFactory for RemoteCacheFactory {
    fn build<'a>(&'a self, region: &'a str, cancel: &'a CancellationToken) -> BuildCacheFuture<'a> {
        Box::pin(async move {
            let skus = match &self.remote.snapshot {
                Some(path) => FileSkuClient::open(path)?.list_skus(region, cancel).await?,
                None => {
                    ArmSkuClient::from_config(&self.remote)?
                        .list_skus(region, cancel)
                        .await?
                }
            };
            let cache = SkuCache::new(region, skus);
            info!(region = %cache.region(), skus = cache.len(), "sku cache built");
            Ok(Arc::new(cache))
        })
    }
}

struct PooledCache {
    cache: Arc<SkuCache>,
    built_at: Instant,
}

/// Keeps one cache per region for `ttl`, rebuilding through the inner
/// factory once it expires. Failed builds are never remembered.
pub struct RegionCachePool<F> {
    inner: F,
    ttl: Duration,
    /// Normalized region → cache.
    entries: Mutex<HashMap<String, PooledCache>>,
}

impl<F: SkuCacheFactory> RegionCachePool<F> {
    pub fn new(inner: F, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of regions currently pooled (expired entries included).
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Drop the pooled cache for a region, forcing a rebuild on next use.
    pub async fn evict(&self, region: &str) -> bool {
        self.entries
            .lock()
            .await
            .remove(&normalize_region(region))
            .is_some()
    }
}

impl<F: SkuCacheFactory> SkuCacheFactory for RegionCachePool<F> {
    fn build<'a>(&'a self, region: &'a str, cancel: &'a CancellationToken) -> BuildCacheFuture<'a> {
        Box::pin(async move {
            let key = normalize_region(region);

            {
                let entries = self.entries.lock().await;
                if let Some(pooled) = entries.get(&key) {
                    if pooled.built_at.elapsed() < self.ttl {
                        debug!(region = %key, "sku cache hit");
                        return Ok(pooled.cache.clone());
                    }
                    debug!(region = %key, "sku cache expired");
                } else {
                    debug!(region = %key, "sku cache miss");
                }
            }

            // Build without holding the lock; a concurrent build for the
            // same region just replaces the entry.
            let cache = self.inner.build(region, cancel).await?;
            self.entries.lock().await.insert(
                key,
                PooledCache {
                    cache: cache.clone(),
                    built_at: Instant::now(),
                },
            );
            Ok(cache)
        })
    }
}
