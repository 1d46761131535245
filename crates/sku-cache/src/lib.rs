//! sku-cache — the region-scoped remote SKU catalog.
//!
//! The dynamic resolver never talks to the network itself. It asks a
//! [`SkuCacheFactory`] for a [`SkuCache`] scoped to one region and reads
//! [`ResourceSku`] descriptors out of it.
//!
//! # Components
//!
//! - **`sku`** — descriptor model and capability extraction
//! - **`client`** — `ResourceSkuClient` trait, snapshot-file and in-memory clients
//! - **`arm`** — ARM REST client (`Microsoft.Compute/skus`)
//! - **`cache`** — the per-region lookup table
//! - **`factory`** — cache construction and TTL pooling per region

pub mod arm;
pub mod cache;
pub mod client;
pub mod error;
pub mod factory;
pub mod sku;

pub use arm::ArmSkuClient;
pub use cache::SkuCache;
pub use client::{FileSkuClient, InMemorySkuClient, ListSkusFuture, ResourceSkuClient};
pub use error::{SkuError, SkuResult};
pub use factory::{
    BuildCacheFuture, ClientCacheFactory, RegionCachePool, RemoteCacheFactory, SkuCacheFactory,
};
pub use sku::{ResourceSku, SkuCapability};
