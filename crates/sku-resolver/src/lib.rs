//! sku-resolver — instance-type resolution for scale-set SKUs.
//!
//! Turns a [`ScaleSetTemplate`](sku_core::ScaleSetTemplate) into the
//! [`InstanceType`](sku_core::InstanceType) the autoscaler simulates
//! nodes with.
//!
//! # Resolution
//!
//! ```text
//! static:   catalog[name]  ->  catalog[strip_promo(name)]  ->  NotSupported
//! dynamic:  factory.build(region)                          ->  CacheConstruction
//!           cache.get(name) -> cache.get(strip_promo(name)) ->  NotSupported
//!           vcpu, gpu, memory                              ->  FactExtraction
//! ```
//!
//! Strategies are composed through [`build_resolver`] according to a
//! [`ResolveMode`](sku_core::ResolveMode).

pub mod chain;
pub mod dynamic;
pub mod error;
pub mod resolver;
pub mod static_lookup;

pub use chain::{ChainedResolver, FallbackPolicy};
pub use dynamic::{DynamicResolver, resolve_dynamic};
pub use error::{Fact, ResolveError, ResolveResult};
pub use resolver::{InstanceTypeResolver, ResolveFuture, build_resolver};
pub use static_lookup::{StaticResolver, resolve_static};
