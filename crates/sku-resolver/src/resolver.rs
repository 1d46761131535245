//! The resolver seam and mode-driven assembly.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use sku_cache::SkuCacheFactory;
use sku_catalog::StaticCatalog;
use sku_core::{InstanceType, MemoryConversion, ResolveMode, ScaleSetTemplate};

use crate::chain::{ChainedResolver, FallbackPolicy};
use crate::dynamic::DynamicResolver;
use crate::error::{ResolveError, ResolveResult};
use crate::static_lookup::StaticResolver;

/// Boxed future alias for a resolution.
pub type ResolveFuture<'a> =
    Pin<Box<dyn Future<Output = ResolveResult<InstanceType>> + Send + 'a>>;

/// Resolves a scale-set template to its capacity profile. Injected into
/// callers so tests can substitute their own.
pub trait InstanceTypeResolver: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    fn resolve<'a>(
        &'a self,
        template: &'a ScaleSetTemplate,
        cancel: &'a CancellationToken,
    ) -> ResolveFuture<'a>;
}

/// Assemble the resolver for `mode`.
///
/// `factory` is only required by modes that consult the remote catalog.
pub fn build_resolver(
    mode: ResolveMode,
    catalog: Arc<StaticCatalog>,
    factory: Option<Arc<dyn SkuCacheFactory>>,
    conversion: MemoryConversion,
) -> ResolveResult<Arc<dyn InstanceTypeResolver>> {
    let static_resolver = || Arc::new(StaticResolver::new(catalog.clone()));
    let dynamic_resolver = || -> ResolveResult<Arc<DynamicResolver>> {
        let factory = factory.clone().ok_or(ResolveError::MissingFactory(mode))?;
        Ok(Arc::new(
            DynamicResolver::new(factory).with_memory_conversion(conversion),
        ))
    };

    let resolver: Arc<dyn InstanceTypeResolver> = match mode {
        ResolveMode::Static => static_resolver(),
        ResolveMode::Dynamic => dynamic_resolver()?,
        ResolveMode::StaticThenDynamic => Arc::new(ChainedResolver::new(
            static_resolver(),
            dynamic_resolver()?,
            FallbackPolicy::OnNotSupported,
        )),
        ResolveMode::DynamicThenStatic => Arc::new(ChainedResolver::new(
            dynamic_resolver()?,
            static_resolver(),
            FallbackPolicy::OnAnyError,
        )),
    };

    info!(%mode, %conversion, catalog_skus = catalog.len(), "instance type resolver ready");
    Ok(resolver)
}
