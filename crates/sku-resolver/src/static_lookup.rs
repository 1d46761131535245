//! Static resolution against the in-memory catalog.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use sku_catalog::StaticCatalog;
use sku_core::{InstanceType, ScaleSetTemplate, is_promo, strip_promo};

use crate::error::{ResolveError, ResolveResult};
use crate::resolver::{InstanceTypeResolver, ResolveFuture};

/// Resolve `sku_name` from the catalog, falling back to the standard SKU
/// for promo variants.
///
/// An exact entry always wins, so a catalog that lists a promo SKU itself
/// returns that entry rather than the standard one.
pub fn resolve_static(sku_name: &str, catalog: &StaticCatalog) -> ResolveResult<InstanceType> {
    if let Some(instance_type) = catalog.lookup(sku_name) {
        return Ok(*instance_type);
    }

    if is_promo(sku_name) {
        let standard = strip_promo(sku_name);
        debug!(sku = %sku_name, standard = %standard, "no exact match, checking standard sku");
        if let Some(instance_type) = catalog.lookup(&standard) {
            return Ok(*instance_type);
        }
    }

    Err(ResolveError::NotSupported {
        sku: sku_name.to_string(),
        source: None,
    })
}

/// [`InstanceTypeResolver`] over a shared static catalog. Never performs
/// I/O and ignores cancellation.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    catalog: Arc<StaticCatalog>,
}

impl StaticResolver {
    pub fn new(catalog: Arc<StaticCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &StaticCatalog {
        &self.catalog
    }
}

impl InstanceTypeResolver for StaticResolver {
    fn name(&self) -> &'static str {
        "static"
    }

    fn resolve<'a>(
        &'a self,
        template: &'a ScaleSetTemplate,
        _cancel: &'a CancellationToken,
    ) -> ResolveFuture<'a> {
        let result = resolve_static(&template.sku_name, &self.catalog);
        Box::pin(async move { result })
    }
}
