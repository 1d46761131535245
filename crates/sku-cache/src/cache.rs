//! Region-scoped SKU lookup table.

use sku_core::{ResourceKind, normalize_region};

use crate::error::{SkuError, SkuResult};
use crate::sku::ResourceSku;

/// Every SKU offered in one region, as listed at construction time.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SkuCache {
    region: String,
    skus: Vec<ResourceSku>,
}

impl SkuCache {
    /// Build a cache for `region`, dropping descriptors not offered there.
    pub fn new(region: &str, skus: Vec<ResourceSku>) -> Self {
        let region = normalize_region(region);
        let skus = skus
            .into_iter()
            .filter(|sku| sku.is_available_in(&region))
            .collect();
        Self { region, skus }
    }

    /// Normalized region this cache covers.
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn len(&self) -> usize {
        self.skus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skus.is_empty()
    }

    /// Find a SKU by name, kind and region. The name comparison ignores
    /// ASCII case only; kind must match exactly.
    pub fn get(&self, name: &str, kind: ResourceKind, region: &str) -> SkuResult<&ResourceSku> {
        let not_found = || SkuError::NotFound {
            name: name.to_string(),
            kind,
            region: region.to_string(),
        };

        if normalize_region(region) != self.region {
            return Err(not_found());
        }

        self.skus
            .iter()
            .find(|sku| sku.resource_type == kind && sku.name.eq_ignore_ascii_case(name))
            .ok_or_else(not_found)
    }
}
