//! Dynamic resolution against the region-scoped remote SKU catalog.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use sku_cache::sku::MEMORY_GB;
use sku_cache::{ResourceSku, SkuCacheFactory, SkuError};
use sku_core::{InstanceType, MemoryConversion, ScaleSetTemplate, strip_promo};

use crate::error::{Fact, ResolveError, ResolveResult};
use crate::resolver::{InstanceTypeResolver, ResolveFuture};

/// Resolve a template through a SKU cache obtained from `factory`.
///
/// Cache construction errors are returned as-is; a missing SKU is retried
/// once under its promo-stripped name. `cancel` is handed to the factory
/// untouched.
pub async fn resolve_dynamic<F>(
    template: &ScaleSetTemplate,
    factory: &F,
    cancel: &CancellationToken,
    conversion: MemoryConversion,
) -> ResolveResult<InstanceType>
where
    F: SkuCacheFactory + ?Sized,
{
    let sku_name = template.sku_name.as_str();

    let cache = factory
        .build(&template.region, cancel)
        .await
        .map_err(|source| {
            debug!(region = %template.region, error = %source, "failed to instantiate sku cache");
            ResolveError::CacheConstruction {
                region: template.region.clone(),
                source,
            }
        })?;

    let sku = match cache.get(sku_name, template.kind(), &template.region) {
        Ok(sku) => sku,
        Err(exact_miss) => {
            let standard = strip_promo(sku_name);
            if standard == sku_name {
                return Err(not_supported(sku_name, exact_miss));
            }
            debug!(
                sku = %sku_name,
                standard = %standard,
                error = %exact_miss,
                "no exact match, checking standard sku"
            );
            cache
                .get(&standard, template.kind(), &template.region)
                .map_err(|source| not_supported(sku_name, source))?
        }
    };

    extract_instance_type(sku_name, sku, conversion)
}

/// Read vCPU, GPU and memory, in that order, failing on the first bad fact.
fn extract_instance_type(
    sku_name: &str,
    sku: &ResourceSku,
    conversion: MemoryConversion,
) -> ResolveResult<InstanceType> {
    let vcpu = sku
        .vcpu()
        .map_err(|source| fact_error(sku_name, Fact::Vcpu, source))?;
    let gpu_count = sku
        .gpu_count()
        .map_err(|source| fact_error(sku_name, Fact::Gpu, source))?;
    let memory_gb = sku
        .memory_gb()
        .map_err(|source| fact_error(sku_name, Fact::Memory, source))?;
    let memory_mb = conversion.to_megabytes(memory_gb).ok_or_else(|| {
        let source = SkuError::InvalidCapability {
            name: MEMORY_GB.to_string(),
            value: memory_gb.to_string(),
        };
        fact_error(sku_name, Fact::Memory, source)
    })?;

    Ok(InstanceType::new(vcpu, memory_mb, gpu_count))
}

fn not_supported(sku_name: &str, source: SkuError) -> ResolveError {
    ResolveError::NotSupported {
        sku: sku_name.to_string(),
        source: Some(source),
    }
}

fn fact_error(sku_name: &str, fact: Fact, source: SkuError) -> ResolveError {
    debug!(sku = %sku_name, %fact, error = %source, "failed to parse sku fact");
    ResolveError::FactExtraction {
        sku: sku_name.to_string(),
        fact,
        source,
    }
}

/// [`InstanceTypeResolver`] over an injected SKU cache factory.
#[derive(Clone)]
pub struct DynamicResolver {
    factory: Arc<dyn SkuCacheFactory>,
    conversion: MemoryConversion,
}

impl DynamicResolver {
    pub fn new(factory: Arc<dyn SkuCacheFactory>) -> Self {
        Self {
            factory,
            conversion: MemoryConversion::default(),
        }
    }

    pub fn with_memory_conversion(mut self, conversion: MemoryConversion) -> Self {
        self.conversion = conversion;
        self
    }

    pub fn memory_conversion(&self) -> MemoryConversion {
        self.conversion
    }
}

impl InstanceTypeResolver for DynamicResolver {
    fn name(&self) -> &'static str {
        "dynamic"
    }

    fn resolve<'a>(
        &'a self,
        template: &'a ScaleSetTemplate,
        cancel: &'a CancellationToken,
    ) -> ResolveFuture<'a> {
        Box::pin(resolve_dynamic(
            template,
            self.factory.as_ref(),
            cancel,
            self.conversion,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sku_cache::sku::{GPUS, MEMORY_GB, VCPUS};
    use sku_cache::{BuildCacheFuture, ClientCacheFactory, InMemorySkuClient, SkuCache};

    fn vm(name: &str, vcpu: &str, memory_gb: &str) -> ResourceSku {
        ResourceSku::virtual_machine(name, ["eastus"])
            .with_capability(VCPUS, vcpu)
            .with_capability(MEMORY_GB, memory_gb)
    }

    fn factory(skus: Vec<ResourceSku>) -> ClientCacheFactory<InMemorySkuClient> {
        ClientCacheFactory::new(InMemorySkuClient::new(skus))
    }

    /// Fails every build, like a missing credential would.
    struct BrokenFactory;

    impl SkuCacheFactory for BrokenFactory {
        fn build<'a>(&'a self, _region: &'a str, _cancel: &'a CancellationToken) -> BuildCacheFuture<'a> {
            Box::pin(async { Err(SkuError::Credentials("token expired".to_string())) })
        }
    }

    /// Serves a prebuilt cache and remembers whether it saw cancellation.
    struct FixedFactory(Arc<SkuCache>);

    impl SkuCacheFactory for FixedFactory {
        fn build<'a>(&'a self, _region: &'a str, cancel: &'a CancellationToken) -> BuildCacheFuture<'a> {
            let cancelled = cancel.is_cancelled();
            let cache = self.0.clone();
            Box::pin(async move {
                if cancelled {
                    return Err(SkuError::Cancelled);
                }
                Ok(cache)
            })
        }
    }

    async fn resolve(
        name: &str,
        f: &dyn SkuCacheFactory,
        conversion: MemoryConversion,
    ) -> ResolveResult<InstanceType> {
        let template = ScaleSetTemplate::new(name, "eastus");
        resolve_dynamic(&template, f, &CancellationToken::new(), conversion).await
    }

    #[tokio::test]
    async fn resolves_plain_sku() {
        let f = factory(vec![vm("Standard_D4s_v3", "4", "16")]);
        let it = resolve("Standard_D4s_v3", &f, MemoryConversion::TruncateGb)
            .await
            .unwrap();
        assert_eq!(it, InstanceType::new(4, 16384, 0));
    }

    #[tokio::test]
    async fn name_match_ignores_case() {
        let f = factory(vec![vm("Standard_D4s_v3", "4", "16")]);
        let it = resolve("standard_d4s_V3", &f, MemoryConversion::TruncateGb)
            .await
            .unwrap();
        assert_eq!(it.vcpu, 4);
    }

    #[tokio::test]
    async fn fractional_memory_follows_conversion_rule() {
        let f = factory(vec![vm("Standard_DS11-1_v2", "1", "7.5")]);

        let truncated = resolve("Standard_DS11-1_v2", &f, MemoryConversion::TruncateGb)
            .await
            .unwrap();
        assert_eq!(truncated.memory_mb, 7168);

        let exact = resolve("Standard_DS11-1_v2", &f, MemoryConversion::Exact)
            .await
            .unwrap();
        assert_eq!(exact.memory_mb, 7680);
    }

    #[tokio::test]
    async fn gpu_count_is_read_when_present() {
        let f = factory(vec![
            vm("Standard_NC24s_v3", "24", "448").with_capability(GPUS, "4"),
        ]);
        let it = resolve("Standard_NC24s_v3", &f, MemoryConversion::TruncateGb)
            .await
            .unwrap();
        assert_eq!(it, InstanceType::new(24, 458752, 4));
    }

    #[tokio::test]
    async fn promo_miss_falls_back_to_standard() {
        let f = factory(vec![vm("Standard_D2s_v3", "2", "8")]);
        let direct = resolve("Standard_D2s_v3", &f, MemoryConversion::TruncateGb)
            .await
            .unwrap();
        let promo = resolve("Standard_D2s_v3_Promo", &f, MemoryConversion::TruncateGb)
            .await
            .unwrap();
        assert_eq!(promo, direct);
    }

    #[tokio::test]
    async fn exact_promo_descriptor_wins() {
        let f = factory(vec![
            vm("Standard_D2s_v3", "2", "8"),
            vm("Standard_D2s_v3_Promo", "2", "7"),
        ]);
        let it = resolve("Standard_D2s_v3_Promo", &f, MemoryConversion::TruncateGb)
            .await
            .unwrap();
        assert_eq!(it.memory_mb, 7168);
    }

    #[tokio::test]
    async fn double_miss_names_original_sku() {
        let f = factory(vec![vm("Standard_D2s_v3", "2", "8")]);
        let err = resolve("Standard_E2s_v3_Promo", &f, MemoryConversion::TruncateGb)
            .await
            .unwrap_err();
        match err {
            ResolveError::NotSupported { ref sku, ref source } => {
                assert_eq!(sku, "Standard_E2s_v3_Promo");
                assert!(source.as_ref().is_some_and(SkuError::is_not_found));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn plain_miss_is_not_supported() {
        let f = factory(Vec::new());
        let err = resolve("Standard_Q1", &f, MemoryConversion::TruncateGb)
            .await
            .unwrap_err();
        assert!(err.is_not_supported());
        assert_eq!(err.sku(), Some("Standard_Q1"));
    }

    #[tokio::test]
    async fn cache_construction_failure_is_distinct() {
        let err = resolve("Standard_D2s_v3", &BrokenFactory, MemoryConversion::TruncateGb)
            .await
            .unwrap_err();
        assert!(!err.is_not_supported());
        assert!(matches!(
            err,
            ResolveError::CacheConstruction { ref region, source: SkuError::Credentials(_) } if region == "eastus"
        ));
    }

    #[tokio::test]
    async fn malformed_gpu_is_a_fact_error_not_zero() {
        let f = factory(vec![
            vm("Standard_NV6", "6", "56").with_capability(GPUS, "many"),
        ]);
        let err = resolve("Standard_NV6", &f, MemoryConversion::TruncateGb)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::FactExtraction { fact: Fact::Gpu, ref sku, .. } if sku == "Standard_NV6"
        ));
    }

    #[tokio::test]
    async fn missing_vcpu_fails_before_other_facts() {
        let sku = ResourceSku::virtual_machine("Standard_Broken", ["eastus"])
            .with_capability(GPUS, "bogus");
        let f = factory(vec![sku]);
        let err = resolve("Standard_Broken", &f, MemoryConversion::TruncateGb)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::FactExtraction { fact: Fact::Vcpu, source: SkuError::CapabilityNotFound(_), .. }
        ));
    }

    #[tokio::test]
    async fn missing_memory_is_a_fact_error() {
        let sku = ResourceSku::virtual_machine("Standard_NoMem", ["eastus"]).with_capability(VCPUS, "2");
        let f = factory(vec![sku]);
        let err = resolve("Standard_NoMem", &f, MemoryConversion::TruncateGb)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::FactExtraction { fact: Fact::Memory, .. }));
    }

    #[tokio::test]
    async fn oversized_memory_is_a_fact_error() {
        let f = factory(vec![vm("Standard_Huge", "2", "1e17")]);
        for conversion in [MemoryConversion::TruncateGb, MemoryConversion::Exact] {
            let err = resolve("Standard_Huge", &f, conversion).await.unwrap_err();
            assert!(matches!(
                err,
                ResolveError::FactExtraction {
                    fact: Fact::Memory,
                    source: SkuError::InvalidCapability { .. },
                    ..
                }
            ));
        }
    }

    #[tokio::test]
    async fn cancellation_is_passed_to_factory() {
        let cache = Arc::new(SkuCache::new("eastus", vec![vm("Standard_D2s_v3", "2", "8")]));
        let resolver = DynamicResolver::new(Arc::new(FixedFactory(cache)));
        let template = ScaleSetTemplate::new("Standard_D2s_v3", "eastus");

        let cancel = CancellationToken::new();
        assert!(resolver.resolve(&template, &cancel).await.is_ok());

        cancel.cancel();
        let err = resolver.resolve(&template, &cancel).await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::CacheConstruction { source: SkuError::Cancelled, .. }
        ));
    }

    #[tokio::test]
    async fn resolver_uses_configured_conversion() {
        let f: Arc<dyn SkuCacheFactory> = Arc::new(factory(vec![vm("Standard_A0", "1", "0.75")]));
        let template = ScaleSetTemplate::new("Standard_A0", "eastus");
        let cancel = CancellationToken::new();

        let default = DynamicResolver::new(f.clone());
        assert_eq!(default.memory_conversion(), MemoryConversion::TruncateGb);
        assert_eq!(default.resolve(&template, &cancel).await.unwrap().memory_mb, 0);

        let exact = DynamicResolver::new(f).with_memory_conversion(MemoryConversion::Exact);
        assert_eq!(exact.resolve(&template, &cancel).await.unwrap().memory_mb, 768);
    }
}
