use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sku_cache::{RemoteCacheFactory, SkuCacheFactory};
use sku_catalog::StaticCatalog;
use sku_core::{InstanceType, ResolveMode, ResolverConfig, ScaleSetTemplate};
use sku_resolver::{InstanceTypeResolver, build_resolver};

#[derive(Debug, Serialize)]
struct Resolution<'a> {
    sku: &'a str,
    region: &'a str,
    mode: ResolveMode,
    #[serde(flatten)]
    instance_type: InstanceType,
}

/// Wire the resolver described by `config`.
pub fn build(config: &ResolverConfig) -> anyhow::Result<Arc<dyn InstanceTypeResolver>> {
    let catalog = Arc::new(StaticCatalog::load(&config.catalog)?);
    let mode = config.resolver.mode;

    let factory: Option<Arc<dyn SkuCacheFactory>> = if mode.uses_dynamic() {
        let pool = RemoteCacheFactory::new(config.remote.clone()).pooled()?;
        Some(Arc::new(pool))
    } else {
        None
    };

    Ok(build_resolver(
        mode,
        catalog,
        factory,
        config.resolver.memory_conversion,
    )?)
}

pub async fn resolve(
    config: &ResolverConfig,
    sku: &str,
    region: &str,
    format: &str,
) -> anyhow::Result<()> {
    let resolver = build(config)?;
    let timeout = config.timeout()?;
    let template = ScaleSetTemplate::new(sku, region);
    let cancel = CancellationToken::new();

    let result = tokio::select! {
        result = resolver.resolve(&template, &cancel) => result,
        _ = tokio::time::sleep(timeout) => {
            cancel.cancel();
            anyhow::bail!("resolving {sku} timed out after {timeout:?}");
        }
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            anyhow::bail!("interrupted");
        }
    };

    let instance_type = match result {
        Ok(instance_type) => instance_type,
        Err(e) => {
            if e.is_not_supported() {
                warn!(sku, region, "sku not supported");
            }
            return Err(e.into());
        }
    };
    info!(sku, region, resolver = resolver.name(), "resolved");

    let resolution = Resolution {
        sku,
        region,
        mode: config.resolver.mode,
        instance_type,
    };
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&resolution)?),
        _ => println!("{sku} ({region}): {instance_type}"),
    }

    Ok(())
}
