//! Primary/fallback composition of two resolvers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sku_core::ScaleSetTemplate;

use crate::error::ResolveError;
use crate::resolver::{InstanceTypeResolver, ResolveFuture};

/// When the fallback resolver gets a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Only when the primary does not know the SKU.
    OnNotSupported,
    /// On any primary failure, including infrastructure errors.
    OnAnyError,
}

impl FallbackPolicy {
    fn applies_to(&self, err: &ResolveError) -> bool {
        match self {
            FallbackPolicy::OnNotSupported => err.is_not_supported(),
            FallbackPolicy::OnAnyError => true,
        }
    }
}

/// Tries `primary`, then `fallback` according to `policy`. When both fail
/// the fallback's error is returned.
pub struct ChainedResolver {
    primary: Arc<dyn InstanceTypeResolver>,
    fallback: Arc<dyn InstanceTypeResolver>,
    policy: FallbackPolicy,
}

impl ChainedResolver {
    pub fn new(
        primary: Arc<dyn InstanceTypeResolver>,
        fallback: Arc<dyn InstanceTypeResolver>,
        policy: FallbackPolicy,
    ) -> Self {
        Self {
            primary,
            fallback,
            policy,
        }
    }
}

impl InstanceTypeResolver for ChainedResolver {
    fn name(&self) -> &'static str {
        "chained"
    }

    fn resolve<'a>(
        &'a self,
        template: &'a ScaleSetTemplate,
        cancel: &'a CancellationToken,
    ) -> ResolveFuture<'a> {
        Box::pin(async move {
            let err = match self.primary.resolve(template, cancel).await {
                Ok(instance_type) => return Ok(instance_type),
                Err(err) if self.policy.applies_to(&err) => err,
                Err(err) => return Err(err),
            };

            if err.is_not_supported() {
                debug!(
                    sku = %template.sku_name,
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    "sku unknown to primary resolver, trying fallback"
                );
            } else {
                warn!(
                    sku = %template.sku_name,
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %err,
                    "primary resolver failed, falling back"
                );
            }

            self.fallback.resolve(template, cancel).await
        })
    }
}
