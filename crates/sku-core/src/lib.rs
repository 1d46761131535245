//! sku-core — shared types for scale-set instance-type resolution.
//!
//! Holds the capacity profile returned to the autoscaler
//! ([`InstanceType`]), the scale-set template it is resolved from, the
//! promo-name normalization shared by every resolver, and the
//! `skuctl.toml` configuration model.

pub mod config;
pub mod promo;
pub mod types;

pub use config::{ConfigError, ResolverConfig, parse_duration};
pub use promo::{is_promo, strip_promo};
pub use types::*;
