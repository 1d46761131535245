//! sku-catalog — the static SKU catalog.
//!
//! An immutable, case-insensitive table from SKU name to
//! [`sku_core::InstanceType`]. It is assembled once at startup from the
//! built-in table and any TOML overlays, then shared read-only (usually
//! behind an `Arc`) by every resolver.
//!
//! # Overlay file format
//!
//! ```toml
//! [[sku]]
//! name = "Standard_NC6s_v3"
//! vcpu = 6
//! memory_mb = 114688
//! gpu_count = 1
//! ```

pub mod builtin;
pub mod catalog;
pub mod error;

pub use catalog::{CatalogBuilder, CatalogEntry, StaticCatalog};
pub use error::{CatalogError, CatalogResult};
