//! Immutable, case-insensitive SKU catalog.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use sku_core::InstanceType;
use sku_core::config::CatalogSection;

use crate::builtin::BUILTIN_SKUS;
use crate::error::{CatalogError, CatalogResult};

/// A catalog entry, keeping the SKU name as it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(flatten)]
    pub instance_type: InstanceType,
}

/// Read-only SKU table. Built once through [`CatalogBuilder`]; there is no
/// way to mutate it afterwards.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    /// Lower-cased name → entry.
    entries: HashMap<String, CatalogEntry>,
}

impl StaticCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Catalog holding only the built-in table.
    pub fn builtin() -> Self {
        Self::builder().with_builtin().build()
    }

    /// Assemble the catalog described by a `[catalog]` config section.
    pub fn load(section: &CatalogSection) -> CatalogResult<Self> {
        let mut builder = Self::builder();
        if section.builtin {
            builder = builder.with_builtin();
        }
        for path in &section.paths {
            builder = builder.with_file(path)?;
        }
        Ok(builder.build())
    }

    /// Case-insensitive lookup of a SKU name. Folding is ASCII-only, which
    /// covers every Azure SKU name.
    pub fn lookup(&self, name: &str) -> Option<&InstanceType> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|entry| &entry.instance_type)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries sorted by name.
    pub fn entries(&self) -> Vec<&CatalogEntry> {
        let mut entries: Vec<&CatalogEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}

/// Layered construction of a [`StaticCatalog`].
///
/// Later layers override earlier ones (case-insensitively). Within a
/// single layer, two names differing only in case are an error.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entries: HashMap<String, CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "sku")]
    skus: Vec<SkuRecord>,
}

#[derive(Debug, Deserialize)]
struct SkuRecord {
    name: String,
    vcpu: u32,
    memory_mb: u64,
    #[serde(default)]
    gpu_count: u32,
}

impl CatalogBuilder {
    pub fn with_builtin(mut self) -> Self {
        for &(name, vcpu, memory_mb, gpu_count) in BUILTIN_SKUS {
            self.entries.insert(
                name.to_ascii_lowercase(),
                CatalogEntry {
                    name: name.to_string(),
                    instance_type: InstanceType::new(vcpu, memory_mb, gpu_count),
                },
            );
        }
        self
    }

    /// Add one layer of entries.
    pub fn with_entries<I, S>(mut self, entries: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = (S, InstanceType)>,
        S: Into<String>,
    {
        let mut layer: HashMap<String, CatalogEntry> = HashMap::new();
        for (name, instance_type) in entries {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if instance_type.vcpu == 0 {
                return Err(CatalogError::ZeroVcpu(name));
            }
            match layer.entry(name.to_ascii_lowercase()) {
                Entry::Occupied(_) => return Err(CatalogError::DuplicateSku(name)),
                Entry::Vacant(slot) => {
                    slot.insert(CatalogEntry {
                        name,
                        instance_type,
                    });
                }
            }
        }

        for (key, entry) in layer {
            if let Some(previous) = self.entries.insert(key, entry) {
                debug!(sku = %previous.name, "catalog entry overridden");
            }
        }
        Ok(self)
    }

    /// Add one layer parsed from TOML text.
    pub fn with_toml_str(self, content: &str) -> CatalogResult<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        self.with_entries(file.skus.into_iter().map(|r| {
            (r.name, InstanceType::new(r.vcpu, r.memory_mb, r.gpu_count))
        }))
    }

    /// Add one layer read from a TOML file.
    pub fn with_file(self, path: &Path) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let builder = self.with_toml_str(&content)?;
        debug!(path = %path.display(), "catalog overlay loaded");
        Ok(builder)
    }

    pub fn build(self) -> StaticCatalog {
        StaticCatalog {
            entries: self.entries,
        }
    }
}
