//! Domain types for instance-type resolution.
//!
//! These types describe what the autoscaler asks for (a scale-set
//! template) and what it gets back (an [`InstanceType`] capacity profile),
//! plus the knobs that select how resolution happens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── Capacity profile ──────────────────────────────────────────────

/// Compute capacity of one VM of a given SKU.
///
/// Built fresh on every resolution and owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceType {
    /// Number of virtual CPUs. Always > 0 for a resolved SKU.
    pub vcpu: u32,
    /// Memory in megabytes.
    pub memory_mb: u64,
    /// Attached GPUs, 0 when none.
    #[serde(default)]
    pub gpu_count: u32,
}

impl InstanceType {
    pub fn new(vcpu: u32, memory_mb: u64, gpu_count: u32) -> Self {
        Self {
            vcpu,
            memory_mb,
            gpu_count,
        }
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vcpu={} memory_mb={} gpu={}",
            self.vcpu, self.memory_mb, self.gpu_count
        )
    }
}

// ── Template ──────────────────────────────────────────────────────

/// Resource category of a remote SKU descriptor.
///
/// Serialized with the remote catalog's `resourceType` spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    VirtualMachines,
    Disks,
    AvailabilitySets,
    Snapshots,
    #[serde(other)]
    Other,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::VirtualMachines => "virtualMachines",
            ResourceKind::Disks => "disks",
            ResourceKind::AvailabilitySets => "availabilitySets",
            ResourceKind::Snapshots => "snapshots",
            ResourceKind::Other => "other",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part of a scale-set definition needed to size its nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleSetTemplate {
    /// SKU name as configured on the scale set, e.g. `Standard_D2s_v3`.
    pub sku_name: String,
    /// Region the scale set lives in, e.g. `eastus`.
    pub region: String,
}

impl ScaleSetTemplate {
    pub fn new(sku_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            sku_name: sku_name.into(),
            region: region.into(),
        }
    }

    /// Scale sets are always made of virtual machines.
    pub fn kind(&self) -> ResourceKind {
        ResourceKind::VirtualMachines
    }
}

/// Canonical form of a region name: lower-case, whitespace removed.
///
/// `"East US"` and `"eastus"` name the same region.
pub fn normalize_region(region: &str) -> String {
    region
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ── Resolution knobs ──────────────────────────────────────────────

/// Which resolution strategy (or chain of strategies) to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolveMode {
    /// Built-in/static catalog only. No I/O.
    #[default]
    Static,
    /// Remote SKU catalog only.
    Dynamic,
    /// Static first; remote only for SKUs the static catalog does not know.
    StaticThenDynamic,
    /// Remote first; static catalog on any remote failure.
    DynamicThenStatic,
}

impl ResolveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveMode::Static => "static",
            ResolveMode::Dynamic => "dynamic",
            ResolveMode::StaticThenDynamic => "static-then-dynamic",
            ResolveMode::DynamicThenStatic => "dynamic-then-static",
        }
    }

    /// Whether this mode ever consults the remote catalog.
    pub fn uses_dynamic(&self) -> bool {
        !matches!(self, ResolveMode::Static)
    }

    /// Whether this mode ever consults the static catalog.
    pub fn uses_static(&self) -> bool {
        !matches!(self, ResolveMode::Dynamic)
    }
}

impl fmt::Display for ResolveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(ResolveMode::Static),
            "dynamic" => Ok(ResolveMode::Dynamic),
            "static-then-dynamic" => Ok(ResolveMode::StaticThenDynamic),
            "dynamic-then-static" => Ok(ResolveMode::DynamicThenStatic),
            other => Err(format!(
                "unknown resolve mode {other:?} (expected static, dynamic, \
                 static-then-dynamic or dynamic-then-static)"
            )),
        }
    }
}

/// How a gigabyte memory figure from the remote catalog becomes megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryConversion {
    /// `trunc(gb) * 1024`. Drops fractional gigabytes (7.5 GB -> 7168 MB).
    /// Matches what the autoscaler has always reported for dynamic SKUs.
    #[default]
    TruncateGb,
    /// `floor(gb * 1024)` (7.5 GB -> 7680 MB).
    Exact,
}

impl MemoryConversion {
    /// Convert a gigabyte value to megabytes.
    ///
    /// `None` for negative or non-finite input, or when the result does
    /// not fit in a `u64`.
    pub fn to_megabytes(&self, memory_gb: f64) -> Option<u64> {
        if !memory_gb.is_finite() || memory_gb < 0.0 {
            return None;
        }
        match self {
            MemoryConversion::TruncateGb => whole(memory_gb.trunc())?.checked_mul(1024),
            MemoryConversion::Exact => whole((memory_gb * 1024.0).floor()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryConversion::TruncateGb => "truncate-gb",
            MemoryConversion::Exact => "exact",
        }
    }
}

/// Non-negative whole `f64` as `u64`, refusing values `as` would saturate.
fn whole(value: f64) -> Option<u64> {
    (value < u64::MAX as f64).then_some(value as u64)
}

impl fmt::Display for MemoryConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryConversion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncate-gb" => Ok(MemoryConversion::TruncateGb),
            "exact" => Ok(MemoryConversion::Exact),
            other => Err(format!(
                "unknown memory conversion {other:?} (expected truncate-gb or exact)"
            )),
        }
    }
}
