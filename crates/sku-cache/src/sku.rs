//! Remote SKU descriptor and capability extraction.
//!
//! Mirrors the shape of an entry in the `Microsoft.Compute/skus` listing.
//! Only the fields instance-type resolution needs are modelled; unknown
//! fields are ignored on decode.

use serde::{Deserialize, Serialize};

use sku_core::{ResourceKind, normalize_region};

use crate::error::{SkuError, SkuResult};

/// Capability holding the vCPU count.
pub const VCPUS: &str = "vCPUs";
/// Capability holding memory in (possibly fractional) gigabytes.
pub const MEMORY_GB: &str = "MemoryGB";
/// Capability holding the GPU count. Absent on non-GPU sizes.
pub const GPUS: &str = "GPUs";

/// One `{ name, value }` capability pair. Values are always strings on the
/// wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuCapability {
    pub name: String,
    pub value: String,
}

/// A SKU descriptor as returned by the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSku {
    pub name: String,
    pub resource_type: ResourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub capabilities: Vec<SkuCapability>,
}

impl ResourceSku {
    /// A bare virtual-machine descriptor offered in the given regions.
    pub fn virtual_machine<I, S>(name: impl Into<String>, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            resource_type: ResourceKind::VirtualMachines,
            tier: None,
            size: None,
            family: None,
            locations: locations.into_iter().map(Into::into).collect(),
            capabilities: Vec::new(),
        }
    }

    pub fn with_capability(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.capabilities.push(SkuCapability {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Raw value of a capability, matched by exact name.
    pub fn capability(&self, name: &str) -> Option<&str> {
        self.capabilities
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    pub fn integer_capability(&self, name: &str) -> SkuResult<i64> {
        let value = self
            .capability(name)
            .ok_or_else(|| SkuError::CapabilityNotFound(name.to_string()))?;
        value.trim().parse::<i64>().map_err(|_| SkuError::CapabilityParse {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    pub fn float_capability(&self, name: &str) -> SkuResult<f64> {
        let value = self
            .capability(name)
            .ok_or_else(|| SkuError::CapabilityNotFound(name.to_string()))?;
        value.trim().parse::<f64>().map_err(|_| SkuError::CapabilityParse {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    /// vCPU count. Must be a positive integer.
    pub fn vcpu(&self) -> SkuResult<u32> {
        let raw = self.integer_capability(VCPUS)?;
        match u32::try_from(raw) {
            Ok(vcpu) if vcpu > 0 => Ok(vcpu),
            _ => Err(invalid(VCPUS, raw)),
        }
    }

    /// Memory in gigabytes. Must be finite and non-negative.
    pub fn memory_gb(&self) -> SkuResult<f64> {
        let raw = self.float_capability(MEMORY_GB)?;
        if !raw.is_finite() || raw < 0.0 {
            return Err(invalid(MEMORY_GB, raw));
        }
        Ok(raw)
    }

    /// GPU count. A missing `GPUs` capability means no GPUs; a present
    /// but malformed one is an error.
    pub fn gpu_count(&self) -> SkuResult<u32> {
        let raw = match self.integer_capability(GPUS) {
            Ok(raw) => raw,
            Err(SkuError::CapabilityNotFound(_)) => return Ok(0),
            Err(e) => return Err(e),
        };
        u32::try_from(raw).map_err(|_| invalid(GPUS, raw))
    }

    /// Whether the SKU is offered in `region` (normalized comparison).
    pub fn is_available_in(&self, region: &str) -> bool {
        let region = normalize_region(region);
        self.locations
            .iter()
            .any(|location| normalize_region(location) == region)
    }
}

fn invalid(name: &str, value: impl ToString) -> SkuError {
    SkuError::InvalidCapability {
        name: name.to_string(),
        value: value.to_string(),
    }
}
