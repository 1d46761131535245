//! Built-in SKU table.
//!
//! A snapshot of common general-purpose, memory-optimized,
//! compute-optimized and GPU sizes. Anything missing here can be added
//! with a TOML overlay or resolved through the remote catalog.

/// (name, vcpu, memory_mb, gpu_count)
pub const BUILTIN_SKUS: &[(&str, u32, u64, u32)] = &[
    // A series
    ("Standard_A0", 1, 768, 0),
    ("Standard_A1", 1, 1792, 0),
    ("Standard_A1_v2", 1, 2048, 0),
    ("Standard_A2_v2", 2, 4096, 0),
    ("Standard_A4_v2", 4, 8192, 0),
    // B series (burstable)
    ("Standard_B1ms", 1, 2048, 0),
    ("Standard_B2s", 2, 4096, 0),
    ("Standard_B2ms", 2, 8192, 0),
    ("Standard_B4ms", 4, 16384, 0),
    // D series
    ("Standard_D2_v3", 2, 8192, 0),
    ("Standard_D4_v3", 4, 16384, 0),
    ("Standard_D2s_v3", 2, 8192, 0),
    ("Standard_D4s_v3", 4, 16384, 0),
    ("Standard_D8s_v3", 8, 32768, 0),
    ("Standard_D16s_v3", 16, 65536, 0),
    ("Standard_D32s_v3", 32, 131072, 0),
    ("Standard_D2s_v5", 2, 8192, 0),
    ("Standard_D4s_v5", 4, 16384, 0),
    ("Standard_DS1_v2", 1, 3584, 0),
    ("Standard_DS2_v2", 2, 7168, 0),
    ("Standard_DS2_v2_Promo", 2, 7168, 0),
    ("Standard_DS3_v2", 4, 14336, 0),
    ("Standard_DS4_v2", 8, 28672, 0),
    // E series
    ("Standard_E2s_v3", 2, 16384, 0),
    ("Standard_E4s_v3", 4, 32768, 0),
    ("Standard_E8s_v3", 8, 65536, 0),
    // F series
    ("Standard_F2s_v2", 2, 4096, 0),
    ("Standard_F4s_v2", 4, 8192, 0),
    ("Standard_F8s_v2", 8, 16384, 0),
    // GPU
    ("Standard_NC6", 6, 57344, 1),
    ("Standard_NC12", 12, 114688, 2),
    ("Standard_NC24", 24, 229376, 4),
    ("Standard_NC6s_v3", 6, 114688, 1),
    ("Standard_NC12s_v3", 12, 229376, 2),
    ("Standard_NC24s_v3", 24, 458752, 4),
    ("Standard_NC4as_T4_v3", 4, 28672, 1),
    ("Standard_ND40rs_v2", 40, 688128, 8),
    ("Standard_NV6", 6, 57344, 1),
    ("Standard_NV12s_v3", 12, 114688, 1),
];
