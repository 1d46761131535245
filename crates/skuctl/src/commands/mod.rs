pub mod catalog;
pub mod init;
pub mod normalize;
pub mod resolve;

use std::path::Path;

use anyhow::Context;
use sku_core::ResolverConfig;
use tracing::debug;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "skuctl.toml";

/// Load the explicit config, else `./skuctl.toml` if present, else defaults.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<ResolverConfig> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                debug!("no config file, using defaults");
                return Ok(ResolverConfig::default());
            }
            fallback
        }
    };

    let config = ResolverConfig::from_file(path)
        .with_context(|| format!("loading {}", path.display()))?;
    debug!(path = %path.display(), mode = %config.resolver.mode, "config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sku_core::ResolveMode;

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[resolver]\nmode = \"dynamic\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.resolver.mode, ResolveMode::Dynamic);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }
}
