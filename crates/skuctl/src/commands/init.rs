use std::path::Path;

use sku_core::ResolverConfig;

pub fn init(path: &Path, subscription_id: &str, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let config = ResolverConfig::scaffold(subscription_id);
    std::fs::write(path, config.to_toml_string()?)?;
    println!("✓ Generated {}", path.display());
    if subscription_id.is_empty() {
        println!("  set [remote].subscription_id before resolving dynamically");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sku_core::ResolveMode;

    #[test]
    fn writes_loadable_scaffold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skuctl.toml");

        init(&path, "sub-123", false).unwrap();

        let config = ResolverConfig::from_file(&path).unwrap();
        assert_eq!(config.resolver.mode, ResolveMode::DynamicThenStatic);
        assert_eq!(config.remote.subscription_id.as_deref(), Some("sub-123"));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skuctl.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(init(&path, "sub-123", false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        init(&path, "sub-123", true).unwrap();
        assert!(ResolverConfig::from_file(&path).is_ok());
    }
}
