use sku_catalog::StaticCatalog;
use sku_core::ResolverConfig;

pub fn list(config: &ResolverConfig, format: &str) -> anyhow::Result<()> {
    let catalog = StaticCatalog::load(&config.catalog)?;
    let entries = catalog.entries();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&entries)?),
        _ => {
            println!("{:<28} {:>6} {:>10} {:>5}", "SKU", "VCPU", "MEMORY_MB", "GPU");
            for entry in &entries {
                let it = &entry.instance_type;
                println!(
                    "{:<28} {:>6} {:>10} {:>5}",
                    entry.name, it.vcpu, it.memory_mb, it.gpu_count
                );
            }
            println!("\n{} SKUs", entries.len());
        }
    }

    Ok(())
}
