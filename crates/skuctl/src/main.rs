//! skuctl: resolve scale-set SKUs to their capacity profiles.
//!
//! # Usage
//!
//! ```text
//! skuctl resolve Standard_D4s_v3_Promo --region eastus --mode dynamic-then-static
//! skuctl catalog --format json
//! skuctl normalize Standard_DS2_v2_Promo
//! skuctl init --subscription-id 00000000-0000-0000-0000-000000000000
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sku_core::{MemoryConversion, ResolveMode};

mod commands;

#[derive(Parser)]
#[command(
    name = "skuctl",
    about = "Resolve scale-set SKUs to vCPU, memory and GPU counts",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: ./skuctl.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one SKU in a region.
    Resolve {
        /// SKU name, e.g. Standard_D2s_v3
        sku: String,
        /// Region of the scale set
        #[arg(short, long)]
        region: String,
        /// static, dynamic, static-then-dynamic or dynamic-then-static.
        /// Overrides [resolver].mode.
        #[arg(short, long)]
        mode: Option<ResolveMode>,
        /// truncate-gb or exact. Overrides [resolver].memory_conversion.
        #[arg(long)]
        memory_conversion: Option<MemoryConversion>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// List the static catalog (built-in table plus configured overlays).
    Catalog {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Show the promo-stripped form of a SKU name.
    Normalize { sku: String },
    /// Write a skuctl.toml scaffold.
    Init {
        /// Subscription to list remote SKUs from
        #[arg(long, default_value = "")]
        subscription_id: String,
        #[arg(short, long, default_value = "skuctl.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so json output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skuctl=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            sku,
            region,
            mode,
            memory_conversion,
            format,
        } => {
            let mut config = commands::load_config(cli.config.as_deref())?;
            if let Some(mode) = mode {
                config.resolver.mode = mode;
            }
            if let Some(conversion) = memory_conversion {
                config.resolver.memory_conversion = conversion;
            }
            commands::resolve::resolve(&config, &sku, &region, &format).await
        }
        Commands::Catalog { format } => {
            let config = commands::load_config(cli.config.as_deref())?;
            commands::catalog::list(&config, &format)
        }
        Commands::Normalize { sku } => commands::normalize::normalize(&sku),
        Commands::Init {
            subscription_id,
            path,
            force,
        } => commands::init::init(&path, &subscription_id, force),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_resolve_overrides() {
        let cli = Cli::try_parse_from([
            "skuctl",
            "--config",
            "custom.toml",
            "resolve",
            "Standard_D2s_v3",
            "--region",
            "eastus",
            "--mode",
            "static-then-dynamic",
            "--memory-conversion",
            "exact",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Commands::Resolve {
                sku,
                mode,
                memory_conversion,
                format,
                ..
            } => {
                assert_eq!(sku, "Standard_D2s_v3");
                assert_eq!(mode, Some(ResolveMode::StaticThenDynamic));
                assert_eq!(memory_conversion, Some(MemoryConversion::Exact));
                assert_eq!(format, "text");
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn rejects_unknown_mode() {
        let result = Cli::try_parse_from([
            "skuctl", "resolve", "Standard_D2s_v3", "--region", "eastus", "--mode", "fastest",
        ]);
        assert!(result.is_err());
    }
}
