use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Common CLI arguments shared by every subcommand
#[derive(Parser, Debug, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Enable quiet mode (minimal output)")]
    pub quiet: bool,
}

/// Commands that only inspect configuration and never touch storage
#[derive(Subcommand, Debug, Clone)]
pub enum CommonCommands {
    /// Show current configuration and exit
    Config {
        #[arg(long, help = "Show configuration in JSON format")]
        json: bool,
    },
    /// Validate configuration and exit
    Validate,
    /// Show version information and exit
    Version,
}

/// Utility functions for CLI operations
pub mod utils {
    use super::*;
    use crate::config::{Configuration, StorageBackend};
    use anyhow::{Context, Result};
    use tracing_subscriber::EnvFilter;

    /// Log level implied by the verbosity flags.
    pub fn log_level(args: &CommonArgs) -> &'static str {
        if args.quiet {
            "warn"
        } else if args.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Initialize logging on stderr; `RUST_LOG` wins over the verbosity flags.
    pub fn init_logging(args: &CommonArgs) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(log_level(args)));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    /// Load configuration with optional override from CLI
    pub fn load_config(config_path: Option<&PathBuf>) -> Result<Configuration> {
        match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Configuration::load_from_path(path).context("Failed to load configuration")
            }
            None => Configuration::load().context("Failed to load configuration"),
        }
    }

    /// Display configuration in human-readable or JSON format
    pub fn display_config(config: &Configuration, json: bool) -> Result<()> {
        if json {
            let json = serde_json::to_string_pretty(config)
                .context("Failed to serialize configuration to JSON")?;
            println!("{json}");
        } else {
            println!("deploysweep Configuration:");
            println!("==========================");
            println!("Storage backend: {}", config.storage.backend);
            match config.storage.backend {
                StorageBackend::S3 => {
                    println!("Bucket: {}", config.storage.bucket);
                    println!("Region: {}", config.storage.region);
                    if config.storage.endpoint.is_empty() {
                        println!("Endpoint: AWS default");
                    } else {
                        println!("Endpoint: {}", config.storage.endpoint);
                    }
                }
                StorageBackend::File => println!("Path: {}", config.storage.path),
                StorageBackend::Memory => {}
            }
            if let Some(prefix) = &config.storage.prefix {
                println!("Key prefix: {prefix}");
            }

            if config.retention.keep > 0 {
                println!("Deployments to keep: {}", config.retention.keep);
            } else {
                println!("Deployments to keep: not set");
            }
            println!("Prefix delimiter: {:?}", config.retention.delimiter);

            println!("Dry run: {}", config.sweep.dry_run);
            println!("Batch size: {}", config.sweep.batch_size);
            println!(
                "Batch pause: {}",
                humantime::format_duration(config.sweep.batch_pause)
            );
        }
        Ok(())
    }

    /// Validate configuration and report any issues
    pub fn validate_config(config: &Configuration) -> Result<()> {
        log::info!("Validating configuration...");

        config.validate()?;

        if config.storage.backend == StorageBackend::S3 && !config.storage.endpoint.is_empty() {
            url::Url::parse(&config.storage.endpoint).with_context(|| {
                format!("Invalid storage endpoint '{}'", config.storage.endpoint)
            })?;
        }

        if config.retention.keep <= 0 {
            log::warn!(
                "retention.keep is {}; pass --keep or set DEPLOYSWEEP__RETENTION__KEEP before sweeping",
                config.retention.keep
            );
        }

        log::info!("Configuration validation passed");
        Ok(())
    }

    /// Handle commands that don't require storage access
    pub fn handle_common_command(command: &CommonCommands, config: &Configuration) -> Result<()> {
        match command {
            CommonCommands::Config { json } => display_config(config, *json),
            CommonCommands::Validate => validate_config(config),
            CommonCommands::Version => {
                println!("{}", version_info());
                Ok(())
            }
        }
    }

    /// Standard version information
    pub fn version_info() -> String {
        format!(
            "{} {} ({})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_RUST_VERSION")
        )
    }
}
