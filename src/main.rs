//! config-tiers CLI
//!
//! Resolves a bundled schema from environment, JSON file and defaults and
//! prints the result. The resolved value is owned here and handed to whatever
//! consumes it; there is no global instance.

use anyhow::Result;
use clap::Parser;
use config_tiers::cli::{Cli, SchemaChoice};
use config_tiers::format::OutputFormat;
use config_tiers::schemas::{ServiceConfig, SharedBeego, SharedLeaf};
use config_tiers::{Configurable, Resolution, Resolver};
use serde::Serialize;
use std::fs::OpenOptions;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Resolved configuration plus the audit trail.
#[derive(Serialize)]
struct Report<'a, C> {
    config: &'a C,
    resolution: &'a Resolution,
}

fn init_logging(target: &str, verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    match target {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn resolve_and_render<C>(resolver: &Resolver, cli: &Cli, format: OutputFormat) -> Result<String>
where
    C: Configurable + Default + Serialize,
{
    let mut config = C::default();
    let resolution = resolver.load(&cli.config, &mut config);

    info!(
        path = %cli.config.display(),
        schema = config.schema_name(),
        fields = resolution.fields.len(),
        errors = resolution.errors.len(),
        "Configuration resolved"
    );
    if !resolution.is_clean() {
        warn!("Some configuration sources were missing or malformed; defaults applied");
    }

    if cli.report {
        format.render(&Report {
            config: &config,
            resolution: &resolution,
        })
    } else {
        format.render(&config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log, cli.verbose)?;

    let resolver = Resolver::new();
    let output = match cli.schema {
        SchemaChoice::Leaf => resolve_and_render::<SharedLeaf>(&resolver, &cli, cli.format)?,
        SchemaChoice::Beego => resolve_and_render::<SharedBeego>(&resolver, &cli, cli.format)?,
        SchemaChoice::Service => {
            resolve_and_render::<ServiceConfig>(&resolver, &cli, cli.format)?
        }
    };

    println!("{}", output);
    Ok(())
}
