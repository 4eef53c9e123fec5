//! CLI definitions for config-tiers
//!
//! The binary resolves one of the bundled schemas and prints the result,
//! optionally with the per-field resolution report.

use crate::format::OutputFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Environment variable naming the config file when `--config` is not given.
pub const CONFIG_PATH_ENV: &str = "CONFIG_TIERS_PATH";

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Bundled schema to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SchemaChoice {
    /// Network server tuning (SharedLeaf)
    Leaf,
    /// HTTP application settings (SharedBeego)
    Beego,
    /// Both, with beego nested under "Beego" (default)
    #[default]
    Service,
}

/// Resolve configuration from environment, JSON file and defaults
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Schema to resolve
    #[arg(short, long, value_enum, default_value_t = SchemaChoice::Service)]
    pub schema: SchemaChoice,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Include the per-field source report and any errors
    #[arg(short, long)]
    pub report: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    pub log: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["config-tiers"]).unwrap();
        assert_eq!(cli.schema, SchemaChoice::Service);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.report);
        assert_eq!(cli.log, "2");
    }

    #[test]
    fn test_explicit_flags() {
        let cli = Cli::try_parse_from([
            "config-tiers",
            "--config",
            "/etc/game/leaf.json",
            "--schema",
            "leaf",
            "--format",
            "yaml",
            "--report",
            "-v",
            "--log",
            "off",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/game/leaf.json"));
        assert_eq!(cli.schema, SchemaChoice::Leaf);
        assert_eq!(cli.format, OutputFormat::Yaml);
        assert!(cli.report);
        assert!(cli.verbose);
        assert_eq!(cli.log, "off");
    }

    #[test]
    fn test_rejects_unknown_schema() {
        assert!(Cli::try_parse_from(["config-tiers", "--schema", "nope"]).is_err());
    }
}
