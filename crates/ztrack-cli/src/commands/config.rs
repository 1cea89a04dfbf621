use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use ztrack_core::tracking::TrackingConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout (.json or .toml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Tracker groups to include
    #[arg(short, long, value_delimiter = ',', default_value = "eye,tail")]
    pub groups: Vec<String>,
}

/// Print or save a default configuration for the requested groups.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let groups: Vec<&str> = args.groups.iter().map(String::as_str).collect();
    let config = TrackingConfig::default_for(&groups)?;

    if let Some(ref path) = args.output {
        save_config(&config, path)?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml::to_string_pretty(&config)?);
    }

    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Result<ConfigFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        _ => bail!(
            "Unsupported config format for {} (expected .json or .toml)",
            path.display()
        ),
    }
}

/// Read a tracking configuration, JSON or TOML by extension.
pub fn load_config(path: &Path) -> Result<TrackingConfig> {
    let format = format_of(path)?;
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = match format {
        ConfigFormat::Json => serde_json::from_str(&contents).context("Invalid tracking config")?,
        ConfigFormat::Toml => toml::from_str(&contents).context("Invalid tracking config")?,
    };
    Ok(config)
}

pub fn save_config(config: &TrackingConfig, path: &Path) -> Result<()> {
    let text = match format_of(path)? {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
    };
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}
