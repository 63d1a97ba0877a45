//! @acp:module "Manifest Command"
//! @acp:summary "Discover module files and print or write the key manifest"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::config::{Config, KeyStyle};
use crate::manifest::ModuleManifest;

/// Options for the manifest command
#[derive(Debug, Clone, Default)]
pub struct ManifestOptions {
    /// Modules directory (defaults to config)
    pub root: Option<PathBuf>,
    /// Write the manifest as JSON to this path
    pub output: Option<PathBuf>,
    /// Override the configured key style
    pub key_style: Option<KeyStyle>,
    /// Print JSON to stdout
    pub json: bool,
}

/// Execute the manifest command
pub fn execute_manifest(options: ManifestOptions, config: Config) -> Result<()> {
    let mut modules = config.modules.clone();
    if let Some(key_style) = options.key_style {
        modules.key_style = key_style;
    }
    let root = options.root.unwrap_or_else(|| modules.root.clone());

    let manifest = ModuleManifest::discover(&root, &modules)?;

    if let Some(output) = &options.output {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        manifest.write_json(output)?;
        println!(
            "{} Manifest written to {}",
            style("✓").green(),
            output.display()
        );
        println!("  Modules: {}", manifest.len());
        return Ok(());
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
        return Ok(());
    }

    println!(
        "{} {} module(s) in {}",
        style("→").cyan(),
        manifest.len(),
        root.display()
    );
    for entry in &manifest.entries {
        println!(
            "  {} {}",
            style(entry.key.as_str()).cyan(),
            style(entry.file.display()).dim()
        );
    }

    Ok(())
}
