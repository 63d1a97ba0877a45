//! @acp:module "Init Command"
//! @acp:summary "Initialize a modinit project config"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `modinit init`: writes `.modinit.config.json`, or the path
//! given with `--config`.

use std::path::PathBuf;

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::activate::FailurePolicy;
use crate::config::{Config, KeyStyle, CONFIG_FILE};
use crate::manifest::ModuleManifest;

/// Options for the init command
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Where to write the config
    pub config_path: PathBuf,
    /// Force overwrite existing config
    pub force: bool,
    /// Annotation attribute name
    pub attribute: Option<String>,
    /// Modules directory
    pub modules_root: Option<PathBuf>,
    /// Key derivation style
    pub key_style: Option<KeyStyle>,
    /// Skip interactive prompts
    pub yes: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(CONFIG_FILE),
            force: false,
            attribute: None,
            modules_root: None,
            key_style: None,
            yes: false,
        }
    }
}

/// Execute the init command
pub fn execute_init(options: InitOptions) -> Result<()> {
    let config_path = options.config_path.clone();

    if config_path.exists() && !options.force {
        eprintln!(
            "{} Config file already exists. Use --force to overwrite.",
            style("✗").red()
        );
        std::process::exit(1);
    }

    let mut config = Config::default();

    let interactive = !options.yes
        && options.attribute.is_none()
        && options.modules_root.is_none()
        && options.key_style.is_none();

    if interactive {
        run_interactive_init(&mut config)?;
    } else {
        apply_cli_options(&mut config, &options);
    }

    config.validate()?;
    config.save(&config_path)?;
    println!("{} Created {}", style("✓").green(), config_path.display());

    // Report what the modules directory currently resolves to
    match ModuleManifest::discover(&config.modules.root, &config.modules) {
        Ok(manifest) => println!(
            "{} Found {} module(s) in {}",
            style("✓").green(),
            manifest.len(),
            config.modules.root.display()
        ),
        Err(e) => println!("{} {}", style("⚠").yellow(), e),
    }

    println!("\n{}", style("Next steps:").bold());
    println!(
        "  1. Annotate elements with {}",
        style(format!("{}=\"module-name\"", config.attribute)).cyan()
    );
    println!(
        "  2. Run {} to check a rendered page",
        style("modinit activate <page.html>").cyan()
    );

    Ok(())
}

fn run_interactive_init(config: &mut Config) -> Result<()> {
    let theme = ColorfulTheme::default();
    println!("{} modinit Project Setup\n", style("→").cyan());

    config.attribute = Input::with_theme(&theme)
        .with_prompt("Annotation attribute")
        .default(config.attribute.clone())
        .interact_text()?;

    let root: String = Input::with_theme(&theme)
        .with_prompt("Modules directory")
        .default(config.modules.root.to_string_lossy().to_string())
        .interact_text()?;
    config.modules.root = PathBuf::from(root);

    let styles = ["qualified (nav/menu)", "basename (menu)"];
    let style_idx = Select::with_theme(&theme)
        .with_prompt("Module key style")
        .items(&styles)
        .default(0)
        .interact()?;
    config.modules.key_style = if style_idx == 0 {
        KeyStyle::Qualified
    } else {
        KeyStyle::Basename
    };

    let keep_going = Confirm::with_theme(&theme)
        .with_prompt("Keep activating other modules when one fails to initialize?")
        .default(true)
        .interact()?;
    config.on_construction_failure = if keep_going {
        FailurePolicy::Isolate
    } else {
        FailurePolicy::Abort
    };

    Ok(())
}

fn apply_cli_options(config: &mut Config, options: &InitOptions) {
    if let Some(attribute) = &options.attribute {
        config.attribute = attribute.clone();
    }
    if let Some(root) = &options.modules_root {
        config.modules.root = root.clone();
    }
    if let Some(key_style) = options.key_style {
        config.modules.key_style = key_style;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_writes_to_given_config_path() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("site.modinit.json");

        execute_init(InitOptions {
            config_path: config_path.clone(),
            attribute: Some("data-js".to_string()),
            modules_root: Some(dir.path().join("modules")),
            yes: true,
            ..InitOptions::default()
        })
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.attribute, "data-js");
        assert_eq!(config.modules.root, dir.path().join("modules"));
    }
}
