//! @acp:module "Configuration"
//! @acp:summary "Project configuration loading and defaults"
//! @acp:domain cli
//! @acp:layer config

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::activate::FailurePolicy;
use crate::annotation::DEFAULT_ATTRIBUTE;
use crate::error::{ModinitError, Result};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = ".modinit.config.json";

fn default_config_schema() -> String {
    "https://modinit.dev/schemas/v1/config.schema.json".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_attribute() -> String {
    DEFAULT_ATTRIBUTE.to_string()
}

/// @acp:summary "Main modinit configuration structure"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// JSON Schema URL for validation
    #[serde(rename = "$schema", default = "default_config_schema")]
    pub schema: String,

    /// Config format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Attribute carrying module annotations
    #[serde(default = "default_attribute")]
    pub attribute: String,

    /// What the activation pass does when a module fails to construct
    #[serde(default)]
    pub on_construction_failure: FailurePolicy,

    /// Module discovery settings
    #[serde(default)]
    pub modules: ModulesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: default_config_schema(),
            version: default_version(),
            attribute: default_attribute(),
            on_construction_failure: FailurePolicy::default(),
            modules: ModulesConfig::default(),
        }
    }
}

impl Config {
    /// @acp:summary "Load config from a JSON file"
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @acp:summary "Load from default location or fall back to defaults"
    pub fn load_or_default() -> Self {
        Self::load(CONFIG_FILE).unwrap_or_default()
    }

    /// Reject values the activation pass cannot work with
    pub fn validate(&self) -> Result<()> {
        let attribute = self.attribute.as_str();
        if attribute.is_empty() || attribute.chars().any(char::is_whitespace) {
            return Err(ModinitError::Config(format!(
                "attribute must be a single attribute name, got {:?}",
                self.attribute
            )));
        }
        for pattern in self.modules.include.iter().chain(&self.modules.exclude) {
            glob::Pattern::new(pattern)?;
        }
        Ok(())
    }
}

/// @acp:summary "How module keys are derived from file paths"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStyle {
    /// Relative path without extension, `/`-separated (`nav/menu`)
    #[default]
    Qualified,
    /// File stem only (`menu`)
    Basename,
}

impl std::str::FromStr for KeyStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qualified" => Ok(KeyStyle::Qualified),
            "basename" => Ok(KeyStyle::Basename),
            _ => Err(format!("Unknown key style: {}", s)),
        }
    }
}

/// @acp:summary "Module discovery configuration"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulesConfig {
    /// Directory holding module sources
    #[serde(default = "default_modules_root")]
    pub root: PathBuf,

    /// File patterns to include (glob syntax, relative to `root`)
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// File patterns to exclude (glob syntax, relative to `root`)
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub key_style: KeyStyle,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            root: default_modules_root(),
            include: default_include(),
            exclude: default_exclude(),
            key_style: KeyStyle::default(),
        }
    }
}

fn default_modules_root() -> PathBuf {
    PathBuf::from("src/js/modules")
}

fn default_include() -> Vec<String> {
    vec!["**/*.js".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec![
        // The activation entry point lives next to the modules it activates
        "init-modules.js".to_string(),
        "**/*.test.js".to_string(),
        "**/*.spec.js".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.attribute, "data-module-init");
        assert_eq!(config.on_construction_failure, FailurePolicy::Isolate);
        assert_eq!(config.modules.key_style, KeyStyle::Qualified);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = Config::default();
        config.attribute = "data-js".to_string();
        config.on_construction_failure = FailurePolicy::Abort;
        config.modules.key_style = KeyStyle::Basename;
        config.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"on_construction_failure\": \"abort\""));
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_attribute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"attribute": "data module"}"#).unwrap();

        assert!(matches!(Config::load(&path), Err(ModinitError::Config(_))));
    }

    #[test]
    fn test_rejects_padded_attribute() {
        let config = Config {
            attribute: " data-js ".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ModinitError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_glob() {
        let mut config = Config::default();
        config.modules.include = vec!["***/[".to_string()];
        assert!(matches!(config.validate(), Err(ModinitError::Pattern(_))));
    }
}
