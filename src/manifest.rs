//! @acp:module "Module Manifest"
//! @acp:summary "Discovers module source files and derives their registry keys"
//! @acp:domain core
//! @acp:layer service
//!
//! Each module file under the modules root becomes one entry, keyed by its
//! path relative to the root with the extension dropped. Nested files keep
//! their directory (`nav/menu.js` -> `nav/menu`) unless the basename key
//! style is selected. Two files claiming one key is an error: markup authors
//! must be able to rely on a 1:1 mapping.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::annotation::ModuleKey;
use crate::config::{KeyStyle, ModulesConfig};
use crate::error::{ModinitError, Result};
use crate::registry::{ModuleFactory, Registry, RegistryBuilder};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// @acp:summary "One discovered module file"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub key: ModuleKey,
    /// Path relative to the modules root
    pub file: PathBuf,
}

/// @acp:summary "Key -> file mapping for a modules directory"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleManifest {
    pub root: PathBuf,
    pub key_style: KeyStyle,
    pub generated_at: DateTime<Utc>,
    /// Sorted by key
    pub entries: Vec<ManifestEntry>,
}

impl ModuleManifest {
    /// @acp:summary "Walk the modules root and build the manifest"
    pub fn discover<P: AsRef<Path>>(root: P, config: &ModulesConfig) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ModinitError::ModuleRootNotFound(root.to_path_buf()));
        }

        let include = compile_patterns(&config.include)?;
        let exclude = compile_patterns(&config.exclude)?;

        let mut by_key: HashMap<ModuleKey, PathBuf> = HashMap::new();
        let mut walker: Vec<_> = WalkDir::new(root)
            .into_iter()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        // Deterministic order so collision errors name the same pair every run
        walker.sort_by(|a, b| a.path().cmp(b.path()));

        for entry in walker.into_iter().filter(|e| e.file_type().is_file()) {
            let relative = match entry.path().strip_prefix(root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => continue,
            };
            let relative_str = to_slash(&relative);

            let included =
                include.is_empty() || include.iter().any(|p| p.matches_with(&relative_str, MATCH_OPTIONS));
            let excluded = exclude.iter().any(|p| p.matches_with(&relative_str, MATCH_OPTIONS));
            if !included || excluded {
                continue;
            }

            let key = match derive_key(&relative, config.key_style) {
                Ok(key) => key,
                Err(err) => {
                    tracing::warn!(file = %relative_str, "skipping module file: {}", err);
                    continue;
                }
            };

            if let Some(first) = by_key.get(&key) {
                return Err(ModinitError::DuplicateModuleKey {
                    key: key.to_string(),
                    first: first.clone(),
                    second: relative,
                });
            }
            tracing::debug!(key = %key, file = %relative_str, "discovered module");
            by_key.insert(key, relative);
        }

        let mut entries: Vec<ManifestEntry> = by_key
            .into_iter()
            .map(|(key, file)| ManifestEntry { key, file })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(Self {
            root: root.to_path_buf(),
            key_style: config.key_style,
            generated_at: Utc::now(),
            entries,
        })
    }

    pub fn get(&self, key: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.key.as_str() == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// @acp:summary "Populate a registry with one factory per manifest entry"
    pub fn to_registry<F>(&self, mut factory_for: F) -> Result<Registry>
    where
        F: FnMut(&ManifestEntry) -> Arc<dyn ModuleFactory>,
    {
        let mut builder = RegistryBuilder::new();
        for entry in &self.entries {
            builder.insert(entry.key.as_str(), factory_for(entry))?;
        }
        Ok(builder.build())
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// @acp:summary "Derive the registry key for a path relative to the modules root"
pub fn derive_key(relative: &Path, style: KeyStyle) -> Result<ModuleKey> {
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let key = match style {
        KeyStyle::Basename => stem,
        KeyStyle::Qualified => {
            let mut parts: Vec<String> = relative
                .parent()
                .map(|parent| {
                    parent
                        .components()
                        .filter_map(|c| match c {
                            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                            _ => None,
                        })
                        .collect()
                })
                .unwrap_or_default();
            parts.push(stem);
            parts.join("/")
        }
    };

    ModuleKey::new(key)
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(ModinitError::from))
        .collect()
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "module.exports = function () {};\n").unwrap();
    }

    #[test]
    fn test_derive_key_styles() {
        let nested = Path::new("nav/menu.js");
        assert_eq!(derive_key(nested, KeyStyle::Qualified).unwrap().as_str(), "nav/menu");
        assert_eq!(derive_key(nested, KeyStyle::Basename).unwrap().as_str(), "menu");
        assert_eq!(
            derive_key(Path::new("tabs.js"), KeyStyle::Qualified).unwrap().as_str(),
            "tabs"
        );
        assert!(derive_key(Path::new("my tabs.js"), KeyStyle::Qualified).is_err());
    }

    #[test]
    fn test_discover_applies_globs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "tabs.js");
        touch(dir.path(), "accordion.js");
        touch(dir.path(), "nav/menu.js");
        touch(dir.path(), "init-modules.js");
        touch(dir.path(), "tabs.test.js");
        touch(dir.path(), "README.md");

        let manifest = ModuleManifest::discover(dir.path(), &ModulesConfig::default()).unwrap();

        assert_eq!(manifest.keys(), vec!["accordion", "nav/menu", "tabs"]);
        assert_eq!(manifest.get("nav/menu").unwrap().file, PathBuf::from("nav/menu.js"));
    }

    #[test]
    fn test_basename_collision_is_an_error() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "header/menu.js");
        touch(dir.path(), "footer/menu.js");

        let config = ModulesConfig {
            key_style: KeyStyle::Basename,
            ..ModulesConfig::default()
        };
        let err = ModuleManifest::discover(dir.path(), &config).unwrap_err();
        match err {
            ModinitError::DuplicateModuleKey { key, first, second } => {
                assert_eq!(key, "menu");
                assert_eq!(first, PathBuf::from("footer/menu.js"));
                assert_eq!(second, PathBuf::from("header/menu.js"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let qualified = ModuleManifest::discover(dir.path(), &ModulesConfig::default()).unwrap();
        assert_eq!(qualified.keys(), vec!["footer/menu", "header/menu"]);
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = ModuleManifest::discover(dir.path().join("nope"), &ModulesConfig::default());
        assert!(matches!(err, Err(ModinitError::ModuleRootNotFound(_))));
    }

    #[test]
    fn test_to_registry() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "tabs.js");
        let manifest = ModuleManifest::discover(dir.path(), &ModulesConfig::default()).unwrap();

        let registry = manifest
            .to_registry(|_entry| {
                let factory: Arc<dyn ModuleFactory> =
                    Arc::new(crate::registry::FnFactory::new(|_el, _env| Ok(())));
                factory
            })
            .unwrap();
        assert!(registry.contains("tabs"));
        assert_eq!(registry.len(), 1);
    }
}
