//! @acp:module "Annotation"
//! @acp:summary "Module keys and the whitespace-separated annotation format"
//! @acp:domain core
//! @acp:layer model
//!
//! An annotation is the value of the module attribute on an element, e.g.
//! `data-module-init="tabs accordion"`. Tokens are separated by any
//! whitespace; empty tokens never produce a key.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModinitError, Result};

/// Default attribute carrying module annotations
pub const DEFAULT_ATTRIBUTE: &str = "data-module-init";

/// @acp:summary "Identifier of a behavior module"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleKey(String);

impl ModuleKey {
    /// Validate and wrap a key
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() || key.chars().any(char::is_whitespace) {
            return Err(ModinitError::InvalidModuleKey(key));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ModuleKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ModuleKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModuleKey {
    type Error = ModinitError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ModuleKey {
    type Error = ModinitError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ModuleKey> for String {
    fn from(key: ModuleKey) -> Self {
        key.0
    }
}

impl std::str::FromStr for ModuleKey {
    type Err = ModinitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// @acp:summary "Parsed annotation: ordered module keys, duplicates kept"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    keys: Vec<ModuleKey>,
}

impl Annotation {
    /// @acp:summary "Split an attribute value into module keys"
    /// Whitespace-only or empty values yield an empty annotation.
    pub fn parse(value: &str) -> Self {
        // split_whitespace never yields empty or whitespace-bearing tokens
        let keys = value
            .split_whitespace()
            .map(|token| ModuleKey(token.to_string()))
            .collect();
        Self { keys }
    }

    pub fn keys(&self) -> &[ModuleKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

impl<'a> IntoIterator for &'a Annotation {
    type Item = &'a ModuleKey;
    type IntoIter = std::slice::Iter<'a, ModuleKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
