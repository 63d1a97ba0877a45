//! @acp:module "Module Registry"
//! @acp:summary "Key -> factory namespace consulted by the activation engine"
//! @acp:domain core
//! @acp:layer service
//!
//! The registry is populated once through [`RegistryBuilder`] and is
//! immutable afterwards. Lookups are pure: the same key against the same
//! registry always resolves the same way.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use thiserror::Error;

use crate::annotation::ModuleKey;
use crate::dom::Element;
use crate::environment::Environment;
use crate::error::{ModinitError, Result};

/// @acp:summary "A constructed behavior module instance"
/// The engine drops instances right after construction; anything that must
/// outlive the pass belongs on the element (listeners, classes, attributes).
pub trait Behavior {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Modules that only wire listeners can return `()`
impl Behavior for () {
    fn name(&self) -> &str {
        "()"
    }
}

/// @acp:summary "Failure raised by a module factory during construction"
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ModuleError {
    message: String,
}

impl ModuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// @acp:summary "Lookup failure; distinct from construction failure"
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("{0} module does not exist.")]
    KeyNotFound(String),
}

/// @acp:summary "Constructs a behavior module against one element"
pub trait ModuleFactory: Send + Sync {
    fn construct(
        &self,
        element: &Element,
        env: &Environment,
    ) -> std::result::Result<Box<dyn Behavior>, ModuleError>;
}

/// Adapter turning a closure into a [`ModuleFactory`]
pub struct FnFactory<F, B> {
    construct: F,
    _behavior: PhantomData<fn() -> B>,
}

impl<F, B> FnFactory<F, B>
where
    F: Fn(&Element, &Environment) -> std::result::Result<B, ModuleError> + Send + Sync,
    B: Behavior + 'static,
{
    pub fn new(construct: F) -> Self {
        Self {
            construct,
            _behavior: PhantomData,
        }
    }
}

impl<F, B> ModuleFactory for FnFactory<F, B>
where
    F: Fn(&Element, &Environment) -> std::result::Result<B, ModuleError> + Send + Sync,
    B: Behavior + 'static,
{
    fn construct(
        &self,
        element: &Element,
        env: &Environment,
    ) -> std::result::Result<Box<dyn Behavior>, ModuleError> {
        (self.construct)(element, env).map(|b| Box::new(b) as Box<dyn Behavior>)
    }
}

/// @acp:summary "Collects factories before freezing them into a Registry"
#[derive(Default)]
pub struct RegistryBuilder {
    factories: HashMap<ModuleKey, Arc<dyn ModuleFactory>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// @acp:summary "Register a factory under a key"
    /// Fails on an invalid key or when the key is already taken.
    pub fn insert(&mut self, key: &str, factory: Arc<dyn ModuleFactory>) -> Result<()> {
        let key = ModuleKey::new(key)?;
        if self.factories.contains_key(&key) {
            return Err(ModinitError::DuplicateRegistration(key.to_string()));
        }
        tracing::trace!(key = %key, "registered module");
        self.factories.insert(key, factory);
        Ok(())
    }

    pub fn register<M>(mut self, key: &str, factory: M) -> Result<Self>
    where
        M: ModuleFactory + 'static,
    {
        self.insert(key, Arc::new(factory))?;
        Ok(self)
    }

    /// Register a closure; it may return any [`Behavior`]
    pub fn register_fn<F, B>(self, key: &str, construct: F) -> Result<Self>
    where
        F: Fn(&Element, &Environment) -> std::result::Result<B, ModuleError>
            + Send
            + Sync
            + 'static,
        B: Behavior + 'static,
    {
        self.register(key, FnFactory::new(construct))
    }

    pub fn build(self) -> Registry {
        Registry {
            factories: self.factories,
        }
    }
}

/// @acp:summary "Immutable module namespace"
#[derive(Clone, Default)]
pub struct Registry {
    factories: HashMap<ModuleKey, Arc<dyn ModuleFactory>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// @acp:summary "Look up a factory by exact key"
    pub fn resolve(&self, key: &str) -> std::result::Result<&dyn ModuleFactory, ResolveError> {
        self.factories
            .get(key)
            .map(|factory| factory.as_ref())
            .ok_or_else(|| ResolveError::KeyNotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<&ModuleKey> {
        let mut keys: Vec<_> = self.factories.keys().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("keys", &self.keys()).finish()
    }
}
