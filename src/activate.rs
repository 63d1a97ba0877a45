//! @acp:module "Activation Engine"
//! @acp:summary "Single-pass discovery and construction of behavior modules declared in markup"
//! @acp:domain core
//! @acp:layer service
//!
//! # Activation Pass
//!
//! 1. **Query** the document for elements carrying the module attribute
//!    (snapshot, document order)
//! 2. **Parse** each annotation into ordered module keys
//! 3. **Resolve** each key against the registry; a missing key is logged and
//!    skipped
//! 4. **Construct** the module with the element and the shared environment;
//!    the instance is dropped immediately
//!
//! A missing key never stops the pass. Construction failures follow the
//! configured [`FailurePolicy`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, ModuleKey, DEFAULT_ATTRIBUTE};
use crate::config::Config;
use crate::dom::{Document, Element};
use crate::environment::Environment;
use crate::ready::Dispatch;
use crate::registry::Registry;

/// @acp:summary "What to do when a module factory fails"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and keep activating the remaining modules
    #[default]
    Isolate,
    /// Record the failure and stop the pass
    Abort,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "isolate" => Ok(FailurePolicy::Isolate),
            "abort" => Ok(FailurePolicy::Abort),
            _ => Err(format!("Unknown failure policy: {}", s)),
        }
    }
}

/// @acp:summary "One successful module construction"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activation {
    /// Element position in document order
    pub element: usize,
    /// CSS-like element label
    pub target: String,
    pub key: ModuleKey,
}

/// Kind of activation diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    KeyNotFound,
    ConstructionFailed { message: String },
}

/// @acp:summary "A skipped module, reported but never fatal to the caller"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub element: usize,
    pub target: String,
    pub key: ModuleKey,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    fn new(element: &Element, key: &ModuleKey, kind: DiagnosticKind) -> Self {
        Self {
            element: element.index(),
            target: element.describe(),
            key: key.clone(),
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::KeyNotFound => {
                write!(f, "{} module does not exist. (on <{}>)", self.key, self.target)
            }
            DiagnosticKind::ConstructionFailed { message } => write!(
                f,
                "{} module failed to initialize: {} (on <{}>)",
                self.key, message, self.target
            ),
        }
    }
}

/// @acp:summary "Outcome of one activation pass"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivationReport {
    /// Attribute that was scanned
    pub attribute: String,
    /// Annotated elements found
    pub elements: usize,
    /// Successful constructions, in construction order
    pub activations: Vec<Activation>,
    /// Skipped modules, in encounter order
    pub diagnostics: Vec<Diagnostic>,
    /// True when a construction failure stopped the pass under `FailurePolicy::Abort`
    pub aborted: bool,
}

impl ActivationReport {
    /// No diagnostics and not aborted
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && !self.aborted
    }

    /// Keys constructed, in order
    pub fn constructed_keys(&self) -> Vec<&str> {
        self.activations.iter().map(|a| a.key.as_str()).collect()
    }

    /// Keys that failed to resolve, in encounter order
    pub fn missing_keys(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::KeyNotFound)
            .map(|d| d.key.as_str())
            .collect()
    }
}

/// @acp:summary "Activation engine bound to a registry"
#[derive(Debug, Clone)]
pub struct Activator {
    registry: Arc<Registry>,
    attribute: String,
    policy: FailurePolicy,
}

impl Activator {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            policy: FailurePolicy::default(),
        }
    }

    pub fn from_config(registry: Arc<Registry>, config: &Config) -> Self {
        Self::new(registry)
            .with_attribute(&config.attribute)
            .with_policy(config.on_construction_failure)
    }

    pub fn with_attribute(mut self, attribute: &str) -> Self {
        self.attribute = attribute.to_string();
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// @acp:summary "Run one activation pass over the document"
    /// Never fails; every skipped module is reported in the returned report.
    pub fn activate_all(&self, document: &Document) -> ActivationReport {
        let env = Environment::from_document(document);
        let elements = document.query_attribute(&self.attribute);

        let mut report = ActivationReport {
            attribute: self.attribute.clone(),
            elements: elements.len(),
            ..Default::default()
        };

        'elements: for element in &elements {
            let value = element.attribute(&self.attribute).unwrap_or_default();
            let annotation = Annotation::parse(&value);

            for key in &annotation {
                let factory = match self.registry.resolve(key.as_str()) {
                    Ok(factory) => factory,
                    Err(err) => {
                        tracing::warn!(element = %element.describe(), "{}", err);
                        report
                            .diagnostics
                            .push(Diagnostic::new(element, key, DiagnosticKind::KeyNotFound));
                        continue;
                    }
                };

                match factory.construct(element, &env) {
                    Ok(instance) => {
                        tracing::debug!(
                            key = %key,
                            element = %element.describe(),
                            behavior = instance.name(),
                            "module initialized"
                        );
                        drop(instance);
                        report.activations.push(Activation {
                            element: element.index(),
                            target: element.describe(),
                            key: key.clone(),
                        });
                    }
                    Err(err) => {
                        let diagnostic = Diagnostic::new(
                            element,
                            key,
                            DiagnosticKind::ConstructionFailed {
                                message: err.message().to_string(),
                            },
                        );
                        tracing::warn!("{}", diagnostic);
                        report.diagnostics.push(diagnostic);

                        if self.policy == FailurePolicy::Abort {
                            tracing::error!(key = %key, "activation pass aborted");
                            report.aborted = true;
                            break 'elements;
                        }
                    }
                }
            }
        }

        tracing::info!(
            elements = report.elements,
            activated = report.activations.len(),
            skipped = report.diagnostics.len(),
            "activation pass complete"
        );
        report
    }

    /// @acp:summary "Run the pass once the document is ready"
    /// Runs immediately when the document is already ready; otherwise the pass
    /// runs on the ready transition. `on_complete` receives the report.
    pub fn activate_when_ready<F>(&self, document: &Document, on_complete: F) -> Dispatch
    where
        F: FnOnce(ActivationReport) + 'static,
    {
        let activator = self.clone();
        document.when_ready(move |doc| on_complete(activator.activate_all(doc)))
    }
}
