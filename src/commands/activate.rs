//! @acp:module "Activate Command"
//! @acp:summary "Dry-run an activation pass over a rendered page"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Every discovered module file is registered with a probe factory that
//! records its construction, so the pass reports exactly which annotations
//! resolve and which keys the page references without a module behind them.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use console::style;

use crate::activate::{ActivationReport, Activator, DiagnosticKind, FailurePolicy};
use crate::config::Config;
use crate::dom::{Document, Element};
use crate::environment::Environment;
use crate::manifest::{ManifestEntry, ModuleManifest};
use crate::registry::{Behavior, ModuleError, ModuleFactory, Registry};

/// Options for the activate command
#[derive(Debug, Clone)]
pub struct ActivateOptions {
    /// Rendered page to activate
    pub page: PathBuf,
    /// Modules directory (defaults to config)
    pub modules: Option<PathBuf>,
    /// Stop the pass at the first construction failure
    pub strict: bool,
    /// Output as JSON
    pub json: bool,
}

/// Instance produced by [`ProbeFactory`]
#[derive(Debug)]
pub struct Probe {
    key: String,
}

impl Behavior for Probe {
    fn name(&self) -> &str {
        &self.key
    }
}

/// @acp:summary "Factory standing in for a module file during a dry run"
#[derive(Debug, Clone)]
pub struct ProbeFactory {
    entry: ManifestEntry,
}

impl ProbeFactory {
    pub fn new(entry: ManifestEntry) -> Self {
        Self { entry }
    }
}

impl ModuleFactory for ProbeFactory {
    fn construct(
        &self,
        element: &Element,
        _env: &Environment,
    ) -> std::result::Result<Box<dyn Behavior>, ModuleError> {
        tracing::info!(
            key = %self.entry.key,
            file = %self.entry.file.display(),
            element = %element.describe(),
            "probe constructed"
        );
        Ok(Box::new(Probe {
            key: self.entry.key.to_string(),
        }))
    }
}

/// @acp:summary "Build a probe registry from a manifest"
pub fn probe_registry(manifest: &ModuleManifest) -> crate::Result<Registry> {
    manifest.to_registry(|entry| {
        let factory: Arc<dyn ModuleFactory> = Arc::new(ProbeFactory::new(entry.clone()));
        factory
    })
}

/// @acp:summary "Run the pass when the document becomes ready and return its report"
pub fn run_pass(activator: &Activator, document: &Document) -> Option<ActivationReport> {
    let slot: Rc<RefCell<Option<ActivationReport>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&slot);
    activator.activate_when_ready(document, move |report| {
        *sink.borrow_mut() = Some(report);
    });
    document.finish_parsing();
    let report = slot.borrow_mut().take();
    report
}

/// Execute the activate command
/// Returns the report so the caller can pick an exit code.
pub fn execute_activate(options: ActivateOptions, config: Config) -> Result<ActivationReport> {
    let root = options
        .modules
        .clone()
        .unwrap_or_else(|| config.modules.root.clone());
    let manifest = ModuleManifest::discover(&root, &config.modules)?;
    let registry = probe_registry(&manifest)?;

    let mut activator = Activator::from_config(Arc::new(registry), &config);
    if options.strict {
        activator = activator.with_policy(FailurePolicy::Abort);
    }

    let document = Document::from_file(&options.page)?;
    let report = run_pass(&activator, &document)
        .ok_or_else(|| anyhow::anyhow!("activation pass did not run"))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    println!(
        "{} Activating {} ({} module(s) registered)",
        style("→").cyan(),
        options.page.display(),
        manifest.len()
    );
    for activation in &report.activations {
        println!(
            "  {} {} on <{}>",
            style("✓").green(),
            activation.key,
            activation.target
        );
    }
    for diagnostic in &report.diagnostics {
        let marker = match diagnostic.kind {
            DiagnosticKind::KeyNotFound => style("⚠").yellow(),
            DiagnosticKind::ConstructionFailed { .. } => style("✗").red(),
        };
        println!("  {} {}", marker, diagnostic);
    }

    println!();
    println!("  Elements: {}", report.elements);
    println!("  Activated: {}", report.activations.len());
    println!("  Skipped: {}", report.diagnostics.len());
    if report.aborted {
        println!("  {}", style("Pass aborted").red());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModulesConfig;
    use tempfile::TempDir;

    #[test]
    fn test_probe_registry_runs_pass() {
        let dir = TempDir::new().unwrap();
        for name in ["tabs.js", "accordion.js"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let manifest = ModuleManifest::discover(dir.path(), &ModulesConfig::default()).unwrap();
        let registry = probe_registry(&manifest).unwrap();
        let activator = Activator::new(Arc::new(registry));

        let doc = Document::parse(r#"<div data-module-init="tabs missing accordion"></div>"#);
        let report = run_pass(&activator, &doc).expect("pass ran");

        assert_eq!(report.constructed_keys(), vec!["tabs", "accordion"]);
        assert_eq!(report.missing_keys(), vec!["missing"]);
    }
}
