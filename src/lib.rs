#![forbid(unsafe_code)]

//! @acp:module "modinit Library"
//! @acp:summary "Declarative module activation for rendered markup"
//! @acp:domain core
//! @acp:layer api
//! @acp:stability stable
//!
//! # modinit
//!
//! Wires behavior modules to rendered markup. Elements declare the modules
//! they want with an attribute (`data-module-init="tabs accordion"`); once
//! the document is ready, one activation pass resolves every key against a
//! registry and constructs each module against its element.
//!
//! ## Features
//!
//! - **Error isolation**: a missing module is logged and skipped, never fatal
//! - **Ordered**: document order across elements, left-to-right per element
//! - **Ready-safe**: activation requested after the document is ready runs
//!   immediately instead of waiting for a signal that already fired
//! - **Manifest discovery**: derive registry keys from a modules directory
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use modinit::{Activator, Document, Registry};
//!
//! let registry = Registry::builder()
//!     .register_fn("tabs", |el, _env| {
//!         el.add_class("tabs--ready");
//!         Ok(())
//!     })?
//!     .build();
//!
//! let document = Document::parse(r#"<div data-module-init="tabs missing"></div>"#);
//! document.finish_parsing();
//!
//! let report = Activator::new(Arc::new(registry)).activate_all(&document);
//! assert_eq!(report.constructed_keys(), vec!["tabs"]);
//! assert_eq!(report.missing_keys(), vec!["missing"]);
//! # Ok::<(), modinit::ModinitError>(())
//! ```

pub mod activate;
pub mod annotation;
pub mod commands;
pub mod config;
pub mod dom;
pub mod environment;
pub mod error;
pub mod manifest;
pub mod ready;
pub mod registry;

// Re-exports
pub use activate::{
    Activation, ActivationReport, Activator, Diagnostic, DiagnosticKind, FailurePolicy,
};
pub use annotation::{Annotation, ModuleKey, DEFAULT_ATTRIBUTE};
pub use config::{Config, KeyStyle, ModulesConfig};
pub use dom::{Document, Element, Event, Window};
pub use environment::Environment;
pub use error::{ModinitError, Result};
pub use manifest::{derive_key, ManifestEntry, ModuleManifest};
pub use ready::{Dispatch, ReadinessGate, ReadyState};
pub use registry::{
    Behavior, FnFactory, ModuleError, ModuleFactory, Registry, RegistryBuilder, ResolveError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
