//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Provides implementations for all CLI commands.
//! Each command is in its own submodule for maintainability.

pub mod activate;
pub mod init;
pub mod manifest;
pub mod scan;

pub use activate::{execute_activate, probe_registry, run_pass, ActivateOptions, ProbeFactory};
pub use init::{execute_init, InitOptions};
pub use manifest::{execute_manifest, ManifestOptions};
pub use scan::{execute_scan, scan_document, ScanEntry, ScanOptions};
