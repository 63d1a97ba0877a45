//! End-to-end pipeline tests
//!
//! Modules directory -> manifest -> registry -> rendered page -> activation.

use std::path::Path;
use std::sync::Arc;

use modinit::commands::{probe_registry, run_pass, scan_document};
use modinit::{Activator, Config, Document, FailurePolicy, KeyStyle, ModuleManifest, ModulesConfig};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Theme</title>
  <script src="/js/main.min.js"></script>
</head>
<body>
  <header data-module-init="nav/menu sticky-header"></header>
  <main>
    <!-- <div data-module-init="commented-out"></div> -->
    <div class="tabs" data-module-init="tabs"></div>
    <div class="faq" data-module-init="accordion carousel"></div>
  </main>
  <script type="text/x-template">
    <div data-module-init="templated"></div>
  </script>
</body>
</html>"#;

fn module_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    for rel in [
        "tabs.js",
        "accordion.js",
        "sticky-header.js",
        "nav/menu.js",
        "init-modules.js",
    ] {
        let path = dir.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "module.exports = function () {};\n").unwrap();
    }
    dir
}

fn write_page(dir: &Path) -> std::path::PathBuf {
    let page = dir.join("index.html");
    std::fs::write(&page, PAGE).unwrap();
    page
}

#[test]
fn test_scan_reports_annotations_in_document_order() {
    let doc = Document::parse(PAGE);
    let keys: Vec<Vec<String>> = scan_document(&doc, "data-module-init")
        .into_iter()
        .map(|entry| entry.keys)
        .collect();

    assert_eq!(
        keys,
        vec![
            vec!["nav/menu".to_string(), "sticky-header".to_string()],
            vec!["tabs".to_string()],
            vec!["accordion".to_string(), "carousel".to_string()],
        ]
    );
}

#[test]
fn test_manifest_to_activation() {
    let modules = module_tree();
    let manifest = ModuleManifest::discover(modules.path(), &ModulesConfig::default()).unwrap();
    assert_eq!(
        manifest.keys(),
        vec!["accordion", "nav/menu", "sticky-header", "tabs"]
    );

    let pages = TempDir::new().unwrap();
    let doc = Document::from_file(write_page(pages.path())).unwrap();
    let activator = Activator::new(Arc::new(probe_registry(&manifest).unwrap()));

    let report = run_pass(&activator, &doc).expect("pass ran");

    assert_eq!(
        report.constructed_keys(),
        vec!["nav/menu", "sticky-header", "tabs", "accordion"]
    );
    assert_eq!(report.missing_keys(), vec!["carousel"]);
    assert_eq!(report.elements, 3);
}

#[test]
fn test_basename_keys_break_qualified_annotations() {
    let modules = module_tree();
    let config = ModulesConfig {
        key_style: KeyStyle::Basename,
        ..ModulesConfig::default()
    };
    let manifest = ModuleManifest::discover(modules.path(), &config).unwrap();
    let activator = Activator::new(Arc::new(probe_registry(&manifest).unwrap()));

    let doc = Document::parse(PAGE);
    let report = run_pass(&activator, &doc).expect("pass ran");

    assert_eq!(report.missing_keys(), vec!["nav/menu", "carousel"]);
}

#[test]
fn test_activator_from_config() {
    let mut config = Config::default();
    config.attribute = "data-js".to_string();
    config.on_construction_failure = FailurePolicy::Abort;

    let modules = module_tree();
    let manifest = ModuleManifest::discover(modules.path(), &config.modules).unwrap();
    let activator = Activator::from_config(Arc::new(probe_registry(&manifest).unwrap()), &config);

    assert_eq!(activator.attribute(), "data-js");
    assert_eq!(activator.policy(), FailurePolicy::Abort);

    let doc = Document::parse(r#"<div data-js="tabs"></div><div data-module-init="accordion"></div>"#);
    let report = run_pass(&activator, &doc).expect("pass ran");
    assert_eq!(report.constructed_keys(), vec!["tabs"]);
}

#[test]
fn test_manifest_json_round_trip() {
    let modules = module_tree();
    let manifest = ModuleManifest::discover(modules.path(), &ModulesConfig::default()).unwrap();

    let out = TempDir::new().unwrap();
    let path = out.path().join("modules.json");
    manifest.write_json(&path).unwrap();

    let loaded = ModuleManifest::from_json(&path).unwrap();
    assert_eq!(loaded.entries, manifest.entries);
    assert_eq!(loaded.key_style, KeyStyle::Qualified);
}
