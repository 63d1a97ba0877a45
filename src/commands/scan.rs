//! @acp:module "Scan Command"
//! @acp:summary "List annotated elements and their module keys"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;
use console::style;
use serde::Serialize;

use crate::annotation::Annotation;
use crate::config::Config;
use crate::dom::Document;

/// Options for the scan command
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Rendered page to scan
    pub page: PathBuf,
    /// Output as JSON
    pub json: bool,
}

/// @acp:summary "One annotated element"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEntry {
    pub element: usize,
    pub target: String,
    pub keys: Vec<String>,
}

/// @acp:summary "Collect annotated elements in document order"
pub fn scan_document(document: &Document, attribute: &str) -> Vec<ScanEntry> {
    document
        .query_attribute(attribute)
        .iter()
        .map(|el| ScanEntry {
            element: el.index(),
            target: el.describe(),
            keys: Annotation::parse(&el.attribute(attribute).unwrap_or_default())
                .keys()
                .iter()
                .map(|k| k.to_string())
                .collect(),
        })
        .collect()
}

/// Execute the scan command
pub fn execute_scan(options: ScanOptions, config: Config) -> Result<()> {
    let document = Document::from_file(&options.page)?;
    let entries = scan_document(&document, &config.attribute);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "{} {} annotated element(s) in {}",
        style("→").cyan(),
        entries.len(),
        options.page.display()
    );
    for entry in &entries {
        if entry.keys.is_empty() {
            println!("  <{}> {}", entry.target, style("(empty)").dim());
        } else {
            println!("  <{}> {}", entry.target, style(entry.keys.join(" ")).cyan());
        }
    }

    Ok(())
}
