//! @acp:module "Markup Scanner"
//! @acp:summary "Regex-based start-tag scanner for rendered HTML"
//! @acp:domain dom
//! @acp:layer service
//!
//! Only start tags and their attributes matter for activation, so the
//! scanner does not build a tree. Comments are dropped and the contents of
//! raw-text elements (`script`, `style`, `textarea`, `title`, ...) and of
//! `template` are skipped: none of that markup becomes document elements.

use std::sync::LazyLock;

use regex::Regex;

/// Matches a start tag. Groups: 1=tag name, 2=raw attribute text
///
/// The attribute text is any run of unquoted characters and quoted strings,
/// so attributes need no whitespace between a quoted value and the next name.
static START_TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([A-Za-z][A-Za-z0-9:-]*)((?:\s(?:[^"'>]|"[^"]*"|'[^']*')*)?)\s*/?>"#).unwrap()
});

/// Matches one attribute. Groups: 1=name, 2=double-quoted, 3=single-quoted, 4=unquoted
static ATTRIBUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#).unwrap()
});

static COMMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Elements whose content never yields document elements
const OPAQUE_ELEMENTS: &[&str] = &[
    "script", "style", "template", "textarea", "title", "noscript", "iframe", "xmp", "noembed",
    "noframes",
];

/// One pattern per opaque element; groups: 1=start tag, 2=end tag
static OPAQUE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    OPAQUE_ELEMENTS
        .iter()
        .map(|name| {
            Regex::new(&format!(r"(?is)(<{name}\b[^>]*>).*?(</{name}\s*>)")).unwrap()
        })
        .collect()
});

/// @acp:summary "A start tag found in markup"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Lowercased tag name
    pub name: String,
    /// Attributes in source order; names lowercased, first occurrence wins
    pub attributes: Vec<(String, String)>,
}

/// @acp:summary "Scan markup for start tags in document order"
pub fn scan_start_tags(markup: &str) -> Vec<StartTag> {
    let mut cleaned = COMMENT_PATTERN.replace_all(markup, "").into_owned();
    for pattern in OPAQUE_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "$1$2").into_owned();
    }

    START_TAG_PATTERN
        .captures_iter(&cleaned)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let attributes = caps
                .get(2)
                .map(|raw| parse_attributes(raw.as_str()))
                .unwrap_or_default();
            StartTag { name, attributes }
        })
        .collect()
}

fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    let mut attributes: Vec<(String, String)> = Vec::new();

    for caps in ATTRIBUTE_PATTERN.captures_iter(raw) {
        let name = caps[1].to_ascii_lowercase();
        if attributes.iter().any(|(n, _)| *n == name) {
            continue;
        }
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| decode_entities(m.as_str()))
            .unwrap_or_default();
        attributes.push((name, value));
    }

    attributes
}

/// Decode the character references that commonly appear in attribute values
fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
