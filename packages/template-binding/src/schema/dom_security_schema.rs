//! DOM Security Schema
//!
//! Security-sensitive `tag|property` pairs. Entries under `*` apply to every
//! element. Changes to this table change what gets sanitized; they need a
//! security review.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::core::SecurityContext;

const HTML: &[&str] = &["iframe|srcdoc", "*|innerhtml", "*|outerhtml"];

const STYLE: &[&str] = &["*|style"];

// No SCRIPT entries: script content is stripped by the template parser.

const URL: &[&str] = &[
    "*|formaction", "area|href", "area|ping", "audio|src", "a|href", "a|ping",
    "blockquote|cite", "body|background", "del|cite", "form|action", "img|src",
    "input|src", "ins|cite", "q|cite", "source|src", "track|src", "video|poster",
    "video|src",
];

const RESOURCE_URL: &[&str] = &[
    "applet|code", "applet|codebase", "base|href", "embed|src", "frame|src",
    "head|profile", "html|manifest", "iframe|src", "link|href", "media|src",
    "object|codebase", "object|data", "script|src",
];

static SECURITY_SCHEMA: Lazy<HashMap<&'static str, SecurityContext>> = Lazy::new(|| {
    [
        (SecurityContext::HTML, HTML),
        (SecurityContext::STYLE, STYLE),
        (SecurityContext::URL, URL),
        (SecurityContext::ResourceUrl, RESOURCE_URL),
    ]
    .into_iter()
    .flat_map(|(ctx, specs)| specs.iter().map(move |spec| (*spec, ctx)))
    .collect()
});

/// Looks up `tag|prop`, falling back to `*|prop`. Both names must already be
/// lower-cased.
pub fn lookup_security_context(tag_name: &str, prop_name: &str) -> Option<SecurityContext> {
    SECURITY_SCHEMA
        .get(format!("{}|{}", tag_name, prop_name).as_str())
        .or_else(|| SECURITY_SCHEMA.get(format!("*|{}", prop_name).as_str()))
        .copied()
}
