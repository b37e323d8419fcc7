//! DOM Element Schema Registry
//!
//! Default [`ElementSchemaRegistry`] for HTML: a static list of element names,
//! the attribute-to-property aliases and the security table from
//! [`super::dom_security_schema`].

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::dom_security_schema::lookup_security_context;
use super::element_schema_registry::{ElementSchemaRegistry, ValidationResult};
use crate::core::SecurityContext;

const KNOWN_ELEMENTS: &[&str] = &[
    "a", "abbr", "address", "applet", "area", "article", "aside", "audio", "b", "base",
    "basefont", "bdi", "bdo", "blockquote", "body", "br", "button", "canvas", "caption",
    "cite", "code", "col", "colgroup", "content", "data", "datalist", "dd", "del",
    "details", "dfn", "dialog", "dir", "div", "dl", "dt", "em", "embed", "fieldset",
    "figcaption", "figure", "font", "footer", "form", "frame", "frameset", "h1", "h2", "h3",
    "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img",
    "input", "ins", "kbd", "label", "legend", "li", "link", "main", "map", "mark",
    "marquee", "media", "menu", "meta", "meter", "nav", "noscript", "object", "ol",
    "optgroup", "option", "output", "p", "param", "picture", "pre", "progress", "q", "rp",
    "rt", "ruby", "s", "samp", "script", "section", "select", "shadow", "slot", "small",
    "source", "span", "strong", "style", "sub", "summary", "sup", "table", "tbody", "td",
    "template", "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "u",
    "ul", "var", "video", "wbr",
];

/// Attribute names whose DOM property is spelled differently.
static ATTR_TO_PROP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("class", "className"),
        ("for", "htmlFor"),
        ("formaction", "formAction"),
        ("innerHtml", "innerHTML"),
        ("readonly", "readOnly"),
        ("tabindex", "tabIndex"),
    ])
});

#[derive(Debug, Clone)]
pub struct DomElementSchemaRegistry {
    elements: Vec<String>,
}

impl DomElementSchemaRegistry {
    pub fn new() -> Self {
        DomElementSchemaRegistry {
            elements: KNOWN_ELEMENTS.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Registers additional element names, e.g. custom elements declared by
    /// the host application.
    pub fn with_elements<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into().to_lowercase();
            if !self.elements.contains(&name) {
                self.elements.push(name);
            }
        }
        self
    }

    pub fn has_element(&self, tag_name: &str) -> bool {
        let tag_name = tag_name.to_lowercase();
        self.elements.iter().any(|name| *name == tag_name)
    }
}

impl Default for DomElementSchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementSchemaRegistry for DomElementSchemaRegistry {
    fn security_context(
        &self,
        element_name: &str,
        prop_name: &str,
        is_attribute: bool,
    ) -> SecurityContext {
        // Attribute names are classified by the property they write to.
        let prop_name = if is_attribute {
            self.get_mapped_prop_name(prop_name)
        } else {
            prop_name.to_string()
        };
        // Case-insensitive so casing differences cannot bypass sanitization.
        lookup_security_context(&element_name.to_lowercase(), &prop_name.to_lowercase())
            .unwrap_or(SecurityContext::NONE)
    }

    fn all_known_element_names(&self) -> Vec<String> {
        self.elements.clone()
    }

    fn get_mapped_prop_name(&self, prop_name: &str) -> String {
        ATTR_TO_PROP
            .get(prop_name)
            .copied()
            .unwrap_or(prop_name)
            .to_string()
    }

    fn validate_property(&self, name: &str) -> ValidationResult {
        match event_suffix(name) {
            Some(event) => ValidationResult::error(format!(
                "Binding to event property '{}' is disallowed for security reasons, please use ({})=...\n\
                 If '{}' is a directive input, make sure the directive is imported by the current module.",
                name, event, name
            )),
            None => ValidationResult::ok(),
        }
    }

    fn validate_attribute(&self, name: &str) -> ValidationResult {
        match event_suffix(name) {
            Some(event) => ValidationResult::error(format!(
                "Binding to event attribute '{}' is disallowed for security reasons, please use ({})=...",
                name, event
            )),
            None => ValidationResult::ok(),
        }
    }
}

/// `onclick` -> `click`; `None` for names that do not start with `on`.
fn event_suffix(name: &str) -> Option<&str> {
    let prefix = name.get(..2)?;
    prefix.eq_ignore_ascii_case("on").then(|| &name[2..])
}
