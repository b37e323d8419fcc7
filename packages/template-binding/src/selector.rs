//! CSS element selectors
//!
//! Only the parsing half is needed here: the security classifier reads the
//! element names (and `:not(...)` exclusions) out of an element's selector.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SelectorError;

static SELECTOR_REGEXP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(:not\()|(([\.#]?)[-\w]+)|(?:\[([-.\w*\\$]+)(?:=(?:"([^"]*)"|'([^']*)'|([^\]]*)))?\])|(\))|(\s*,\s*)"#,
    )
    .expect("selector regex is valid")
});

// Capture groups of SELECTOR_REGEXP
const NOT: usize = 1;
const TAG: usize = 2;
const PREFIX: usize = 3;
const ATTRIBUTE: usize = 4;
const ATTRIBUTE_VALUE_DOUBLE: usize = 5;
const ATTRIBUTE_VALUE_SINGLE: usize = 6;
const ATTRIBUTE_VALUE_UNQUOTED: usize = 7;
const NOT_END: usize = 8;
const SEPARATOR: usize = 9;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssSelector {
    pub element: Option<String>,
    pub class_names: Vec<String>,
    /// `(name, value)` pairs; values are lower-cased
    pub attrs: Vec<(String, String)>,
    pub not_selectors: Vec<CssSelector>,
}

impl CssSelector {
    pub fn new() -> Self {
        CssSelector::default()
    }

    /// Parses a comma separated selector list such as `input[type=text], a:not(.x)`.
    pub fn parse(selector: &str) -> Result<Vec<CssSelector>, SelectorError> {
        let mut results = Vec::new();
        let mut current = CssSelector::new();
        let mut in_not = false;

        for cap in SELECTOR_REGEXP.captures_iter(selector) {
            if cap.get(NOT).is_some() {
                if in_not {
                    return Err(SelectorError::NestedNot);
                }
                in_not = true;
                current.not_selectors.push(CssSelector::new());
            }

            let target = if in_not && !current.not_selectors.is_empty() {
                let last = current.not_selectors.len() - 1;
                &mut current.not_selectors[last]
            } else {
                &mut current
            };

            if let Some(tag) = cap.get(TAG) {
                let tag = tag.as_str();
                match cap.get(PREFIX).map(|m| m.as_str()) {
                    Some("#") => target.add_attribute("id", &tag[1..]),
                    Some(".") => target.add_class_name(&tag[1..]),
                    _ => target.set_element(tag),
                }
            }

            if let Some(attr) = cap.get(ATTRIBUTE) {
                let value = [ATTRIBUTE_VALUE_DOUBLE, ATTRIBUTE_VALUE_SINGLE, ATTRIBUTE_VALUE_UNQUOTED]
                    .iter()
                    .find_map(|&group| cap.get(group))
                    .map(|m| m.as_str())
                    .unwrap_or("");
                let name = unescape_attribute(attr.as_str())?;
                target.add_attribute(&name, value);
            }

            if cap.get(NOT_END).is_some() {
                in_not = false;
            }

            if cap.get(SEPARATOR).is_some() {
                if in_not {
                    return Err(SelectorError::MultipleNot);
                }
                push_result(&mut results, std::mem::take(&mut current));
            }
        }

        push_result(&mut results, current);
        Ok(results)
    }

    /// True for a bare element selector such as `div` (no classes or attributes).
    pub fn is_element_selector(&self) -> bool {
        self.has_element_selector() && self.class_names.is_empty() && self.attrs.is_empty()
    }

    pub fn has_element_selector(&self) -> bool {
        matches!(self.element.as_deref(), Some(element) if element != "*")
    }

    pub fn set_element(&mut self, element: &str) {
        self.element = Some(element.to_string());
    }

    pub fn add_attribute(&mut self, name: &str, value: &str) {
        self.attrs.push((name.to_string(), value.to_lowercase()));
    }

    pub fn add_class_name(&mut self, name: &str) {
        self.class_names.push(name.to_lowercase());
    }
}

fn push_result(results: &mut Vec<CssSelector>, mut selector: CssSelector) {
    if !selector.not_selectors.is_empty()
        && selector.element.is_none()
        && selector.class_names.is_empty()
        && selector.attrs.is_empty()
    {
        selector.element = Some("*".to_string());
    }
    results.push(selector);
}

/// Removes `\` escapes; an unescaped `$` is rejected.
fn unescape_attribute(attr: &str) -> Result<String, SelectorError> {
    let mut result = String::with_capacity(attr.len());
    let mut escaping = false;
    for ch in attr.chars() {
        if ch == '\\' {
            escaping = true;
            continue;
        }
        if ch == '$' && !escaping {
            return Err(SelectorError::UnescapedDollar(attr.to_string()));
        }
        escaping = false;
        result.push(ch);
    }
    Ok(result)
}
