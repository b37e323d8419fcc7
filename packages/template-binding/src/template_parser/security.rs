//! Security Classifier
//!
//! Works out which sanitization contexts a bound property could end up in,
//! given every element the host selector may match.

use smallvec::SmallVec;
use tracing::trace;

use crate::core::SecurityContext;
use crate::schema::ElementSchemaRegistry;
use crate::selector::CssSelector;

pub type SecurityContexts = SmallVec<[SecurityContext; 4]>;

/// Sorted, de-duplicated security contexts of `prop_name` across the
/// elements `selector` may match. Never empty: falls back to `[NONE]`.
///
/// A selector without an element name matches every known element, minus
/// the element names of its `:not(...)` parts. A selector that fails to
/// parse contributes no elements.
pub fn calc_possible_security_contexts(
    registry: &dyn ElementSchemaRegistry,
    selector: &str,
    prop_name: &str,
    is_attribute: bool,
) -> SecurityContexts {
    let selectors = match CssSelector::parse(selector) {
        Ok(selectors) => selectors,
        Err(err) => {
            trace!(selector, %err, "unparsable selector, no candidate elements");
            Vec::new()
        }
    };

    let mut ctxs = SecurityContexts::new();
    for css_selector in &selectors {
        let element_names = match &css_selector.element {
            Some(element) => vec![element.clone()],
            None => registry.all_known_element_names(),
        };
        let not_element_names: Vec<&str> = css_selector
            .not_selectors
            .iter()
            .filter(|not| not.is_element_selector())
            .filter_map(|not| not.element.as_deref())
            .collect();

        for element_name in element_names
            .iter()
            .filter(|name| !not_element_names.contains(&name.as_str()))
        {
            ctxs.push(registry.security_context(element_name, prop_name, is_attribute));
        }
    }

    if ctxs.is_empty() {
        return SmallVec::from_elem(SecurityContext::NONE, 1);
    }
    ctxs.sort();
    ctxs.dedup();
    ctxs
}
