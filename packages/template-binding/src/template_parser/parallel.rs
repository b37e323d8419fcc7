//! Parallel element binding
//!
//! Elements are independent, so each one is bound on the rayon pool with
//! its own [`ErrorSink`]. Results and diagnostics come back in input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::attribute::{BoundElement, TemplateAttribute};
use super::binding_parser::BindingParser;
use crate::config::BindingParserConfig;
use crate::expression_parser::ExpressionAdapter;
use crate::parse_util::{ErrorSink, ParseError};
use crate::schema::ElementSchemaRegistry;

/// An element to bind: its selector and its attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInput {
    pub selector: String,
    pub attrs: Vec<TemplateAttribute>,
}

impl ElementInput {
    pub fn new(selector: impl Into<String>, attrs: Vec<TemplateAttribute>) -> Self {
        ElementInput {
            selector: selector.into(),
            attrs,
        }
    }
}

pub fn bind_elements(
    adapter: &(dyn ExpressionAdapter + Sync),
    registry: &(dyn ElementSchemaRegistry + Sync),
    config: &BindingParserConfig,
    elements: &[ElementInput],
) -> (Vec<BoundElement>, Vec<ParseError>) {
    debug!(count = elements.len(), "binding elements");
    let results: Vec<(BoundElement, ErrorSink)> = elements
        .par_iter()
        .map(|element| {
            let mut errors = ErrorSink::new();
            let bound = BindingParser::new(adapter, registry, config, &mut errors)
                .bind_element(&element.selector, &element.attrs);
            (bound, errors)
        })
        .collect();

    let mut bound_elements = Vec::with_capacity(results.len());
    let mut errors = ErrorSink::new();
    for (bound, element_errors) in results {
        bound_elements.push(bound);
        errors.extend(element_errors);
    }
    (bound_elements, errors.into_vec())
}
