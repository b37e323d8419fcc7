//! Template Parser Module
//!
//! Binding parser, attribute dispatcher and security classifier.

pub mod attribute;
pub mod binding_parser;
pub mod bindings;
pub mod parallel;
pub mod security;

pub use attribute::{normalize_attribute_name, BoundElement, TemplateAttribute};
pub use binding_parser::{
    move_parse_source_span, BindingParser, HostListeners, HostProperties, PipeCollector,
};
pub use bindings::*;
pub use parallel::{bind_elements, ElementInput};
pub use security::{calc_possible_security_contexts, SecurityContexts};
