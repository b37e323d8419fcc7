//! Schema Module
//!
//! The element schema consumed by the binding parser, plus a default
//! registry for the DOM.

pub mod dom_element_schema_registry;
pub mod dom_security_schema;
pub mod element_schema_registry;

pub use dom_element_schema_registry::DomElementSchemaRegistry;
pub use element_schema_registry::{ElementSchemaRegistry, ValidationResult};
