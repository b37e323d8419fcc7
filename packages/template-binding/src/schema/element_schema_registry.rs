//! Element Schema Registry
//!
//! Lookup capability describing which elements exist, how attribute names map
//! onto DOM properties, and which security context applies to a binding.

use crate::core::SecurityContext;

/// Validation result for properties/attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub error: bool,
    pub msg: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        ValidationResult::default()
    }

    pub fn error(msg: impl Into<String>) -> Self {
        ValidationResult {
            error: true,
            msg: Some(msg.into()),
        }
    }
}

pub trait ElementSchemaRegistry {
    /// Security context of `prop_name` on `element_name`. When
    /// `is_attribute` is set the name is an attribute name and is mapped to
    /// its property first.
    fn security_context(&self, element_name: &str, prop_name: &str, is_attribute: bool)
        -> SecurityContext;

    /// Every element name the schema knows about.
    fn all_known_element_names(&self) -> Vec<String>;

    /// DOM property name for an attribute-style name (`for` -> `htmlFor`).
    fn get_mapped_prop_name(&self, prop_name: &str) -> String;

    fn validate_property(&self, name: &str) -> ValidationResult;

    fn validate_attribute(&self, name: &str) -> ValidationResult;
}
