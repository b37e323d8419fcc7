//! Binding records
//!
//! Output of the binding parser: parsed properties, events and variables,
//! and the per-element collections they are appended to.

use serde::{Deserialize, Serialize};

use crate::core::SecurityContext;
use crate::expression_parser::ASTWithSource;
use crate::parse_util::ParseSourceSpan;

/// `(name, value)` pair used when matching directive selectors.
pub type MatchableAttr = (String, String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParsedPropertyType {
    Default,
    LiteralAttr,
    Animation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedProperty {
    pub name: String,
    pub expression: ASTWithSource,
    pub property_type: ParsedPropertyType,
    pub source_span: ParseSourceSpan,
    pub key_span: ParseSourceSpan,
    pub value_span: Option<ParseSourceSpan>,
}

impl ParsedProperty {
    pub fn new(
        name: impl Into<String>,
        expression: ASTWithSource,
        property_type: ParsedPropertyType,
        source_span: ParseSourceSpan,
        key_span: ParseSourceSpan,
        value_span: Option<ParseSourceSpan>,
    ) -> Self {
        ParsedProperty {
            name: name.into(),
            expression,
            property_type,
            source_span,
            key_span,
            value_span,
        }
    }

    pub fn is_literal(&self) -> bool {
        self.property_type == ParsedPropertyType::LiteralAttr
    }

    pub fn is_animation(&self) -> bool {
        self.property_type == ParsedPropertyType::Animation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingType {
    /// `[prop]`
    Property,
    /// `[attr.name]`
    Attribute,
    /// `[class.name]`
    Class,
    /// `[style.name]` / `[style.name.unit]`
    Style,
    /// `[@trigger]`
    Animation,
}

/// A property binding resolved against the element: binding target,
/// security context and optional style unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundElementProperty {
    pub name: String,
    pub binding_type: BindingType,
    pub security_context: SecurityContext,
    pub value: ASTWithSource,
    pub unit: Option<String>,
    pub source_span: ParseSourceSpan,
    pub key_span: ParseSourceSpan,
    pub value_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParsedEventType {
    /// DOM or directive output event
    Regular,
    /// `(@trigger.phase)`
    Animation,
    /// Synthesized `<name>Change` half of a two-way binding
    TwoWay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedEvent {
    pub name: String,
    /// Event target (`window:`, `document:`) or animation phase
    pub target_or_phase: Option<String>,
    pub event_type: ParsedEventType,
    pub handler: ASTWithSource,
    pub source_span: ParseSourceSpan,
    pub handler_span: ParseSourceSpan,
    pub key_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedVariable {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
    pub key_span: ParseSourceSpan,
    pub value_span: Option<ParseSourceSpan>,
}

/// Caller-owned collections for one element. `template_*` receive the
/// output of a `*` micro-syntax attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementBindings {
    pub properties: Vec<ParsedProperty>,
    pub events: Vec<ParsedEvent>,
    pub variables: Vec<ParsedVariable>,
    pub matchable_attrs: Vec<MatchableAttr>,
    pub template_properties: Vec<ParsedProperty>,
    pub template_variables: Vec<ParsedVariable>,
    pub template_matchable_attrs: Vec<MatchableAttr>,
    /// Key of the `*` attribute, once one has been seen
    pub template_key: Option<String>,
}

impl ElementBindings {
    pub fn new() -> Self {
        ElementBindings::default()
    }

    pub fn has_template_binding(&self) -> bool {
        self.template_key.is_some()
    }
}
