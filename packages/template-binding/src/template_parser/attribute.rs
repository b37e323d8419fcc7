//! Attribute dispatcher
//!
//! Classifies an element attribute by its name (`[x]`, `(x)`, `[(x)]`,
//! `bind-x`, `on-x`, `bindon-x`, `let-x`, `@x`, `*x`) and hands it to the
//! matching [`BindingParser`] operation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug_span, trace};

use super::binding_parser::BindingParser;
use super::bindings::{
    BoundElementProperty, ElementBindings, MatchableAttr, ParsedEvent, ParsedProperty,
    ParsedVariable,
};
use crate::parse_util::{ParseErrorLevel, ParseSourceSpan};

static BIND_NAME_REGEXP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(bind-)|(let-)|(on-)|(bindon-)|(@))(.*)$").expect("bind name regex is valid")
});

// Capture groups of BIND_NAME_REGEXP
const KW_BIND_IDX: usize = 1;
const KW_LET_IDX: usize = 2;
const KW_ON_IDX: usize = 3;
const KW_BINDON_IDX: usize = 4;
const KW_AT_IDX: usize = 5;
const IDENT_KW_IDX: usize = 6;

struct BindingDelims {
    start: &'static str,
    end: &'static str,
}

const BANANA_BOX_DELIMS: BindingDelims = BindingDelims { start: "[(", end: ")]" };
const PROPERTY_DELIMS: BindingDelims = BindingDelims { start: "[", end: "]" };
const EVENT_DELIMS: BindingDelims = BindingDelims { start: "(", end: ")" };

const TEMPLATE_ATTR_PREFIX: &str = "*";
const DATA_PREFIX: &str = "data-";
const IMPLICIT_VARIABLE_VALUE: &str = "$implicit";

/// One attribute of an element as the markup parser saw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateAttribute {
    pub name: String,
    pub value: String,
    /// Whole attribute, `name="value"`
    pub source_span: ParseSourceSpan,
    /// Value between the quotes, when the attribute has one
    pub value_span: Option<ParseSourceSpan>,
}

impl TemplateAttribute {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        source_span: ParseSourceSpan,
        value_span: Option<ParseSourceSpan>,
    ) -> Self {
        TemplateAttribute {
            name: name.into(),
            value: value.into(),
            source_span,
            value_span,
        }
    }

    fn absolute_value_offset(&self) -> usize {
        self.value_span
            .as_ref()
            .map_or(self.source_span.start.offset + self.name.len(), |span| span.start.offset)
    }
}

/// Bindings of one element, with properties resolved against its selector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundElement {
    pub selector: String,
    pub properties: Vec<BoundElementProperty>,
    pub literal_attrs: Vec<ParsedProperty>,
    pub events: Vec<ParsedEvent>,
    pub variables: Vec<ParsedVariable>,
    pub template_properties: Vec<ParsedProperty>,
    pub template_variables: Vec<ParsedVariable>,
    pub matchable_attrs: Vec<MatchableAttr>,
    pub template_matchable_attrs: Vec<MatchableAttr>,
}

impl<'a> BindingParser<'a> {
    /// Parses every attribute of an element and resolves its non-literal
    /// properties. Plain attributes are recorded as literals.
    pub fn bind_element(&mut self, selector: &str, attrs: &[TemplateAttribute]) -> BoundElement {
        let _span = debug_span!("bind_element", selector).entered();
        let mut bindings = ElementBindings::new();

        for attr in attrs {
            if !self.parse_attribute(attr, &mut bindings) {
                trace!(attr = %attr.name, "literal attribute");
                let key_span = create_key_span(&attr.source_span, &attr.name, &attr.name, "", &attr.name);
                bindings.matchable_attrs.push((attr.name.clone(), attr.value.clone()));
                self.parse_literal_attr(
                    &attr.name,
                    Some(&attr.value),
                    &attr.source_span,
                    attr.absolute_value_offset(),
                    attr.value_span.as_ref(),
                    &mut bindings.matchable_attrs,
                    &mut bindings.properties,
                    &key_span,
                );
            }
        }

        let skip_validation = self.config().skip_schema_validation;
        let map_property_names = self.config().map_property_names;
        let (literal_attrs, bound): (Vec<ParsedProperty>, Vec<ParsedProperty>) =
            bindings.properties.into_iter().partition(ParsedProperty::is_literal);
        let properties = bound
            .iter()
            .map(|prop| {
                self.create_bound_element_property(selector, prop, skip_validation, map_property_names)
            })
            .collect();

        BoundElement {
            selector: selector.to_string(),
            properties,
            literal_attrs,
            events: bindings.events,
            variables: bindings.variables,
            template_properties: bindings.template_properties,
            template_variables: bindings.template_variables,
            matchable_attrs: bindings.matchable_attrs,
            template_matchable_attrs: bindings.template_matchable_attrs,
        }
    }

    /// Dispatches one attribute. Returns false for a plain attribute, which
    /// the caller records as a literal.
    pub fn parse_attribute(
        &mut self,
        attribute: &TemplateAttribute,
        bindings: &mut ElementBindings,
    ) -> bool {
        let name = normalize_attribute_name(&attribute.name);
        let value = attribute.value.as_str();
        let src_span = &attribute.source_span;
        let value_span = attribute.value_span.as_ref();
        let absolute_offset = value_span.map_or(src_span.start.offset, |span| span.start.offset);

        if let Some(template_key) = name.strip_prefix(TEMPLATE_ATTR_PREFIX) {
            trace!(attr = %attribute.name, "template binding");
            if template_key.is_empty() {
                self.report_error("Template binding name is missing", src_span, ParseErrorLevel::Error);
            }
            if bindings.has_template_binding() {
                self.report_error(
                    "Can't have multiple template bindings on one element. Use only one attribute prefixed with *",
                    src_span,
                    ParseErrorLevel::Error,
                );
            }
            bindings.template_key = Some(template_key.to_string());
            self.parse_inline_template_binding(
                template_key,
                value,
                src_span,
                attribute.absolute_value_offset(),
                &mut bindings.template_matchable_attrs,
                &mut bindings.template_properties,
                &mut bindings.template_variables,
            );
            return true;
        }

        if let Some(captures) = BIND_NAME_REGEXP.captures(name) {
            let identifier = captures.get(IDENT_KW_IDX).map_or("", |m| m.as_str());
            let keyword = |idx: usize| captures.get(idx).map(|m| m.as_str());

            if let Some(prefix) = keyword(KW_BIND_IDX) {
                trace!(attr = %attribute.name, "property binding");
                let key_span = create_key_span(src_span, &attribute.name, name, prefix, identifier);
                self.parse_property_binding(
                    identifier,
                    value,
                    false,
                    src_span,
                    absolute_offset,
                    value_span,
                    &mut bindings.matchable_attrs,
                    &mut bindings.properties,
                    &key_span,
                );
                return true;
            }
            if let Some(prefix) = keyword(KW_LET_IDX) {
                trace!(attr = %attribute.name, "template variable");
                let key_span = create_key_span(src_span, &attribute.name, name, prefix, identifier);
                self.parse_variable(identifier, value, src_span, &key_span, value_span, &mut bindings.variables);
                return true;
            }
            if let Some(prefix) = keyword(KW_ON_IDX) {
                trace!(attr = %attribute.name, "event binding");
                let key_span = create_key_span(src_span, &attribute.name, name, prefix, identifier);
                self.parse_event(
                    identifier,
                    value,
                    false,
                    src_span,
                    value_span.unwrap_or(src_span),
                    &mut bindings.matchable_attrs,
                    &mut bindings.events,
                    &key_span,
                );
                return true;
            }
            if let Some(prefix) = keyword(KW_BINDON_IDX) {
                trace!(attr = %attribute.name, "two-way binding");
                let key_span = create_key_span(src_span, &attribute.name, name, prefix, identifier);
                self.parse_two_way_binding(identifier, value, src_span, absolute_offset, value_span, bindings, &key_span);
                return true;
            }
            if keyword(KW_AT_IDX).is_some() {
                trace!(attr = %attribute.name, "animation attribute");
                let key_span = create_key_span(src_span, &attribute.name, name, "", name);
                self.parse_literal_attr(
                    name,
                    Some(value),
                    src_span,
                    absolute_offset,
                    value_span,
                    &mut bindings.matchable_attrs,
                    &mut bindings.properties,
                    &key_span,
                );
                return true;
            }
        }

        let delims = [&BANANA_BOX_DELIMS, &PROPERTY_DELIMS, &EVENT_DELIMS]
            .into_iter()
            .find(|delims| name.starts_with(delims.start));
        if let Some(delims) = delims {
            if name.ends_with(delims.end) && name.len() > delims.start.len() + delims.end.len() {
                let identifier = &name[delims.start.len()..name.len() - delims.end.len()];
                let key_span = create_key_span(src_span, &attribute.name, name, delims.start, identifier);

                if delims.start == BANANA_BOX_DELIMS.start {
                    trace!(attr = %attribute.name, "two-way binding");
                    self.parse_two_way_binding(identifier, value, src_span, absolute_offset, value_span, bindings, &key_span);
                } else if delims.start == PROPERTY_DELIMS.start {
                    trace!(attr = %attribute.name, "property binding");
                    self.parse_property_binding(
                        identifier,
                        value,
                        false,
                        src_span,
                        absolute_offset,
                        value_span,
                        &mut bindings.matchable_attrs,
                        &mut bindings.properties,
                        &key_span,
                    );
                } else {
                    trace!(attr = %attribute.name, "event binding");
                    self.parse_event(
                        identifier,
                        value,
                        false,
                        src_span,
                        value_span.unwrap_or(src_span),
                        &mut bindings.matchable_attrs,
                        &mut bindings.events,
                        &key_span,
                    );
                }
                return true;
            }
        }

        let key_span = create_key_span(src_span, &attribute.name, name, "", name);
        let has_interpolation = self.parse_property_interpolation(
            name,
            value,
            src_span,
            value_span,
            &mut bindings.matchable_attrs,
            &mut bindings.properties,
            &key_span,
        );
        if has_interpolation {
            trace!(attr = %attribute.name, "interpolated attribute");
        }
        has_interpolation
    }

    /// `[(name)]="value"`: a property binding plus a `nameChange` event that
    /// writes back to `value`.
    fn parse_two_way_binding(
        &mut self,
        identifier: &str,
        value: &str,
        src_span: &ParseSourceSpan,
        absolute_offset: usize,
        value_span: Option<&ParseSourceSpan>,
        bindings: &mut ElementBindings,
        key_span: &ParseSourceSpan,
    ) {
        self.parse_property_binding(
            identifier,
            value,
            false,
            src_span,
            absolute_offset,
            value_span,
            &mut bindings.matchable_attrs,
            &mut bindings.properties,
            key_span,
        );
        self.parse_event(
            &format!("{}Change", identifier),
            value,
            true,
            src_span,
            value_span.unwrap_or(src_span),
            &mut Vec::new(),
            &mut bindings.events,
            key_span,
        );
    }

    fn parse_variable(
        &mut self,
        identifier: &str,
        value: &str,
        source_span: &ParseSourceSpan,
        key_span: &ParseSourceSpan,
        value_span: Option<&ParseSourceSpan>,
        variables: &mut Vec<ParsedVariable>,
    ) {
        if identifier.contains('-') {
            self.report_error("\"-\" is not allowed in variable names", source_span, ParseErrorLevel::Error);
        } else if identifier.is_empty() {
            self.report_error("Variable does not have a name", source_span, ParseErrorLevel::Error);
        }

        let value = if value.is_empty() { IMPLICIT_VARIABLE_VALUE } else { value };
        variables.push(ParsedVariable {
            name: identifier.to_string(),
            value: value.to_string(),
            source_span: source_span.clone(),
            key_span: key_span.clone(),
            value_span: value_span.cloned(),
        });
    }
}

/// Strips a case-insensitive `data-` prefix.
pub fn normalize_attribute_name(attr_name: &str) -> &str {
    match attr_name.get(..DATA_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(DATA_PREFIX) => &attr_name[DATA_PREFIX.len()..],
        _ => attr_name,
    }
}

/// Span of `identifier` inside the attribute name, skipping the `data-`
/// prefix and the binding `prefix`.
fn create_key_span(
    src_span: &ParseSourceSpan,
    attr_name: &str,
    normalized_name: &str,
    prefix: &str,
    identifier: &str,
) -> ParseSourceSpan {
    let normalization_adjustment = attr_name.len() - normalized_name.len();
    let key_span_start = src_span.start.move_by((prefix.len() + normalization_adjustment) as isize);
    let key_span_end = key_span_start.move_by(identifier.len() as isize);
    ParseSourceSpan::new(key_span_start, key_span_end)
}
