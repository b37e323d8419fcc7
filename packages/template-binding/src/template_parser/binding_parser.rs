//! Binding Parser
//!
//! Turns attribute names and values into parsed properties, events and
//! variables. Diagnostics go to the borrowed [`ErrorSink`]; no entry point
//! fails or panics on malformed input.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use super::bindings::{
    BindingType, BoundElementProperty, MatchableAttr, ParsedEvent, ParsedEventType, ParsedProperty,
    ParsedPropertyType, ParsedVariable,
};
use super::security::{self, SecurityContexts};
use crate::config::BindingParserConfig;
use crate::core::SecurityContext;
use crate::error::ExpressionError;
use crate::expression_parser::{
    ASTWithSource, AbsoluteSourceSpan, BindingPipe, ExpressionAdapter, ParserError,
    RecursiveAstVisitor, TemplateBinding, AST,
};
use crate::ml_parser::tags::merge_ns_and_name;
use crate::parse_util::{ErrorSink, ParseErrorLevel, ParseSourceSpan};
use crate::schema::ElementSchemaRegistry;
use crate::util::{split_at_colon, split_at_period};

const PROPERTY_PARTS_SEPARATOR: char = '.';
const ATTRIBUTE_PREFIX: &str = "attr";
const CLASS_PREFIX: &str = "class";
const STYLE_PREFIX: &str = "style";
const TEMPLATE_ATTR_PREFIX: &str = "*";
const ANIMATE_PROP_PREFIX: &str = "animate-";
const ANIMATION_LABEL: char = '@';
const IMPLICIT_VARIABLE_VALUE: &str = "$implicit";
const ERROR_PLACEHOLDER: &str = "ERROR";

/// Host metadata maps, in declaration order. Values are expected to be
/// strings; anything else is reported.
pub type HostProperties = IndexMap<String, Value>;
pub type HostListeners = IndexMap<String, Value>;

pub struct BindingParser<'a> {
    expr_parser: &'a dyn ExpressionAdapter,
    schema_registry: &'a dyn ElementSchemaRegistry,
    config: &'a BindingParserConfig,
    errors: &'a mut ErrorSink,
}

impl<'a> BindingParser<'a> {
    pub fn new(
        expr_parser: &'a dyn ExpressionAdapter,
        schema_registry: &'a dyn ElementSchemaRegistry,
        config: &'a BindingParserConfig,
        errors: &'a mut ErrorSink,
    ) -> Self {
        BindingParser {
            expr_parser,
            schema_registry,
            config,
            errors,
        }
    }

    pub fn config(&self) -> &BindingParserConfig {
        self.config
    }

    pub fn errors(&self) -> &ErrorSink {
        self.errors
    }

    pub fn create_bound_host_properties(
        &mut self,
        properties: &HostProperties,
        source_span: &ParseSourceSpan,
    ) -> Vec<ParsedProperty> {
        let mut bound_props = Vec::new();
        for (prop_name, expression) in properties {
            match expression {
                Value::String(expression) => self.parse_property_binding(
                    prop_name,
                    expression,
                    true,
                    source_span,
                    source_span.start.offset,
                    None,
                    &mut Vec::new(),
                    &mut bound_props,
                    source_span,
                ),
                other => self.report_error(
                    format!(
                        "Value of the host property binding \"{}\" needs to be a string representing an expression but got \"{}\" ({})",
                        prop_name,
                        other,
                        json_type_name(other)
                    ),
                    source_span,
                    ParseErrorLevel::Error,
                ),
            }
        }
        bound_props
    }

    pub fn create_directive_host_property_asts(
        &mut self,
        properties: &HostProperties,
        element_selector: &str,
        source_span: &ParseSourceSpan,
    ) -> Vec<BoundElementProperty> {
        let skip_validation = self.config.skip_schema_validation;
        let map_property_name = self.config.map_property_names;
        self.create_bound_host_properties(properties, source_span)
            .iter()
            .map(|prop| {
                self.create_bound_element_property(
                    element_selector,
                    prop,
                    skip_validation,
                    map_property_name,
                )
            })
            .collect()
    }

    pub fn create_directive_host_event_asts(
        &mut self,
        listeners: &HostListeners,
        source_span: &ParseSourceSpan,
    ) -> Vec<ParsedEvent> {
        let mut target_events = Vec::new();
        for (prop_name, expression) in listeners {
            match expression {
                Value::String(expression) => self.parse_event(
                    prop_name,
                    expression,
                    false,
                    source_span,
                    source_span,
                    &mut Vec::new(),
                    &mut target_events,
                    source_span,
                ),
                other => self.report_error(
                    format!(
                        "Value of the host listener \"{}\" needs to be a string representing an expression but got \"{}\" ({})",
                        prop_name,
                        other,
                        json_type_name(other)
                    ),
                    source_span,
                    ParseErrorLevel::Error,
                ),
            }
        }
        target_events
    }

    /// `None` when `value` contains no interpolation.
    pub fn parse_interpolation(
        &mut self,
        value: &str,
        source_span: &ParseSourceSpan,
    ) -> Option<ASTWithSource> {
        let source_info = source_span.start.to_string();
        let absolute_offset = source_span.full_start.offset;
        match self.expr_parser.parse_interpolation(
            value,
            &source_info,
            absolute_offset,
            &self.config.interpolation,
        ) {
            Ok(ast) => {
                if let Some(ast) = &ast {
                    self.report_expression_parser_errors(&ast.errors, source_span);
                }
                ast
            }
            Err(err) => Some(self.recover(err, source_span, &source_info, absolute_offset)),
        }
    }

    /// Parses `expression` as the body of a single `{{ }}` (used for ICU
    /// switch expressions).
    pub fn parse_interpolation_expression(
        &mut self,
        expression: &str,
        source_span: &ParseSourceSpan,
    ) -> ASTWithSource {
        let source_info = source_span.start.to_string();
        let absolute_offset = source_span.start.offset;
        match self
            .expr_parser
            .parse_interpolation_expression(expression, &source_info, absolute_offset)
        {
            Ok(ast) => {
                self.report_expression_parser_errors(&ast.errors, source_span);
                ast
            }
            Err(err) => self.recover(err, source_span, &source_info, absolute_offset),
        }
    }

    /// Parses a `*key="value"` micro-syntax attribute into template
    /// properties and variables.
    ///
    /// `source_span` covers the whole attribute; each binding's span is
    /// narrowed to its own part of the micro-syntax.
    pub fn parse_inline_template_binding(
        &mut self,
        template_key: &str,
        template_value: &str,
        source_span: &ParseSourceSpan,
        absolute_value_offset: usize,
        target_matchable_attrs: &mut Vec<MatchableAttr>,
        target_props: &mut Vec<ParsedProperty>,
        target_vars: &mut Vec<ParsedVariable>,
    ) {
        let absolute_key_offset = source_span.start.offset + TEMPLATE_ATTR_PREFIX.len();
        let bindings = self.parse_template_bindings(
            template_key,
            template_value,
            source_span,
            absolute_key_offset,
            absolute_value_offset,
        );

        for binding in bindings {
            let binding_span = move_parse_source_span(source_span, binding.source_span());
            let key_span = move_parse_source_span(source_span, binding.key().span);
            match binding {
                TemplateBinding::Variable(variable) => {
                    let (value, value_span) = match variable.value {
                        Some(value) => {
                            let span = move_parse_source_span(source_span, value.span);
                            (value.source, Some(span))
                        }
                        None => (IMPLICIT_VARIABLE_VALUE.to_string(), None),
                    };
                    target_vars.push(ParsedVariable {
                        name: variable.key.source,
                        value,
                        source_span: binding_span,
                        key_span,
                        value_span,
                    });
                }
                TemplateBinding::Expression(expression) => match expression.value {
                    Some(value) => {
                        let value_span = move_parse_source_span(source_span, value.source_span());
                        self.parse_property_ast(
                            &expression.key.source,
                            value,
                            &binding_span,
                            &key_span,
                            Some(&value_span),
                            target_matchable_attrs,
                            target_props,
                        );
                    }
                    None => {
                        let key = expression.key.source;
                        target_matchable_attrs.push((key.clone(), String::new()));
                        // No right hand side: the key span is the whole binding.
                        self.parse_literal_attr(
                            &key,
                            None,
                            &key_span,
                            absolute_value_offset,
                            None,
                            target_matchable_attrs,
                            target_props,
                            &key_span,
                        );
                    }
                },
            }
        }
    }

    fn parse_template_bindings(
        &mut self,
        template_key: &str,
        template_value: &str,
        source_span: &ParseSourceSpan,
        absolute_key_offset: usize,
        absolute_value_offset: usize,
    ) -> Vec<TemplateBinding> {
        let source_info = source_span.start.to_string();
        match self.expr_parser.parse_template_bindings(
            template_key,
            template_value,
            &source_info,
            absolute_key_offset,
            absolute_value_offset,
        ) {
            Ok(result) => {
                self.report_expression_parser_errors(&result.errors, source_span);
                for warning in result.warnings {
                    self.report_error(warning, source_span, ParseErrorLevel::Warning);
                }
                result.template_bindings
            }
            Err(err) => {
                self.report_error(err.to_string(), source_span, ParseErrorLevel::Error);
                Vec::new()
            }
        }
    }

    /// Plain attribute, or `@trigger` animation attribute.
    pub fn parse_literal_attr(
        &mut self,
        name: &str,
        value: Option<&str>,
        source_span: &ParseSourceSpan,
        absolute_offset: usize,
        value_span: Option<&ParseSourceSpan>,
        target_matchable_attrs: &mut Vec<MatchableAttr>,
        target_props: &mut Vec<ParsedProperty>,
        key_span: &ParseSourceSpan,
    ) {
        if let Some(trigger) = name.strip_prefix(ANIMATION_LABEL) {
            let key_span = key_span.trim_start(1);
            if value.map_or(false, |v| !v.is_empty()) {
                self.report_error(
                    "Assigning animation triggers via @prop=\"exp\" attributes with an expression is invalid. \
                     Use property bindings (e.g. [@prop]=\"exp\") or use an attribute without a value (e.g. @prop) instead.",
                    source_span,
                    ParseErrorLevel::Error,
                );
            }
            self.parse_animation(
                trigger,
                value,
                source_span,
                absolute_offset,
                &key_span,
                value_span,
                target_matchable_attrs,
                target_props,
            );
        } else {
            let expression = self.expr_parser.wrap_literal_primitive(
                Some(value.unwrap_or_default()),
                "",
                absolute_offset,
            );
            target_props.push(ParsedProperty::new(
                name,
                expression,
                ParsedPropertyType::LiteralAttr,
                source_span.clone(),
                key_span.clone(),
                value_span.cloned(),
            ));
        }
    }

    /// `[name]="expression"`, `bind-name`, and host property bindings.
    pub fn parse_property_binding(
        &mut self,
        name: &str,
        expression: &str,
        is_host: bool,
        source_span: &ParseSourceSpan,
        absolute_offset: usize,
        value_span: Option<&ParseSourceSpan>,
        target_matchable_attrs: &mut Vec<MatchableAttr>,
        target_props: &mut Vec<ParsedProperty>,
        key_span: &ParseSourceSpan,
    ) {
        if name.is_empty() {
            self.report_error(
                "Property name is missing in binding",
                source_span,
                ParseErrorLevel::Error,
            );
        }

        let animation = if let Some(trigger) = name.strip_prefix(ANIMATE_PROP_PREFIX) {
            Some((trigger, ANIMATE_PROP_PREFIX.len()))
        } else {
            name.strip_prefix(ANIMATION_LABEL)
                .map(|trigger| (trigger, ANIMATION_LABEL.len_utf8()))
        };

        match animation {
            Some((trigger, prefix_len)) => {
                let key_span = key_span.trim_start(prefix_len);
                self.parse_animation(
                    trigger,
                    Some(expression),
                    source_span,
                    absolute_offset,
                    &key_span,
                    value_span,
                    target_matchable_attrs,
                    target_props,
                );
            }
            None => {
                let ast = self.parse_binding(
                    expression,
                    is_host,
                    value_span.unwrap_or(source_span),
                    absolute_offset,
                );
                self.parse_property_ast(
                    name,
                    ast,
                    source_span,
                    key_span,
                    value_span,
                    target_matchable_attrs,
                    target_props,
                );
            }
        }
    }

    /// Interpolated attribute value (`title="Hello {{name}}"`). Returns
    /// false when the value has no interpolation.
    pub fn parse_property_interpolation(
        &mut self,
        name: &str,
        value: &str,
        source_span: &ParseSourceSpan,
        value_span: Option<&ParseSourceSpan>,
        target_matchable_attrs: &mut Vec<MatchableAttr>,
        target_props: &mut Vec<ParsedProperty>,
        key_span: &ParseSourceSpan,
    ) -> bool {
        match self.parse_interpolation(value, value_span.unwrap_or(source_span)) {
            Some(expr) => {
                self.parse_property_ast(
                    name,
                    expr,
                    source_span,
                    key_span,
                    value_span,
                    target_matchable_attrs,
                    target_props,
                );
                true
            }
            None => false,
        }
    }

    fn parse_property_ast(
        &mut self,
        name: &str,
        ast: ASTWithSource,
        source_span: &ParseSourceSpan,
        key_span: &ParseSourceSpan,
        value_span: Option<&ParseSourceSpan>,
        target_matchable_attrs: &mut Vec<MatchableAttr>,
        target_props: &mut Vec<ParsedProperty>,
    ) {
        target_matchable_attrs.push((name.to_string(), ast.source_text().to_string()));
        target_props.push(ParsedProperty::new(
            name,
            ast,
            ParsedPropertyType::Default,
            source_span.clone(),
            key_span.clone(),
            value_span.cloned(),
        ));
    }

    fn parse_animation(
        &mut self,
        name: &str,
        expression: Option<&str>,
        source_span: &ParseSourceSpan,
        absolute_offset: usize,
        key_span: &ParseSourceSpan,
        value_span: Option<&ParseSourceSpan>,
        target_matchable_attrs: &mut Vec<MatchableAttr>,
        target_props: &mut Vec<ParsedProperty>,
    ) {
        if name.is_empty() {
            self.report_error("Animation trigger is missing", source_span, ParseErrorLevel::Error);
        }

        // `@trigger` without a value binds `undefined`.
        let expression = expression.filter(|e| !e.is_empty()).unwrap_or("undefined");
        let ast = self.parse_binding(
            expression,
            false,
            value_span.unwrap_or(source_span),
            absolute_offset,
        );
        target_matchable_attrs.push((name.to_string(), ast.source_text().to_string()));
        target_props.push(ParsedProperty::new(
            name,
            ast,
            ParsedPropertyType::Animation,
            source_span.clone(),
            key_span.clone(),
            value_span.cloned(),
        ));
    }

    /// Parses `value` with the host (pipe-free) or the full binding grammar.
    pub fn parse_binding(
        &mut self,
        value: &str,
        is_host_binding: bool,
        source_span: &ParseSourceSpan,
        absolute_offset: usize,
    ) -> ASTWithSource {
        let source_info = source_span.start.to_string();
        let config = &self.config.interpolation;
        let result = if is_host_binding {
            self.expr_parser
                .parse_simple_binding(value, &source_info, absolute_offset, config)
        } else {
            self.expr_parser
                .parse_binding(value, &source_info, absolute_offset, config)
        };
        match result {
            Ok(ast) => {
                self.report_expression_parser_errors(&ast.errors, source_span);
                ast
            }
            Err(err) => self.recover(err, source_span, &source_info, absolute_offset),
        }
    }

    /// Resolves a parsed property against the element it is bound on:
    /// binding target, security context and style unit.
    pub fn create_bound_element_property(
        &mut self,
        element_selector: &str,
        bound_prop: &ParsedProperty,
        skip_validation: bool,
        map_property_name: bool,
    ) -> BoundElementProperty {
        if bound_prop.is_animation() {
            return BoundElementProperty {
                name: bound_prop.name.clone(),
                binding_type: BindingType::Animation,
                security_context: SecurityContext::NONE,
                value: bound_prop.expression.clone(),
                unit: None,
                source_span: bound_prop.source_span.clone(),
                key_span: bound_prop.key_span.clone(),
                value_span: bound_prop.value_span.clone(),
            };
        }

        let parts: Vec<&str> = bound_prop.name.split(PROPERTY_PARTS_SEPARATOR).collect();
        let mut unit = None;
        let mut target: Option<(String, BindingType, SecurityContexts)> = None;

        if parts.len() > 1 {
            match parts[0] {
                ATTRIBUTE_PREFIX => {
                    let attr_name = parts[1..].join(".");
                    if !skip_validation {
                        self.validate_property_or_attribute_name(
                            &attr_name,
                            &bound_prop.source_span,
                            true,
                        );
                    }
                    let contexts = security::calc_possible_security_contexts(
                        self.schema_registry,
                        element_selector,
                        &attr_name,
                        true,
                    );
                    let attr_name = match attr_name.split_once(':') {
                        Some((ns, name)) => merge_ns_and_name(Some(ns), name),
                        None => attr_name,
                    };
                    target = Some((attr_name, BindingType::Attribute, contexts));
                }
                CLASS_PREFIX => {
                    target = Some((
                        parts[1].to_string(),
                        BindingType::Class,
                        SecurityContexts::from_elem(SecurityContext::NONE, 1),
                    ));
                }
                STYLE_PREFIX => {
                    unit = parts.get(2).map(|unit| unit.to_string());
                    target = Some((
                        parts[1].to_string(),
                        BindingType::Style,
                        SecurityContexts::from_elem(SecurityContext::STYLE, 1),
                    ));
                }
                _ => {}
            }
        }

        let (name, binding_type, contexts) = match target {
            Some(target) => target,
            None => {
                let mapped_prop_name = self.schema_registry.get_mapped_prop_name(&bound_prop.name);
                let contexts = security::calc_possible_security_contexts(
                    self.schema_registry,
                    element_selector,
                    &mapped_prop_name,
                    false,
                );
                if !skip_validation {
                    self.validate_property_or_attribute_name(
                        &mapped_prop_name,
                        &bound_prop.source_span,
                        false,
                    );
                }
                let name = if map_property_name {
                    mapped_prop_name
                } else {
                    bound_prop.name.clone()
                };
                (name, BindingType::Property, contexts)
            }
        };

        BoundElementProperty {
            name,
            binding_type,
            security_context: contexts.first().copied().unwrap_or_default(),
            value: bound_prop.expression.clone(),
            unit,
            source_span: bound_prop.source_span.clone(),
            key_span: bound_prop.key_span.clone(),
            value_span: bound_prop.value_span.clone(),
        }
    }

    /// `(name)="expression"`, `on-name`, `(@trigger.phase)`, and the
    /// `<name>Change` half of a two-way binding (`is_assignment_event`).
    pub fn parse_event(
        &mut self,
        name: &str,
        expression: &str,
        is_assignment_event: bool,
        source_span: &ParseSourceSpan,
        handler_span: &ParseSourceSpan,
        target_matchable_attrs: &mut Vec<MatchableAttr>,
        target_events: &mut Vec<ParsedEvent>,
        key_span: &ParseSourceSpan,
    ) {
        if name.is_empty() {
            self.report_error("Event name is missing in binding", source_span, ParseErrorLevel::Error);
        }

        match name.strip_prefix(ANIMATION_LABEL) {
            Some(name) => {
                let key_span = key_span.trim_start(1);
                self.parse_animation_event(
                    name,
                    expression,
                    is_assignment_event,
                    source_span,
                    handler_span,
                    target_events,
                    &key_span,
                );
            }
            None => self.parse_regular_event(
                name,
                expression,
                is_assignment_event,
                source_span,
                handler_span,
                target_matchable_attrs,
                target_events,
                key_span,
            ),
        }
    }

    /// Security contexts of `prop_name` on `selector`, after mapping the name
    /// through the schema.
    pub fn calc_possible_security_contexts(
        &self,
        selector: &str,
        prop_name: &str,
        is_attribute: bool,
    ) -> SecurityContexts {
        let prop = self.schema_registry.get_mapped_prop_name(prop_name);
        security::calc_possible_security_contexts(self.schema_registry, selector, &prop, is_attribute)
    }

    fn parse_animation_event(
        &mut self,
        name: &str,
        expression: &str,
        is_assignment_event: bool,
        source_span: &ParseSourceSpan,
        handler_span: &ParseSourceSpan,
        target_events: &mut Vec<ParsedEvent>,
        key_span: &ParseSourceSpan,
    ) {
        let (event_name, phase) = split_at_period(name, (Some(name), Some("")));
        let event_name = event_name.unwrap_or_default().to_string();
        let phase = phase.unwrap_or_default().to_lowercase();
        let ast = self.parse_action(expression, is_assignment_event, handler_span);
        target_events.push(ParsedEvent {
            name: event_name.clone(),
            target_or_phase: Some(phase.clone()),
            event_type: ParsedEventType::Animation,
            handler: ast,
            source_span: source_span.clone(),
            handler_span: handler_span.clone(),
            key_span: key_span.clone(),
        });

        if event_name.is_empty() {
            self.report_error(
                "Animation event name is missing in binding",
                source_span,
                ParseErrorLevel::Error,
            );
        }
        if phase.is_empty() {
            self.report_error(
                format!(
                    "The animation trigger output event (@{}) is missing its phase value name (start or done are currently supported)",
                    event_name
                ),
                source_span,
                ParseErrorLevel::Error,
            );
        } else if phase != "start" && phase != "done" {
            self.report_error(
                format!(
                    "The provided animation output phase value \"{}\" for \"@{}\" is not supported (use start or done)",
                    phase, event_name
                ),
                source_span,
                ParseErrorLevel::Error,
            );
        }
    }

    fn parse_regular_event(
        &mut self,
        name: &str,
        expression: &str,
        is_assignment_event: bool,
        source_span: &ParseSourceSpan,
        handler_span: &ParseSourceSpan,
        target_matchable_attrs: &mut Vec<MatchableAttr>,
        target_events: &mut Vec<ParsedEvent>,
        key_span: &ParseSourceSpan,
    ) {
        // long format: 'target: eventName'
        let (target, event_name) = split_at_colon(name, (None, Some(name)));
        let prev_error_count = self.errors.len();
        let ast = self.parse_action(expression, is_assignment_event, handler_span);
        let is_valid = self.errors.len() == prev_error_count;
        target_matchable_attrs.push((name.to_string(), ast.source_text().to_string()));

        if is_assignment_event && is_valid && !is_allowed_assignment_event(&ast.ast) {
            self.report_error(
                "Unsupported expression in a two-way binding",
                source_span,
                ParseErrorLevel::Error,
            );
        }

        target_events.push(ParsedEvent {
            name: event_name.unwrap_or_default().to_string(),
            target_or_phase: target.map(str::to_string),
            event_type: if is_assignment_event {
                ParsedEventType::TwoWay
            } else {
                ParsedEventType::Regular
            },
            handler: ast,
            source_span: source_span.clone(),
            handler_span: handler_span.clone(),
            key_span: key_span.clone(),
        });
    }

    fn parse_action(
        &mut self,
        value: &str,
        is_assignment_event: bool,
        source_span: &ParseSourceSpan,
    ) -> ASTWithSource {
        let source_info = source_span.start.to_string();
        let absolute_offset = source_span.start.offset;
        match self.expr_parser.parse_action(
            value,
            is_assignment_event,
            &source_info,
            absolute_offset,
            &self.config.interpolation,
        ) {
            Ok(ast) => {
                self.report_expression_parser_errors(&ast.errors, source_span);
                if ast.ast.is_empty_expr() {
                    self.report_error(
                        "Empty expressions are not allowed",
                        source_span,
                        ParseErrorLevel::Error,
                    );
                    return self.wrap_error(&source_info, absolute_offset);
                }
                ast
            }
            Err(err) => self.recover(err, source_span, &source_info, absolute_offset),
        }
    }

    /// Single mutation point of the error sink.
    pub fn report_error(
        &mut self,
        message: impl Into<String>,
        source_span: &ParseSourceSpan,
        level: ParseErrorLevel,
    ) {
        let message = message.into();
        debug!(location = %source_span.start, ?level, "{}", message);
        self.errors.report(source_span, message, level);
    }

    /// Reports every expression parser error, anchored to `source_span`.
    pub fn report_expression_parser_errors(
        &mut self,
        errors: &[ParserError],
        source_span: &ParseSourceSpan,
    ) {
        for error in errors {
            self.report_error(error.message.as_str(), source_span, ParseErrorLevel::Error);
        }
    }

    fn validate_property_or_attribute_name(
        &mut self,
        prop_name: &str,
        source_span: &ParseSourceSpan,
        is_attr: bool,
    ) {
        let report = if is_attr {
            self.schema_registry.validate_attribute(prop_name)
        } else {
            self.schema_registry.validate_property(prop_name)
        };
        if report.error {
            self.report_error(report.msg.unwrap_or_default(), source_span, ParseErrorLevel::Error);
        }
    }

    /// Reports an adapter failure and answers with the `"ERROR"` placeholder.
    fn recover(
        &mut self,
        err: ExpressionError,
        source_span: &ParseSourceSpan,
        source_info: &str,
        absolute_offset: usize,
    ) -> ASTWithSource {
        self.report_error(err.to_string(), source_span, ParseErrorLevel::Error);
        self.wrap_error(source_info, absolute_offset)
    }

    fn wrap_error(&self, source_info: &str, absolute_offset: usize) -> ASTWithSource {
        self.expr_parser
            .wrap_literal_primitive(Some(ERROR_PLACEHOLDER), source_info, absolute_offset)
    }
}

/// Collects the pipes used by an expression, keyed by pipe name.
#[derive(Debug, Default)]
pub struct PipeCollector {
    pub pipes: IndexMap<String, BindingPipe>,
}

impl PipeCollector {
    pub fn new() -> Self {
        PipeCollector::default()
    }

    pub fn collect(ast: &AST) -> IndexMap<String, BindingPipe> {
        let mut collector = PipeCollector::new();
        collector.visit(ast);
        collector.pipes
    }
}

impl RecursiveAstVisitor for PipeCollector {
    fn visit_pipe(&mut self, pipe: &BindingPipe) {
        self.pipes.insert(pipe.name.clone(), pipe.clone());
        self.visit(&pipe.exp);
        self.visit_all(&pipe.args);
    }
}

/// Two-way bindings write back to their target, so the handler has to be
/// something assignable: a property or keyed read, optionally wrapped in
/// `!` or `$any(...)`.
fn is_allowed_assignment_event(ast: &AST) -> bool {
    match ast {
        AST::NonNullAssert(assert) => is_allowed_assignment_event(&assert.expression),
        AST::Call(call) if call.args.len() == 1 => match call.receiver.as_ref() {
            AST::PropertyRead(read) if read.name == "$any" && read.receiver.is_implicit_receiver() => {
                is_allowed_assignment_event(&call.args[0])
            }
            _ => false,
        },
        AST::PropertyRead(read) => !has_recursive_safe_receiver(&read.receiver),
        AST::KeyedRead(read) => !has_recursive_safe_receiver(&read.receiver),
        _ => false,
    }
}

fn has_recursive_safe_receiver(ast: &AST) -> bool {
    match ast {
        AST::SafePropertyRead(_) | AST::SafeKeyedRead(_) | AST::SafeCall(_) => true,
        AST::PropertyRead(read) => has_recursive_safe_receiver(&read.receiver),
        AST::KeyedRead(read) => has_recursive_safe_receiver(&read.receiver),
        AST::Call(call) => has_recursive_safe_receiver(&call.receiver),
        AST::NonNullAssert(assert) => has_recursive_safe_receiver(&assert.expression),
        _ => false,
    }
}

/// Re-anchors `source_span` onto an absolute range reported by the
/// expression parser.
pub fn move_parse_source_span(
    source_span: &ParseSourceSpan,
    absolute_span: AbsoluteSourceSpan,
) -> ParseSourceSpan {
    source_span.move_to(absolute_span.start, absolute_span.end)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
    }
}
