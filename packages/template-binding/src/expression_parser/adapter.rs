//! Expression Adapter
//!
//! Seam between the binding parser and an expression grammar. The binding
//! parser only ever talks to this trait; [`super::Parser`] is the default
//! implementation.
//!
//! Grammar errors are data: they travel in `ASTWithSource::errors` (or
//! `TemplateBindingParseResult::errors`). `Err` is reserved for an adapter
//! that could not produce any AST, and is turned into a diagnostic plus an
//! `"ERROR"` placeholder by the caller.

use super::ast::{ASTWithSource, TemplateBindingParseResult};
use crate::error::Result;
use crate::ml_parser::InterpolationConfig;

pub trait ExpressionAdapter {
    /// Full binding grammar, pipes included.
    fn parse_binding(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> Result<ASTWithSource>;

    /// Host binding grammar (no pipes).
    fn parse_simple_binding(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> Result<ASTWithSource>;

    /// Event handler grammar.
    fn parse_action(
        &self,
        input: &str,
        is_assignment_event: bool,
        location: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> Result<ASTWithSource>;

    /// `Ok(None)` when `input` contains no interpolation.
    fn parse_interpolation(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> Result<Option<ASTWithSource>>;

    fn parse_interpolation_expression(
        &self,
        expression: &str,
        location: &str,
        absolute_offset: usize,
    ) -> Result<ASTWithSource>;

    fn parse_template_bindings(
        &self,
        template_key: &str,
        template_value: &str,
        location: &str,
        absolute_key_offset: usize,
        absolute_value_offset: usize,
    ) -> Result<TemplateBindingParseResult>;

    /// Literal string (or `null` for `None`) wrapped as an expression.
    fn wrap_literal_primitive(
        &self,
        value: Option<&str>,
        location: &str,
        absolute_offset: usize,
    ) -> ASTWithSource;
}
