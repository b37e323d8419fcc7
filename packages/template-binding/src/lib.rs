#![deny(clippy::all)]
#![allow(clippy::too_many_arguments)]

/**
 * Template Binding Parser
 *
 * Parses the binding syntax found in template attributes (property, event,
 * two-way and animation bindings, `*` micro-syntax and interpolation) into
 * span-tracked records, collecting diagnostics instead of failing.
 */

// Core modules
pub mod chars;
pub mod config;
pub mod core;
pub mod error;
pub mod parse_util;
pub mod selector;
pub mod util;

// Parser modules
pub mod expression_parser;
pub mod ml_parser;
pub mod schema;
pub mod template_parser;

// Re-exports
pub use config::BindingParserConfig;
pub use core::SecurityContext;
pub use error::{ConfigError, ExpressionError, SelectorError};
pub use expression_parser::{ExpressionAdapter, Parser as ExpressionParser};
pub use parse_util::{ErrorSink, ParseError, ParseErrorLevel, ParseLocation, ParseSourceFile, ParseSourceSpan};
pub use schema::{DomElementSchemaRegistry, ElementSchemaRegistry};
pub use template_parser::{bind_elements, BindingParser, BoundElement, ElementBindings, TemplateAttribute};
