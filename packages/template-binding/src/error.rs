//! Error types
//!
//! Parse diagnostics are data (see [`crate::parse_util::ParseError`]); the
//! types here cover failures that cross an API boundary and are converted
//! into diagnostics by the caller.

use thiserror::Error;

/// Failure of an expression adapter that could not produce any AST at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("{message}")]
    Internal { message: String },

    #[error("Unsupported expression input: {0}")]
    Unsupported(String),
}

impl ExpressionError {
    pub fn internal(message: impl Into<String>) -> Self {
        ExpressionError::Internal { message: message.into() }
    }
}

/// Failure while parsing a CSS element selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("Nesting :not in a selector is not allowed")]
    NestedNot,

    #[error("Multiple selectors in :not are not supported")]
    MultipleNot,

    #[error("Error in attribute selector \"{0}\". Unescaped \"$\" is not supported. Please escape with \"\\$\".")]
    UnescapedDollar(String),
}

/// Invalid configuration supplied by the host.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Expected '{0}' to be an array, [start, end].")]
    InterpolationArity(String),

    #[error("['{start}', '{end}'] contains unusable interpolation symbol.")]
    UnusableInterpolation { start: String, end: String },

    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = ExpressionError> = std::result::Result<T, E>;
