//! Expression Parser Module
//!
//! AST, lexer, default parser and the adapter trait the binding parser
//! consumes.

pub mod adapter;
pub mod ast;
pub mod lexer;
pub mod parser;

pub use adapter::ExpressionAdapter;
pub use ast::*;
pub use lexer::{Lexer, Token, TokenType};
pub use parser::{InterpolationPiece, ParseFlags, Parser, SplitInterpolation};
