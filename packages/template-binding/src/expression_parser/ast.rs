//! Expression AST
//!
//! Nodes produced by the expression parser. Every node carries a span
//! relative to the parsed input and an absolute span in the template.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Span relative to the start of the parsed expression input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParseSpan {
    pub start: usize,
    pub end: usize,
}

impl ParseSpan {
    pub fn new(start: usize, end: usize) -> Self {
        ParseSpan { start, end }
    }

    pub fn to_absolute(&self, absolute_offset: usize) -> AbsoluteSourceSpan {
        AbsoluteSourceSpan::new(absolute_offset + self.start, absolute_offset + self.end)
    }
}

/// Span in template coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsoluteSourceSpan {
    pub start: usize,
    pub end: usize,
}

impl AbsoluteSourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        AbsoluteSourceSpan { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyExpr {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplicitReceiver {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
}

/// Explicit `this`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThisReceiver {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
}

/// `a; b` (actions only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub expressions: Vec<AST>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub condition: Box<AST>,
    pub true_exp: Box<AST>,
    pub false_exp: Box<AST>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRead {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafePropertyRead {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyWrite {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
    pub value: Box<AST>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedRead {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub key: Box<AST>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeKeyedRead {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub key: Box<AST>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedWrite {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub key: Box<AST>,
    pub value: Box<AST>,
}

/// `exp | name:arg1:arg2`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingPipe {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub exp: Box<AST>,
    pub name: String,
    pub args: Vec<AST>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::String(value) => f.write_str(value),
            LiteralValue::Number(value) => write!(f, "{}", value),
            LiteralValue::Boolean(value) => write!(f, "{}", value),
            LiteralValue::Null => f.write_str("null"),
            LiteralValue::Undefined => f.write_str("undefined"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralPrimitive {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub value: LiteralValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralArray {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub expressions: Vec<AST>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralMapKey {
    pub key: String,
    pub quoted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralMap {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub keys: Vec<LiteralMapKey>,
    pub values: Vec<AST>,
}

/// Text interspersed with expressions; `strings.len() == expressions.len() + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpolation {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub strings: Vec<String>,
    pub expressions: Vec<AST>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub operation: String,
    pub left: Box<AST>,
    pub right: Box<AST>,
}

/// Unary `+` / `-`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unary {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub operator: String,
    pub expr: Box<AST>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixNot {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub expression: Box<AST>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonNullAssert {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub expression: Box<AST>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub args: Vec<AST>,
    pub argument_span: AbsoluteSourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeCall {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub args: Vec<AST>,
    pub argument_span: AbsoluteSourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AST {
    EmptyExpr(EmptyExpr),
    ImplicitReceiver(ImplicitReceiver),
    ThisReceiver(ThisReceiver),
    Chain(Chain),
    Conditional(Conditional),
    PropertyRead(PropertyRead),
    SafePropertyRead(SafePropertyRead),
    PropertyWrite(PropertyWrite),
    KeyedRead(KeyedRead),
    SafeKeyedRead(SafeKeyedRead),
    KeyedWrite(KeyedWrite),
    BindingPipe(BindingPipe),
    LiteralPrimitive(LiteralPrimitive),
    LiteralArray(LiteralArray),
    LiteralMap(LiteralMap),
    Interpolation(Interpolation),
    Binary(Binary),
    Unary(Unary),
    PrefixNot(PrefixNot),
    NonNullAssert(NonNullAssert),
    Call(Call),
    SafeCall(SafeCall),
}

macro_rules! each_node {
    ($ast:expr, $node:ident => $body:expr) => {
        match $ast {
            AST::EmptyExpr($node) => $body,
            AST::ImplicitReceiver($node) => $body,
            AST::ThisReceiver($node) => $body,
            AST::Chain($node) => $body,
            AST::Conditional($node) => $body,
            AST::PropertyRead($node) => $body,
            AST::SafePropertyRead($node) => $body,
            AST::PropertyWrite($node) => $body,
            AST::KeyedRead($node) => $body,
            AST::SafeKeyedRead($node) => $body,
            AST::KeyedWrite($node) => $body,
            AST::BindingPipe($node) => $body,
            AST::LiteralPrimitive($node) => $body,
            AST::LiteralArray($node) => $body,
            AST::LiteralMap($node) => $body,
            AST::Interpolation($node) => $body,
            AST::Binary($node) => $body,
            AST::Unary($node) => $body,
            AST::PrefixNot($node) => $body,
            AST::NonNullAssert($node) => $body,
            AST::Call($node) => $body,
            AST::SafeCall($node) => $body,
        }
    };
}

impl AST {
    pub fn span(&self) -> ParseSpan {
        each_node!(self, node => node.span)
    }

    pub fn source_span(&self) -> AbsoluteSourceSpan {
        each_node!(self, node => node.source_span)
    }

    pub fn is_empty_expr(&self) -> bool {
        matches!(self, AST::EmptyExpr(_))
    }

    pub fn is_implicit_receiver(&self) -> bool {
        matches!(self, AST::ImplicitReceiver(_) | AST::ThisReceiver(_))
    }

    pub fn empty(span: ParseSpan, source_span: AbsoluteSourceSpan) -> AST {
        AST::EmptyExpr(EmptyExpr { span, source_span })
    }

    pub fn literal(span: ParseSpan, source_span: AbsoluteSourceSpan, value: LiteralValue) -> AST {
        AST::LiteralPrimitive(LiteralPrimitive {
            span,
            source_span,
            value,
        })
    }
}

/// Diagnostic from the expression parser. `message` is fully formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserError {
    pub message: String,
    pub input: String,
    pub err_location: String,
    pub ctx_location: Option<String>,
}

impl ParserError {
    pub fn new(
        message: &str,
        input: &str,
        err_location: impl Into<String>,
        ctx_location: Option<&str>,
    ) -> Self {
        let err_location = err_location.into();
        let formatted = match ctx_location {
            Some(ctx) => format!("Parser Error: {} {} [{}] in {}", message, err_location, input, ctx),
            None => format!("Parser Error: {} {} [{}]", message, err_location, input),
        };
        ParserError {
            message: formatted,
            input: input.to_string(),
            err_location,
            ctx_location: ctx_location.map(str::to_string),
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A parsed expression together with its source text and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ASTWithSource {
    pub ast: AST,
    pub source: Option<String>,
    pub location: String,
    pub absolute_offset: usize,
    pub errors: Vec<ParserError>,
}

impl ASTWithSource {
    pub fn new(
        ast: AST,
        source: Option<String>,
        location: impl Into<String>,
        absolute_offset: usize,
        errors: Vec<ParserError>,
    ) -> Self {
        ASTWithSource {
            ast,
            source,
            location: location.into(),
            absolute_offset,
            errors,
        }
    }

    pub fn source_text(&self) -> &str {
        self.source.as_deref().unwrap_or_default()
    }

    pub fn source_span(&self) -> AbsoluteSourceSpan {
        self.ast.source_span()
    }
}

/// Identifier of a micro-syntax binding key or `let` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateBindingIdentifier {
    pub source: String,
    pub span: AbsoluteSourceSpan,
}

/// `let item`, `let i = index` or `exp as alias`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableBinding {
    pub source_span: AbsoluteSourceSpan,
    pub key: TemplateBindingIdentifier,
    pub value: Option<TemplateBindingIdentifier>,
}

/// `key: exp`, or a bare key with no value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionBinding {
    pub source_span: AbsoluteSourceSpan,
    pub key: TemplateBindingIdentifier,
    pub value: Option<ASTWithSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TemplateBinding {
    Variable(VariableBinding),
    Expression(ExpressionBinding),
}

impl TemplateBinding {
    pub fn key(&self) -> &TemplateBindingIdentifier {
        match self {
            TemplateBinding::Variable(binding) => &binding.key,
            TemplateBinding::Expression(binding) => &binding.key,
        }
    }

    pub fn source_span(&self) -> AbsoluteSourceSpan {
        match self {
            TemplateBinding::Variable(binding) => binding.source_span,
            TemplateBinding::Expression(binding) => binding.source_span,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateBindingParseResult {
    pub template_bindings: Vec<TemplateBinding>,
    pub warnings: Vec<String>,
    pub errors: Vec<ParserError>,
}

/// Depth-first walk over an AST. Override a hook to act on one node kind;
/// call [`walk_ast`] (or the default method) to keep descending.
pub trait RecursiveAstVisitor {
    fn visit(&mut self, ast: &AST) {
        walk_ast(self, ast);
    }

    fn visit_pipe(&mut self, pipe: &BindingPipe) {
        self.visit(&pipe.exp);
        self.visit_all(&pipe.args);
    }

    fn visit_all(&mut self, asts: &[AST]) {
        for ast in asts {
            self.visit(ast);
        }
    }
}

pub fn walk_ast<V: RecursiveAstVisitor + ?Sized>(visitor: &mut V, ast: &AST) {
    match ast {
        AST::EmptyExpr(_)
        | AST::ImplicitReceiver(_)
        | AST::ThisReceiver(_)
        | AST::LiteralPrimitive(_) => {}
        AST::Chain(node) => visitor.visit_all(&node.expressions),
        AST::Conditional(node) => {
            visitor.visit(&node.condition);
            visitor.visit(&node.true_exp);
            visitor.visit(&node.false_exp);
        }
        AST::PropertyRead(node) => visitor.visit(&node.receiver),
        AST::SafePropertyRead(node) => visitor.visit(&node.receiver),
        AST::PropertyWrite(node) => {
            visitor.visit(&node.receiver);
            visitor.visit(&node.value);
        }
        AST::KeyedRead(node) => {
            visitor.visit(&node.receiver);
            visitor.visit(&node.key);
        }
        AST::SafeKeyedRead(node) => {
            visitor.visit(&node.receiver);
            visitor.visit(&node.key);
        }
        AST::KeyedWrite(node) => {
            visitor.visit(&node.receiver);
            visitor.visit(&node.key);
            visitor.visit(&node.value);
        }
        AST::BindingPipe(node) => visitor.visit_pipe(node),
        AST::LiteralArray(node) => visitor.visit_all(&node.expressions),
        AST::LiteralMap(node) => visitor.visit_all(&node.values),
        AST::Interpolation(node) => visitor.visit_all(&node.expressions),
        AST::Binary(node) => {
            visitor.visit(&node.left);
            visitor.visit(&node.right);
        }
        AST::Unary(node) => visitor.visit(&node.expr),
        AST::PrefixNot(node) => visitor.visit(&node.expression),
        AST::NonNullAssert(node) => visitor.visit(&node.expression),
        AST::Call(node) => {
            visitor.visit(&node.receiver);
            visitor.visit_all(&node.args);
        }
        AST::SafeCall(node) => {
            visitor.visit(&node.receiver);
            visitor.visit_all(&node.args);
        }
    }
}
