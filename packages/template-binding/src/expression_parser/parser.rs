/**
 * Binding Expression Parser
 *
 * Recursive descent parser for binding, action, interpolation and
 * micro-syntax expressions. Parsing never aborts: problems are recorded as
 * `ParserError`s, the offending tokens are skipped and an `EmptyExpr` stands
 * in for whatever could not be parsed.
 */
use bitflags::bitflags;

use super::adapter::ExpressionAdapter;
use super::ast::*;
use super::lexer::{Lexer, Token, TokenType};
use crate::chars;
use crate::error::Result;
use crate::ml_parser::InterpolationConfig;
use crate::util::capitalize;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParseFlags: u8 {
        /// Event handler grammar: chains and assignments are allowed, pipes are not.
        const ACTION = 1 << 0;
        /// Handler of a two-way binding; must be a single expression.
        const ASSIGNMENT_EVENT = 1 << 1;
    }
}

/// Piece of an interpolated string, positioned relative to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationPiece {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitInterpolation {
    pub strings: Vec<InterpolationPiece>,
    pub expressions: Vec<InterpolationPiece>,
    /// Input offset of the first character of each expression
    pub offsets: Vec<usize>,
}

/// Default expression parser
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new() -> Self {
        Parser { lexer: Lexer::new() }
    }

    pub fn parse_action(
        &self,
        input: &str,
        is_assignment_event: bool,
        location: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> ASTWithSource {
        let mut errors = Vec::new();
        check_no_interpolation(input, location, config, &mut errors);
        let mut flags = ParseFlags::ACTION;
        if is_assignment_event {
            flags |= ParseFlags::ASSIGNMENT_EVENT;
        }
        let ast = self.parse_source(input, location, absolute_offset, flags, &mut errors);
        ASTWithSource::new(ast, Some(input.to_string()), location, absolute_offset, errors)
    }

    pub fn parse_binding(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> ASTWithSource {
        let mut errors = Vec::new();
        let ast = self.parse_binding_ast(input, location, absolute_offset, config, &mut errors);
        ASTWithSource::new(ast, Some(input.to_string()), location, absolute_offset, errors)
    }

    /// Host binding grammar: a regular binding without pipes.
    pub fn parse_simple_binding(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> ASTWithSource {
        let mut errors = Vec::new();
        let ast = self.parse_binding_ast(input, location, absolute_offset, config, &mut errors);

        let mut checker = SimpleExpressionChecker::default();
        checker.visit(&ast);
        if !checker.errors.is_empty() {
            errors.push(ParserError::new(
                &format!("Host binding expression cannot contain {}", checker.errors.join(" ")),
                input,
                location,
                None,
            ));
        }
        ASTWithSource::new(ast, Some(input.to_string()), location, absolute_offset, errors)
    }

    /// Parses `text {{ exp }} text`. `None` when the input holds no
    /// interpolation at all.
    pub fn parse_interpolation(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> Option<ASTWithSource> {
        let mut errors = Vec::new();
        let split = self.split_interpolation_into(input, location, config, &mut errors);
        if split.expressions.is_empty() {
            return None;
        }

        let expressions = split
            .expressions
            .iter()
            .zip(&split.offsets)
            .map(|(piece, &offset)| {
                let source = strip_comments(&piece.text);
                let tokens = self.lexer.tokenize(source);
                let mut parser = ParseAST::new(
                    input,
                    location,
                    absolute_offset,
                    tokens,
                    source.len(),
                    ParseFlags::empty(),
                    offset,
                );
                let ast = parser.parse_chain();
                errors.append(&mut parser.errors);
                ast
            })
            .collect();

        let strings = split.strings.into_iter().map(|piece| piece.text).collect();
        Some(interpolation_ast(strings, expressions, input, location, absolute_offset, errors))
    }

    /// Parses the whole input as the single expression of an interpolation.
    pub fn parse_interpolation_expression(
        &self,
        expression: &str,
        location: &str,
        absolute_offset: usize,
    ) -> ASTWithSource {
        let mut errors = Vec::new();
        let ast = self.parse_source(expression, location, absolute_offset, ParseFlags::empty(), &mut errors);
        let strings = vec![String::new(), String::new()];
        interpolation_ast(strings, vec![ast], expression, location, absolute_offset, errors)
    }

    /// Parses the micro-syntax value of a `*key="value"` attribute.
    pub fn parse_template_bindings(
        &self,
        template_key: &str,
        template_value: &str,
        location: &str,
        absolute_key_offset: usize,
        absolute_value_offset: usize,
    ) -> TemplateBindingParseResult {
        let tokens = self.lexer.tokenize(template_value);
        let mut parser = ParseAST::new(
            template_value,
            location,
            absolute_value_offset,
            tokens,
            template_value.len(),
            ParseFlags::empty(),
            0,
        );
        let key = TemplateBindingIdentifier {
            source: template_key.to_string(),
            span: AbsoluteSourceSpan::new(absolute_key_offset, absolute_key_offset + template_key.len()),
        };
        let template_bindings = parser.parse_template_bindings(key);
        TemplateBindingParseResult {
            template_bindings,
            warnings: Vec::new(),
            errors: parser.errors,
        }
    }

    pub fn wrap_literal_primitive(
        &self,
        value: Option<&str>,
        location: &str,
        absolute_offset: usize,
    ) -> ASTWithSource {
        let span = ParseSpan::new(0, value.map_or(0, str::len));
        let literal = match value {
            Some(value) => LiteralValue::String(value.to_string()),
            None => LiteralValue::Null,
        };
        ASTWithSource::new(
            AST::literal(span, span.to_absolute(absolute_offset), literal),
            value.map(str::to_string),
            location,
            absolute_offset,
            Vec::new(),
        )
    }

    /// Splits `input` into literal strings and interpolated expressions.
    pub fn split_interpolation(
        &self,
        input: &str,
        location: &str,
        config: &InterpolationConfig,
    ) -> (SplitInterpolation, Vec<ParserError>) {
        let mut errors = Vec::new();
        let split = self.split_interpolation_into(input, location, config, &mut errors);
        (split, errors)
    }

    fn split_interpolation_into(
        &self,
        input: &str,
        location: &str,
        config: &InterpolationConfig,
        errors: &mut Vec<ParserError>,
    ) -> SplitInterpolation {
        let (interp_start, interp_end) = (config.start.as_str(), config.end.as_str());
        let mut split = SplitInterpolation::default();
        if config.is_empty() {
            split.strings.push(InterpolationPiece {
                text: input.to_string(),
                start: 0,
                end: input.len(),
            });
            return split;
        }
        let mut i = 0;
        let mut at_interpolation = false;
        let mut extend_last_string = false;

        while i < input.len() {
            if !at_interpolation {
                let start = i;
                i = input[i..].find(interp_start).map_or(input.len(), |found| i + found);
                split.strings.push(InterpolationPiece {
                    text: input[start..i].to_string(),
                    start,
                    end: i,
                });
                at_interpolation = true;
            } else {
                let full_start = i;
                let expr_start = full_start + interp_start.len();
                let Some(expr_end) = interpolation_end_index(input, interp_end, expr_start) else {
                    at_interpolation = false;
                    extend_last_string = true;
                    break;
                };
                let full_end = expr_end + interp_end.len();
                let text = &input[expr_start..expr_end];
                if text.trim().is_empty() {
                    errors.push(ParserError::new(
                        "Blank expressions are not allowed in interpolated strings",
                        input,
                        format!("at column {} in", i),
                        Some(location),
                    ));
                }
                split.expressions.push(InterpolationPiece {
                    text: text.to_string(),
                    start: full_start,
                    end: full_end,
                });
                split.offsets.push(expr_start);
                i = full_end;
                at_interpolation = false;
            }
        }

        if !at_interpolation {
            match split.strings.last_mut() {
                Some(last) if extend_last_string => {
                    last.text.push_str(&input[i..]);
                    last.end = input.len();
                }
                _ => split.strings.push(InterpolationPiece {
                    text: input[i..].to_string(),
                    start: i,
                    end: input.len(),
                }),
            }
        }
        split
    }

    fn parse_binding_ast(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
        errors: &mut Vec<ParserError>,
    ) -> AST {
        check_no_interpolation(input, location, config, errors);
        self.parse_source(input, location, absolute_offset, ParseFlags::empty(), errors)
    }

    fn parse_source(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        flags: ParseFlags,
        errors: &mut Vec<ParserError>,
    ) -> AST {
        let source = strip_comments(input);
        let tokens = self.lexer.tokenize(source);
        let mut parser = ParseAST::new(input, location, absolute_offset, tokens, source.len(), flags, 0);
        let ast = parser.parse_chain();
        errors.append(&mut parser.errors);
        ast
    }
}

impl ExpressionAdapter for Parser {
    fn parse_binding(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> Result<ASTWithSource> {
        Ok(Parser::parse_binding(self, input, location, absolute_offset, config))
    }

    fn parse_simple_binding(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> Result<ASTWithSource> {
        Ok(Parser::parse_simple_binding(self, input, location, absolute_offset, config))
    }

    fn parse_action(
        &self,
        input: &str,
        is_assignment_event: bool,
        location: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> Result<ASTWithSource> {
        Ok(Parser::parse_action(self, input, is_assignment_event, location, absolute_offset, config))
    }

    fn parse_interpolation(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> Result<Option<ASTWithSource>> {
        Ok(Parser::parse_interpolation(self, input, location, absolute_offset, config))
    }

    fn parse_interpolation_expression(
        &self,
        expression: &str,
        location: &str,
        absolute_offset: usize,
    ) -> Result<ASTWithSource> {
        Ok(Parser::parse_interpolation_expression(self, expression, location, absolute_offset))
    }

    fn parse_template_bindings(
        &self,
        template_key: &str,
        template_value: &str,
        location: &str,
        absolute_key_offset: usize,
        absolute_value_offset: usize,
    ) -> Result<TemplateBindingParseResult> {
        Ok(Parser::parse_template_bindings(
            self,
            template_key,
            template_value,
            location,
            absolute_key_offset,
            absolute_value_offset,
        ))
    }

    fn wrap_literal_primitive(
        &self,
        value: Option<&str>,
        location: &str,
        absolute_offset: usize,
    ) -> ASTWithSource {
        Parser::wrap_literal_primitive(self, value, location, absolute_offset)
    }
}

fn interpolation_ast(
    strings: Vec<String>,
    expressions: Vec<AST>,
    input: &str,
    location: &str,
    absolute_offset: usize,
    errors: Vec<ParserError>,
) -> ASTWithSource {
    let span = ParseSpan::new(0, input.len());
    let interpolation = AST::Interpolation(Interpolation {
        span,
        source_span: span.to_absolute(absolute_offset),
        strings,
        expressions,
    });
    ASTWithSource::new(interpolation, Some(input.to_string()), location, absolute_offset, errors)
}

fn check_no_interpolation(
    input: &str,
    location: &str,
    config: &InterpolationConfig,
    errors: &mut Vec<ParserError>,
) {
    let Some(start) = input.find(config.start.as_str()) else {
        return;
    };
    if input[start + config.start.len()..].contains(config.end.as_str()) {
        errors.push(ParserError::new(
            &format!(
                "Got interpolation ({}{}) where expression was expected",
                config.start, config.end
            ),
            input,
            format!("at column {} in", start),
            Some(location),
        ));
    }
}

/// Drops a trailing `// comment` that is not inside a string literal.
fn strip_comments(input: &str) -> &str {
    match comment_start(input) {
        Some(index) => &input[..index],
        None => input,
    }
}

fn comment_start(input: &str) -> Option<usize> {
    let mut outer_quote: Option<char> = None;
    let mut chars_iter = input.char_indices().peekable();
    while let Some((index, ch)) = chars_iter.next() {
        let next = chars_iter.peek().map(|&(_, next)| next);
        if ch == chars::SLASH && next == Some(chars::SLASH) && outer_quote.is_none() {
            return Some(index);
        }
        if outer_quote == Some(ch) {
            outer_quote = None;
        } else if outer_quote.is_none() && chars::is_quote(ch) {
            outer_quote = Some(ch);
        }
    }
    None
}

/// Index of the closing marker, ignoring markers inside quotes. A comment
/// ends quote tracking: the first closing marker after it wins.
fn interpolation_end_index(input: &str, expression_end: &str, start: usize) -> Option<usize> {
    let mut current_quote: Option<char> = None;
    let mut escape_count = 0;
    for (offset, ch) in input[start..].char_indices() {
        let index = start + offset;
        if chars::is_quote(ch)
            && (current_quote.is_none() || current_quote == Some(ch))
            && escape_count % 2 == 0
        {
            current_quote = if current_quote.is_none() { Some(ch) } else { None };
        } else if current_quote.is_none() {
            if input[index..].starts_with(expression_end) {
                return Some(index);
            }
            if input[index..].starts_with("//") {
                return input[index..].find(expression_end).map(|found| index + found);
            }
        }
        escape_count = if ch == chars::BACKSLASH { escape_count + 1 } else { 0 };
    }
    None
}

#[derive(Default)]
struct SimpleExpressionChecker {
    errors: Vec<&'static str>,
}

impl RecursiveAstVisitor for SimpleExpressionChecker {
    fn visit_pipe(&mut self, _pipe: &BindingPipe) {
        self.errors.push("pipes");
    }
}

/// Parser state for one token stream.
struct ParseAST<'a> {
    input: &'a str,
    location: &'a str,
    absolute_offset: usize,
    tokens: Vec<Token>,
    input_length: usize,
    flags: ParseFlags,
    /// Position of the token stream inside `input`
    offset: usize,
    index: usize,
    rparens_expected: usize,
    rbrackets_expected: usize,
    rbraces_expected: usize,
    writable: bool,
    errors: Vec<ParserError>,
}

impl<'a> ParseAST<'a> {
    fn new(
        input: &'a str,
        location: &'a str,
        absolute_offset: usize,
        tokens: Vec<Token>,
        input_length: usize,
        flags: ParseFlags,
        offset: usize,
    ) -> Self {
        ParseAST {
            input,
            location,
            absolute_offset,
            tokens,
            input_length,
            flags,
            offset,
            index: 0,
            rparens_expected: 0,
            rbrackets_expected: 0,
            rbraces_expected: 0,
            writable: false,
            errors: Vec::new(),
        }
    }

    // ---- token cursor -------------------------------------------------

    fn next(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn at_eof(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn input_index(&self) -> usize {
        match self.next() {
            Some(token) => token.index + self.offset,
            None => self.current_end_index(),
        }
    }

    /// End of the last consumed token.
    fn current_end_index(&self) -> usize {
        if self.index > 0 {
            return self.tokens[self.index - 1].end + self.offset;
        }
        match self.tokens.first() {
            Some(token) => token.index + self.offset,
            None => self.input_length + self.offset,
        }
    }

    fn current_absolute_offset(&self) -> usize {
        self.absolute_offset + self.input_index()
    }

    fn span(&self, start: usize) -> ParseSpan {
        self.span_to(start, None)
    }

    fn span_to(&self, start: usize, artificial_end: Option<usize>) -> ParseSpan {
        let mut end = self.current_end_index();
        if let Some(artificial_end) = artificial_end {
            end = end.max(artificial_end);
        }
        if start > end {
            ParseSpan::new(end, start)
        } else {
            ParseSpan::new(start, end)
        }
    }

    fn source_span(&self, start: usize) -> AbsoluteSourceSpan {
        self.span(start).to_absolute(self.absolute_offset)
    }

    fn source_span_to(&self, start: usize, artificial_end: Option<usize>) -> AbsoluteSourceSpan {
        self.span_to(start, artificial_end).to_absolute(self.absolute_offset)
    }

    fn empty_expr(&self, start: usize) -> AST {
        AST::empty(self.span(start), self.source_span(start))
    }

    fn peek_character(&self, code: char) -> bool {
        self.next().map_or(false, |token| token.is_character(code))
    }

    fn consume_optional_character(&mut self, code: char) -> bool {
        if self.peek_character(code) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume_optional_operator(&mut self, operator: &str) -> bool {
        if self.next().map_or(false, |token| token.is_operator(operator)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek_keyword_let(&self) -> bool {
        self.next().map_or(false, Token::is_keyword_let)
    }

    fn peek_keyword_as(&self) -> bool {
        self.next().map_or(false, Token::is_keyword_as)
    }

    fn expect_character(&mut self, code: char) {
        if !self.consume_optional_character(code) {
            self.error(&format!("Missing expected {}", code));
        }
    }

    fn pretty_print_token(token: Option<&Token>) -> String {
        match token {
            Some(token) => format!("token {}", token.text()),
            None => "end of input".to_string(),
        }
    }

    fn expect_identifier_or_keyword(&mut self) -> Option<String> {
        match self.next() {
            Some(token) if token.is_identifier() || token.is_keyword() => {
                let text = token.text();
                self.advance();
                Some(text)
            }
            Some(token) if token.is_private_identifier() => {
                let text = token.text();
                self.report_private_identifier(&text, Some("expected identifier or keyword"));
                None
            }
            token => {
                let printed = Self::pretty_print_token(token);
                self.error(&format!("Unexpected {}, expected identifier or keyword", printed));
                None
            }
        }
    }

    fn expect_identifier_or_keyword_or_string(&mut self) -> String {
        match self.next() {
            Some(token) if token.is_identifier() || token.is_keyword() || token.is_string() => {
                let text = token.text();
                self.advance();
                text
            }
            Some(token) if token.is_private_identifier() => {
                let text = token.text();
                self.report_private_identifier(&text, Some("expected identifier, keyword or string"));
                String::new()
            }
            token => {
                let printed = Self::pretty_print_token(token);
                self.error(&format!(
                    "Unexpected {}, expected identifier, keyword, or string",
                    printed
                ));
                String::new()
            }
        }
    }

    fn report_private_identifier(&mut self, name: &str, extra: Option<&str>) {
        let mut message = format!(
            "Private identifiers are not supported. Unexpected private identifier: {}",
            name
        );
        if let Some(extra) = extra {
            message.push_str(", ");
            message.push_str(extra);
        }
        self.error(&message);
    }

    // ---- errors -------------------------------------------------------

    fn error(&mut self, message: &str) {
        let location = self.location_text();
        self.errors
            .push(ParserError::new(message, self.input, location, Some(self.location)));
        self.skip();
    }

    fn location_text(&self) -> String {
        match self.next() {
            Some(token) => format!("at column {} in", token.index + 1),
            None => "at the end of the expression".to_string(),
        }
    }

    /// Skips tokens up to the next recovery point: `;`, `|`, an expected
    /// closing delimiter, or `=` while parsing a writable target.
    fn skip(&mut self) {
        while let Some(token) = self.next() {
            if token.is_character(chars::SEMICOLON)
                || token.is_operator("|")
                || (self.rparens_expected > 0 && token.is_character(chars::RPAREN))
                || (self.rbraces_expected > 0 && token.is_character(chars::RBRACE))
                || (self.rbrackets_expected > 0 && token.is_character(chars::RBRACKET))
                || (self.writable && token.is_operator("="))
            {
                return;
            }
            if token.is_error() {
                let message = token.str_value.clone();
                let location = self.location_text();
                self.errors
                    .push(ParserError::new(&message, self.input, location, Some(self.location)));
            }
            self.advance();
        }
    }

    // ---- grammar ------------------------------------------------------

    fn parse_chain(&mut self) -> AST {
        let mut expressions = Vec::new();
        let start = self.input_index();
        while !self.at_eof() {
            expressions.push(self.parse_pipe());

            if self.consume_optional_character(chars::SEMICOLON) {
                if !self.flags.contains(ParseFlags::ACTION)
                    || self.flags.contains(ParseFlags::ASSIGNMENT_EVENT)
                {
                    self.error("Binding expression cannot contain chained expression");
                }
                while self.consume_optional_character(chars::SEMICOLON) {}
            } else if let Some(token) = self.next() {
                let error_index = self.index;
                let message = format!("Unexpected token '{}'", token.text());
                self.error(&message);
                if self.index == error_index {
                    break;
                }
            }
        }

        match expressions.len() {
            0 => {
                let artificial_start = self.offset;
                let artificial_end = self.offset + self.input_length;
                AST::empty(
                    self.span_to(artificial_start, Some(artificial_end)),
                    self.source_span_to(artificial_start, Some(artificial_end)),
                )
            }
            1 => expressions.remove(0),
            _ => AST::Chain(Chain {
                span: self.span(start),
                source_span: self.source_span(start),
                expressions,
            }),
        }
    }

    fn parse_pipe(&mut self) -> AST {
        let start = self.input_index();
        let mut result = self.parse_expression();
        if !self.consume_optional_operator("|") {
            return result;
        }
        if self.flags.contains(ParseFlags::ACTION) {
            self.error("Cannot have a pipe in an action expression");
        }

        loop {
            let name_start = self.input_index();
            let (name, name_span, full_span_end) = match self.expect_identifier_or_keyword() {
                Some(name) => (name, self.source_span(name_start), None),
                None => {
                    let end = self
                        .next()
                        .map_or(self.input_length + self.offset, |token| token.index + self.offset);
                    (String::new(), ParseSpan::new(end, end).to_absolute(self.absolute_offset), Some(end))
                }
            };

            let mut args = Vec::new();
            while self.consume_optional_character(chars::COLON) {
                args.push(self.parse_expression());
            }

            result = AST::BindingPipe(BindingPipe {
                span: self.span(start),
                source_span: self.source_span_to(start, full_span_end),
                name_span,
                exp: Box::new(result),
                name,
                args,
            });
            if !self.consume_optional_operator("|") {
                return result;
            }
        }
    }

    fn parse_expression(&mut self) -> AST {
        self.parse_conditional()
    }

    fn parse_conditional(&mut self) -> AST {
        let start = self.input_index();
        let result = self.parse_logical_or();
        if !self.consume_optional_operator("?") {
            return result;
        }

        let yes = self.parse_pipe();
        let no = if self.consume_optional_character(chars::COLON) {
            self.parse_pipe()
        } else {
            let end = self.input_index();
            let expression = self.input.get(start..end).unwrap_or_default().to_string();
            self.error(&format!("Conditional expression {} requires all 3 expressions", expression));
            self.empty_expr(start)
        };
        AST::Conditional(Conditional {
            span: self.span(start),
            source_span: self.source_span(start),
            condition: Box::new(result),
            true_exp: Box::new(yes),
            false_exp: Box::new(no),
        })
    }

    /// Left-associative binary level over `operators`.
    fn parse_binary(&mut self, operators: &[&str], operand: fn(&mut Self) -> AST) -> AST {
        let start = self.input_index();
        let mut result = operand(self);
        loop {
            let operator = match self.next() {
                Some(token)
                    if token.token_type == TokenType::Operator
                        && operators.contains(&token.str_value.as_str()) =>
                {
                    token.str_value.clone()
                }
                _ => return result,
            };
            self.advance();
            let right = operand(self);
            result = AST::Binary(Binary {
                span: self.span(start),
                source_span: self.source_span(start),
                operation: operator,
                left: Box::new(result),
                right: Box::new(right),
            });
        }
    }

    fn parse_logical_or(&mut self) -> AST {
        self.parse_binary(&["||"], Self::parse_logical_and)
    }

    fn parse_logical_and(&mut self) -> AST {
        self.parse_binary(&["&&"], Self::parse_nullish_coalescing)
    }

    fn parse_nullish_coalescing(&mut self) -> AST {
        self.parse_binary(&["??"], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> AST {
        self.parse_binary(&["==", "===", "!=", "!=="], Self::parse_relational)
    }

    fn parse_relational(&mut self) -> AST {
        self.parse_binary(&["<", ">", "<=", ">="], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> AST {
        self.parse_binary(&["+", "-"], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> AST {
        self.parse_binary(&["*", "%", "/"], Self::parse_prefix)
    }

    fn parse_prefix(&mut self) -> AST {
        let operator = match self.next() {
            Some(token) if token.token_type == TokenType::Operator => token.str_value.clone(),
            _ => return self.parse_call_chain(),
        };
        let start = self.input_index();
        match operator.as_str() {
            "+" | "-" => {
                self.advance();
                let expr = self.parse_prefix();
                AST::Unary(Unary {
                    span: self.span(start),
                    source_span: self.source_span(start),
                    operator,
                    expr: Box::new(expr),
                })
            }
            "!" => {
                self.advance();
                let expression = self.parse_prefix();
                AST::PrefixNot(PrefixNot {
                    span: self.span(start),
                    source_span: self.source_span(start),
                    expression: Box::new(expression),
                })
            }
            _ => self.parse_call_chain(),
        }
    }

    fn parse_call_chain(&mut self) -> AST {
        let start = self.input_index();
        let mut result = self.parse_primary();
        loop {
            if self.consume_optional_character(chars::PERIOD) {
                result = self.parse_access_member(result, start, false);
            } else if self.consume_optional_operator("?.") {
                result = if self.consume_optional_character(chars::LPAREN) {
                    self.parse_call(result, start, true)
                } else if self.consume_optional_character(chars::LBRACKET) {
                    self.parse_keyed_read_or_write(result, start, true)
                } else {
                    self.parse_access_member(result, start, true)
                };
            } else if self.consume_optional_character(chars::LBRACKET) {
                result = self.parse_keyed_read_or_write(result, start, false);
            } else if self.consume_optional_character(chars::LPAREN) {
                result = self.parse_call(result, start, false);
            } else if self.consume_optional_operator("!") {
                result = AST::NonNullAssert(NonNullAssert {
                    span: self.span(start),
                    source_span: self.source_span(start),
                    expression: Box::new(result),
                });
            } else {
                return result;
            }
        }
    }

    fn parse_primary(&mut self) -> AST {
        let start = self.input_index();
        let Some(token) = self.next().cloned() else {
            self.error(&format!("Unexpected end of expression: {}", self.input));
            return self.empty_expr(start);
        };

        if self.consume_optional_character(chars::LPAREN) {
            self.rparens_expected += 1;
            let result = self.parse_pipe();
            self.rparens_expected -= 1;
            self.expect_character(chars::RPAREN);
            return result;
        }

        if token.is_keyword() {
            let literal = match token.str_value.as_str() {
                "null" => Some(LiteralValue::Null),
                "undefined" => Some(LiteralValue::Undefined),
                "true" => Some(LiteralValue::Boolean(true)),
                "false" => Some(LiteralValue::Boolean(false)),
                _ => None,
            };
            if let Some(literal) = literal {
                self.advance();
                return AST::literal(self.span(start), self.source_span(start), literal);
            }
            if token.is_keyword_named("this") {
                self.advance();
                return AST::ThisReceiver(ThisReceiver {
                    span: self.span(start),
                    source_span: self.source_span(start),
                });
            }
        }

        if self.consume_optional_character(chars::LBRACKET) {
            self.rbrackets_expected += 1;
            let expressions = self.parse_expression_list(chars::RBRACKET);
            self.rbrackets_expected -= 1;
            self.expect_character(chars::RBRACKET);
            return AST::LiteralArray(LiteralArray {
                span: self.span(start),
                source_span: self.source_span(start),
                expressions,
            });
        }

        if token.is_character(chars::LBRACE) {
            return self.parse_literal_map();
        }

        if token.is_identifier() {
            let receiver = AST::ImplicitReceiver(ImplicitReceiver {
                span: self.span(start),
                source_span: self.source_span(start),
            });
            return self.parse_access_member(receiver, start, false);
        }

        if token.is_number() {
            self.advance();
            return AST::literal(self.span(start), self.source_span(start), LiteralValue::Number(token.num_value));
        }

        if token.is_string() {
            self.advance();
            return AST::literal(self.span(start), self.source_span(start), LiteralValue::String(token.str_value));
        }

        if token.is_private_identifier() {
            self.report_private_identifier(&token.str_value, None);
            return self.empty_expr(start);
        }

        if token.is_error() {
            let location = self.location_text();
            self.errors
                .push(ParserError::new(&token.str_value, self.input, location, Some(self.location)));
            self.advance();
            return self.empty_expr(start);
        }

        self.error(&format!("Unexpected token {}", token.text()));
        self.empty_expr(start)
    }

    fn parse_expression_list(&mut self, terminator: char) -> Vec<AST> {
        let mut result = Vec::new();
        loop {
            if self.peek_character(terminator) {
                break;
            }
            result.push(self.parse_pipe());
            if !self.consume_optional_character(chars::COMMA) {
                break;
            }
        }
        result
    }

    fn parse_literal_map(&mut self) -> AST {
        let start = self.input_index();
        let mut keys = Vec::new();
        let mut values = Vec::new();
        self.expect_character(chars::LBRACE);
        if !self.consume_optional_character(chars::RBRACE) {
            self.rbraces_expected += 1;
            loop {
                let quoted = self.next().map_or(false, Token::is_string);
                let key = self.expect_identifier_or_keyword_or_string();
                keys.push(LiteralMapKey { key, quoted });
                self.expect_character(chars::COLON);
                values.push(self.parse_pipe());
                if !self.consume_optional_character(chars::COMMA) {
                    break;
                }
            }
            self.rbraces_expected -= 1;
            self.expect_character(chars::RBRACE);
        }
        AST::LiteralMap(LiteralMap {
            span: self.span(start),
            source_span: self.source_span(start),
            keys,
            values,
        })
    }

    fn parse_access_member(&mut self, receiver: AST, start: usize, is_safe: bool) -> AST {
        let name_start = self.input_index();
        let previous = std::mem::replace(&mut self.writable, true);
        let name = self.expect_identifier_or_keyword().unwrap_or_default();
        if name.is_empty() {
            self.error("Expected identifier for property access");
        }
        self.writable = previous;
        let name_span = self.source_span(name_start);

        if is_safe {
            if self.consume_optional_operator("=") {
                self.error("The '?.' operator cannot be used in the assignment");
                return self.empty_expr(start);
            }
            return AST::SafePropertyRead(SafePropertyRead {
                span: self.span(start),
                source_span: self.source_span(start),
                name_span,
                receiver: Box::new(receiver),
                name,
            });
        }

        if self.consume_optional_operator("=") {
            if !self.flags.contains(ParseFlags::ACTION) {
                self.error("Bindings cannot contain assignments");
                return self.empty_expr(start);
            }
            let value = self.parse_conditional();
            return AST::PropertyWrite(PropertyWrite {
                span: self.span(start),
                source_span: self.source_span(start),
                name_span,
                receiver: Box::new(receiver),
                name,
                value: Box::new(value),
            });
        }

        AST::PropertyRead(PropertyRead {
            span: self.span(start),
            source_span: self.source_span(start),
            name_span,
            receiver: Box::new(receiver),
            name,
        })
    }

    fn parse_call(&mut self, receiver: AST, start: usize, is_safe: bool) -> AST {
        let argument_start = self.input_index();
        self.rparens_expected += 1;
        let args = if self.peek_character(chars::RPAREN) {
            Vec::new()
        } else {
            let mut args = vec![self.parse_pipe()];
            while self.consume_optional_character(chars::COMMA) {
                args.push(self.parse_pipe());
            }
            args
        };
        let argument_span = self
            .span_to(argument_start, Some(self.input_index()))
            .to_absolute(self.absolute_offset);
        self.expect_character(chars::RPAREN);
        self.rparens_expected -= 1;

        let (span, source_span) = (self.span(start), self.source_span(start));
        let receiver = Box::new(receiver);
        if is_safe {
            AST::SafeCall(SafeCall {
                span,
                source_span,
                receiver,
                args,
                argument_span,
            })
        } else {
            AST::Call(Call {
                span,
                source_span,
                receiver,
                args,
                argument_span,
            })
        }
    }

    fn parse_keyed_read_or_write(&mut self, receiver: AST, start: usize, is_safe: bool) -> AST {
        let previous = std::mem::replace(&mut self.writable, true);
        self.rbrackets_expected += 1;
        let key = self.parse_pipe();
        if key.is_empty_expr() {
            self.error("Key access cannot be empty");
        }
        self.rbrackets_expected -= 1;
        self.expect_character(chars::RBRACKET);
        self.writable = previous;

        if self.consume_optional_operator("=") {
            if is_safe {
                self.error("The '?.' operator cannot be used in the assignment");
                return self.empty_expr(start);
            }
            let value = self.parse_conditional();
            return AST::KeyedWrite(KeyedWrite {
                span: self.span(start),
                source_span: self.source_span(start),
                receiver: Box::new(receiver),
                key: Box::new(key),
                value: Box::new(value),
            });
        }

        let (span, source_span) = (self.span(start), self.source_span(start));
        if is_safe {
            AST::SafeKeyedRead(SafeKeyedRead {
                span,
                source_span,
                receiver: Box::new(receiver),
                key: Box::new(key),
            })
        } else {
            AST::KeyedRead(KeyedRead {
                span,
                source_span,
                receiver: Box::new(receiver),
                key: Box::new(key),
            })
        }
    }

    // ---- micro-syntax -------------------------------------------------

    /// `*ngFor="let item of items; index as i; trackBy: fn"`
    ///
    /// The first clause binds the template key itself. Later keys are
    /// prefixed with it, so `of` becomes `ngForOf`.
    fn parse_template_bindings(&mut self, template_key: TemplateBindingIdentifier) -> Vec<TemplateBinding> {
        let template_source = template_key.source.clone();
        let mut bindings = self.parse_directive_keyword_bindings(template_key);

        while !self.at_eof() {
            let index_before = self.index;
            if let Some(binding) = self.parse_let_binding() {
                bindings.push(binding);
            } else {
                let mut key = self.expect_template_binding_key();
                match self.parse_as_binding(&key) {
                    Some(binding) => bindings.push(binding),
                    None => {
                        key.source = format!("{}{}", template_source, capitalize(&key.source));
                        bindings.extend(self.parse_directive_keyword_bindings(key));
                    }
                }
            }
            self.consume_statement_terminator();
            if self.index == index_before {
                // No clause could consume the current token.
                self.advance();
            }
        }
        bindings
    }

    fn parse_directive_keyword_bindings(&mut self, key: TemplateBindingIdentifier) -> Vec<TemplateBinding> {
        self.consume_optional_character(chars::COLON);
        let value = self.directive_bound_target();
        let mut span_end = self.current_absolute_offset();
        let as_binding = self.parse_as_binding(&key);
        if as_binding.is_none() {
            self.consume_statement_terminator();
            span_end = self.current_absolute_offset();
        }

        let mut bindings = vec![TemplateBinding::Expression(ExpressionBinding {
            source_span: AbsoluteSourceSpan::new(key.span.start, span_end),
            key,
            value,
        })];
        bindings.extend(as_binding);
        bindings
    }

    /// Expression bound to a key, or `None` when the clause has no value.
    fn directive_bound_target(&mut self) -> Option<ASTWithSource> {
        if self.at_eof() || self.peek_keyword_as() || self.peek_keyword_let() {
            return None;
        }
        let ast = self.parse_pipe();
        let ParseSpan { start, end } = ast.span();
        let source = self.input.get(start..end).unwrap_or_default().to_string();
        Some(ASTWithSource::new(
            ast,
            Some(source),
            self.location,
            self.absolute_offset + start,
            Vec::new(),
        ))
    }

    /// `exp as alias`: binds `alias` to the value of `value`.
    fn parse_as_binding(&mut self, value: &TemplateBindingIdentifier) -> Option<TemplateBinding> {
        if !self.peek_keyword_as() {
            return None;
        }
        self.advance();
        let key = self.expect_template_binding_key();
        self.consume_statement_terminator();
        Some(TemplateBinding::Variable(VariableBinding {
            source_span: AbsoluteSourceSpan::new(value.span.start, self.current_absolute_offset()),
            key,
            value: Some(value.clone()),
        }))
    }

    fn parse_let_binding(&mut self) -> Option<TemplateBinding> {
        if !self.peek_keyword_let() {
            return None;
        }
        let span_start = self.current_absolute_offset();
        self.advance();
        let key = self.expect_template_binding_key();
        let value = if self.consume_optional_operator("=") {
            Some(self.expect_template_binding_key())
        } else {
            None
        };
        self.consume_statement_terminator();
        Some(TemplateBinding::Variable(VariableBinding {
            source_span: AbsoluteSourceSpan::new(span_start, self.current_absolute_offset()),
            key,
            value,
        }))
    }

    fn consume_statement_terminator(&mut self) {
        if !self.consume_optional_character(chars::SEMICOLON) {
            self.consume_optional_character(chars::COMMA);
        }
    }

    /// Identifiers, keywords or strings joined by `-`, e.g. `aria-label`.
    fn expect_template_binding_key(&mut self) -> TemplateBindingIdentifier {
        let start = self.current_absolute_offset();
        let mut source = String::new();
        loop {
            source.push_str(&self.expect_identifier_or_keyword_or_string());
            if !self.consume_optional_operator("-") {
                break;
            }
            source.push('-');
        }
        TemplateBindingIdentifier {
            span: AbsoluteSourceSpan::new(start, start + source.len()),
            source,
        }
    }
}
