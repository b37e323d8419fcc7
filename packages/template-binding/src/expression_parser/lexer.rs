/**
 * Binding Expression Lexer
 *
 * Splits binding and action source text into tokens. Lexical problems are
 * returned as `Error` tokens so the parser can report them in place.
 */

use serde::{Deserialize, Serialize};

use crate::chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TokenType {
    Character = 0,
    Identifier = 1,
    PrivateIdentifier = 2,
    Keyword = 3,
    String = 4,
    Operator = 5,
    Number = 6,
    Error = 7,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub index: usize,
    pub end: usize,
    pub token_type: TokenType,
    pub num_value: f64,
    pub str_value: String,
}

impl Token {
    pub fn new(index: usize, end: usize, token_type: TokenType, num_value: f64, str_value: String) -> Self {
        Token {
            index,
            end,
            token_type,
            num_value,
            str_value,
        }
    }

    pub fn operator(index: usize, end: usize, str_value: &str) -> Self {
        Token::new(index, end, TokenType::Operator, 0.0, str_value.to_string())
    }

    pub fn is_character(&self, code: char) -> bool {
        self.token_type == TokenType::Character && self.str_value.chars().next() == Some(code)
    }

    pub fn is_number(&self) -> bool {
        self.token_type == TokenType::Number
    }

    pub fn is_string(&self) -> bool {
        self.token_type == TokenType::String
    }

    pub fn is_identifier(&self) -> bool {
        self.token_type == TokenType::Identifier
    }

    pub fn is_keyword(&self) -> bool {
        self.token_type == TokenType::Keyword
    }

    pub fn is_private_identifier(&self) -> bool {
        self.token_type == TokenType::PrivateIdentifier
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.token_type == TokenType::Operator && self.str_value == operator
    }

    pub fn is_keyword_named(&self, keyword: &str) -> bool {
        self.token_type == TokenType::Keyword && self.str_value == keyword
    }

    pub fn is_keyword_let(&self) -> bool {
        self.is_keyword_named("let")
    }

    pub fn is_keyword_as(&self) -> bool {
        self.is_keyword_named("as")
    }

    pub fn is_error(&self) -> bool {
        self.token_type == TokenType::Error
    }

    pub fn text(&self) -> String {
        match self.token_type {
            TokenType::Number => self.num_value.to_string(),
            _ => self.str_value.clone(),
        }
    }
}

const KEYWORDS: &[&str] = &[
    "var", "let", "as", "null", "undefined", "true", "false", "if", "else", "this",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Lexer
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        Scanner::new(text).scan()
    }
}

struct Scanner<'a> {
    input: &'a str,
    length: usize,
    index: usize,
    peek: char,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Scanner {
            input,
            length: input.len(),
            index: 0,
            peek: input.chars().next().unwrap_or(chars::EOF),
        }
    }

    fn scan(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.scan_token() {
            tokens.push(token);
        }
        tokens
    }

    fn advance(&mut self) {
        self.index += self.peek.len_utf8();
        self.peek = self.input[self.index.min(self.length)..]
            .chars()
            .next()
            .unwrap_or(chars::EOF);
    }

    fn scan_token(&mut self) -> Option<Token> {
        while self.index < self.length && chars::is_whitespace(self.peek) {
            self.advance();
        }
        if self.index >= self.length {
            return None;
        }

        let start = self.index;
        let ch = self.peek;

        if chars::is_identifier_start(ch) {
            return Some(self.scan_identifier());
        }
        if chars::is_digit(ch) {
            return Some(self.scan_number(start));
        }

        let token = match ch {
            chars::PERIOD => {
                self.advance();
                if chars::is_digit(self.peek) {
                    self.scan_number(start)
                } else {
                    Token::new(start, self.index, TokenType::Character, ch as u32 as f64, ch.to_string())
                }
            }
            chars::LPAREN | chars::RPAREN | chars::LBRACE | chars::RBRACE | chars::LBRACKET
            | chars::RBRACKET | chars::COMMA | chars::COLON | chars::SEMICOLON => {
                self.advance();
                Token::new(start, self.index, TokenType::Character, ch as u32 as f64, ch.to_string())
            }
            chars::SQ | chars::DQ => self.scan_string(ch),
            chars::HASH => self.scan_private_identifier(),
            chars::PLUS | chars::MINUS | chars::STAR | chars::SLASH | chars::PERCENT | chars::CARET => {
                self.advance();
                Token::operator(start, self.index, &ch.to_string())
            }
            chars::QUESTION => self.scan_question(start),
            chars::LT | chars::GT => self.scan_complex_operator(start, &[chars::EQ]),
            chars::BANG | chars::EQ => self.scan_complex_operator(start, &[chars::EQ, chars::EQ]),
            chars::AMPERSAND => self.scan_complex_operator(start, &[chars::AMPERSAND]),
            chars::BAR => self.scan_complex_operator(start, &[chars::BAR]),
            _ => {
                self.advance();
                self.error(start, format!("Unexpected character [{}]", ch))
            }
        };
        Some(token)
    }

    fn error(&self, position: usize, message: String) -> Token {
        Token::new(
            position,
            self.index,
            TokenType::Error,
            0.0,
            format!("Lexer Error: {} at column {} in expression [{}]", message, position, self.input),
        )
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.index;
        self.advance();
        while self.index < self.length && chars::is_identifier_part(self.peek) {
            self.advance();
        }

        let str_value = self.input[start..self.index].to_string();
        let token_type = if KEYWORDS.contains(&str_value.as_str()) {
            TokenType::Keyword
        } else {
            TokenType::Identifier
        };
        Token::new(start, self.index, token_type, 0.0, str_value)
    }

    fn scan_private_identifier(&mut self) -> Token {
        let start = self.index;
        self.advance();
        if !chars::is_identifier_start(self.peek) {
            return self.error(start, "Invalid character [#]".to_string());
        }
        while self.index < self.length && chars::is_identifier_part(self.peek) {
            self.advance();
        }
        let str_value = self.input[start..self.index].to_string();
        Token::new(start, self.index, TokenType::PrivateIdentifier, 0.0, str_value)
    }

    fn scan_number(&mut self, start: usize) -> Token {
        while self.index < self.length {
            if chars::is_digit(self.peek) || self.peek == chars::PERIOD {
                self.advance();
            } else if self.peek == 'e' || self.peek == 'E' {
                self.advance();
                if self.peek == chars::PLUS || self.peek == chars::MINUS {
                    self.advance();
                }
                if !chars::is_digit(self.peek) {
                    return self.error(self.index, "Invalid exponent".to_string());
                }
            } else {
                break;
            }
        }

        let text = &self.input[start..self.index];
        match text.parse::<f64>() {
            Ok(value) => Token::new(start, self.index, TokenType::Number, value, text.to_string()),
            Err(_) => self.error(start, format!("Invalid number [{}]", text)),
        }
    }

    fn scan_string(&mut self, quote: char) -> Token {
        let start = self.index;
        self.advance();

        let mut buffer = String::new();
        while self.index < self.length {
            let ch = self.peek;
            if ch == quote {
                self.advance();
                return Token::new(start, self.index, TokenType::String, 0.0, buffer);
            }
            if ch != chars::BACKSLASH {
                buffer.push(ch);
                self.advance();
                continue;
            }

            self.advance();
            if self.peek == 'u' {
                let hex_start = self.index + 1;
                let hex = self.input.get(hex_start..hex_start + 4).unwrap_or_default();
                match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        buffer.push(decoded);
                        for _ in 0..5 {
                            self.advance();
                        }
                    }
                    _ => return self.error(self.index, format!("Invalid unicode escape [\\u{}]", hex)),
                }
            } else {
                buffer.push(match self.peek {
                    'n' => '\n',
                    'f' => '\x0c',
                    'r' => '\r',
                    't' => '\t',
                    'v' => '\x0b',
                    other => other,
                });
                self.advance();
            }
        }

        self.error(start, "Unterminated quote".to_string())
    }

    fn scan_question(&mut self, start: usize) -> Token {
        self.advance();
        let operator = match self.peek {
            chars::PERIOD => "?.",
            chars::QUESTION => "??",
            _ => return Token::operator(start, self.index, "?"),
        };
        self.advance();
        Token::operator(start, self.index, operator)
    }

    /// Scans the current operator character followed greedily by as many of `rest` as match in order,
    /// e.g. `!`, `!=`, `!==`.
    fn scan_complex_operator(&mut self, start: usize, rest: &[char]) -> Token {
        self.advance();
        for &expected in rest {
            if self.peek != expected {
                break;
            }
            self.advance();
        }
        Token::operator(start, self.index, &self.input[start..self.index])
    }
}
