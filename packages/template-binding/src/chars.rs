//! Character constants and classification helpers shared by the lexer,
//! the interpolation splitter and the source-location walker.

// Whitespace
pub const EOF: char = '\0';
pub const TAB: char = '\t';
pub const NEWLINE: char = '\n';
pub const SPACE: char = ' ';
pub const NBSP: char = '\u{00A0}';

// Quotes and escapes
pub const SQ: char = '\'';
pub const DQ: char = '"';
pub const BT: char = '`';
pub const BACKSLASH: char = '\\';

// Delimiters
pub const LPAREN: char = '(';
pub const RPAREN: char = ')';
pub const LBRACKET: char = '[';
pub const RBRACKET: char = ']';
pub const LBRACE: char = '{';
pub const RBRACE: char = '}';
pub const COMMA: char = ',';
pub const COLON: char = ':';
pub const SEMICOLON: char = ';';
pub const PERIOD: char = '.';

// Operator characters
pub const BANG: char = '!';
pub const HASH: char = '#';
pub const PERCENT: char = '%';
pub const AMPERSAND: char = '&';
pub const STAR: char = '*';
pub const PLUS: char = '+';
pub const MINUS: char = '-';
pub const SLASH: char = '/';
pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';
pub const QUESTION: char = '?';
pub const CARET: char = '^';
pub const BAR: char = '|';

/// Whitespace as understood by the expression lexer: the ASCII control
/// range up to space, plus no-break space.
pub fn is_whitespace(ch: char) -> bool {
    (TAB..=SPACE).contains(&ch) || ch == NBSP
}

pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn is_quote(ch: char) -> bool {
    matches!(ch, SQ | DQ | BT)
}

/// `$`, `_` or an ASCII letter.
pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || is_digit(ch)
}
