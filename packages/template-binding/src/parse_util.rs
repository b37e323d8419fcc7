//! Parse Utilities
//!
//! Source files, locations, spans and the diagnostics attached to them.
//! Offsets are byte offsets into [`ParseSourceFile::content`]; lines and
//! columns are zero-based.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::chars;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseSourceFile {
    pub content: String,
    pub url: String,
}

impl ParseSourceFile {
    pub fn new(content: impl Into<String>, url: impl Into<String>) -> Self {
        ParseSourceFile {
            content: content.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseLocation {
    pub file: Arc<ParseSourceFile>,
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl ParseLocation {
    pub fn new(file: Arc<ParseSourceFile>, offset: usize, line: usize, col: usize) -> Self {
        ParseLocation {
            file,
            offset,
            line,
            col,
        }
    }

    /// Location of `offset` in `file`, with line and column computed from the
    /// content. Offsets past the end are clamped.
    pub fn at_offset(file: Arc<ParseSourceFile>, offset: usize) -> Self {
        ParseLocation::new(file, 0, 0, 0).move_by(offset as isize)
    }

    /// Returns a new location `delta` bytes away, tracking line breaks.
    /// Movement stops at either end of the file.
    pub fn move_by(&self, delta: isize) -> ParseLocation {
        let source = self.file.content.as_str();
        let mut offset = self.offset.min(source.len());
        let mut line = self.line;
        let mut col = self.col;
        let mut delta = delta;

        while offset > 0 && delta < 0 {
            let Some(ch) = source[..offset].chars().next_back() else {
                break;
            };
            offset -= ch.len_utf8();
            delta += ch.len_utf8() as isize;
            if ch == chars::NEWLINE {
                line = line.saturating_sub(1);
                col = match source[..offset].rfind(chars::NEWLINE) {
                    Some(prior_line) => source[prior_line + 1..offset].chars().count(),
                    None => source[..offset].chars().count(),
                };
            } else {
                col = col.saturating_sub(1);
            }
        }

        while offset < source.len() && delta > 0 {
            let Some(ch) = source[offset..].chars().next() else {
                break;
            };
            offset += ch.len_utf8();
            delta -= ch.len_utf8() as isize;
            if ch == chars::NEWLINE {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }

        ParseLocation::new(self.file.clone(), offset, line, col)
    }

    /// Source text around the location: up to `max_chars` characters or
    /// `max_lines` line breaks on each side.
    pub fn get_context(&self, max_chars: usize, max_lines: usize) -> Option<(String, String)> {
        let content = self.file.content.as_str();
        if content.is_empty() {
            return None;
        }
        let offset = self.offset.min(content.len());

        let mut start_offset = offset;
        let mut ctx_chars = 0;
        let mut ctx_lines = 0;
        for ch in content[..offset].chars().rev() {
            if ctx_chars >= max_chars {
                break;
            }
            start_offset -= ch.len_utf8();
            ctx_chars += 1;
            if ch == chars::NEWLINE {
                ctx_lines += 1;
                if ctx_lines >= max_lines {
                    break;
                }
            }
        }

        let mut end_offset = offset;
        ctx_chars = 0;
        ctx_lines = 0;
        for ch in content[offset..].chars() {
            if ctx_chars >= max_chars {
                break;
            }
            end_offset += ch.len_utf8();
            ctx_chars += 1;
            if ch == chars::NEWLINE {
                ctx_lines += 1;
                if ctx_lines >= max_lines {
                    break;
                }
            }
        }

        Some((
            content[start_offset..offset].to_string(),
            content[offset..end_offset].to_string(),
        ))
    }
}

impl fmt::Display for ParseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.file.url, self.line, self.col)
    }
}

/// A contiguous range of a source file. `full_start` precedes `start` when the
/// span has leading trivia that diagnostics should skip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseSourceSpan {
    pub start: ParseLocation,
    pub end: ParseLocation,
    pub full_start: ParseLocation,
    pub details: Option<String>,
}

impl ParseSourceSpan {
    pub fn new(start: ParseLocation, end: ParseLocation) -> Self {
        let full_start = start.clone();
        ParseSourceSpan {
            start,
            end,
            full_start,
            details: None,
        }
    }

    pub fn with_full_start(
        start: ParseLocation,
        end: ParseLocation,
        full_start: ParseLocation,
        details: Option<String>,
    ) -> Self {
        ParseSourceSpan {
            start,
            end,
            full_start,
            details,
        }
    }

    /// Span covering `start..end` of `file`.
    pub fn from_offsets(file: &Arc<ParseSourceFile>, start: usize, end: usize) -> Self {
        let start = ParseLocation::at_offset(file.clone(), start);
        let end = start.move_by(end.saturating_sub(start.offset) as isize);
        ParseSourceSpan::new(start, end)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Re-anchors the span onto the absolute range `start..end` of the same
    /// file. Start, end and full start are all moved by the start delta (end
    /// by the end delta); details are kept.
    pub fn move_to(&self, start: usize, end: usize) -> ParseSourceSpan {
        let start_diff = start as isize - self.start.offset as isize;
        let end_diff = end as isize - self.end.offset as isize;
        ParseSourceSpan {
            start: self.start.move_by(start_diff),
            end: self.end.move_by(end_diff),
            full_start: self.full_start.move_by(start_diff),
            details: self.details.clone(),
        }
    }

    /// Moves the start of the span right by `delta`, keeping the end.
    pub fn trim_start(&self, delta: usize) -> ParseSourceSpan {
        let start = (self.start.offset + delta).min(self.end.offset);
        self.move_to(start, self.end.offset)
    }

    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The covered source text.
    pub fn text(&self) -> &str {
        let content = self.start.file.content.as_str();
        content
            .get(self.start.offset..self.end.offset)
            .unwrap_or_default()
    }
}

impl fmt::Display for ParseSourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseErrorLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseError {
    pub span: ParseSourceSpan,
    pub msg: String,
    pub level: ParseErrorLevel,
}

impl ParseError {
    pub fn new(span: ParseSourceSpan, msg: impl Into<String>) -> Self {
        ParseError::with_level(span, msg, ParseErrorLevel::Error)
    }

    pub fn with_level(span: ParseSourceSpan, msg: impl Into<String>, level: ParseErrorLevel) -> Self {
        ParseError {
            span,
            msg: msg.into(),
            level,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == ParseErrorLevel::Error
    }

    pub fn contextual_message(&self) -> String {
        match self.span.start.get_context(100, 3) {
            Some((before, after)) => {
                let level = match self.level {
                    ParseErrorLevel::Warning => "WARNING",
                    ParseErrorLevel::Error => "ERROR",
                };
                format!("{} (\"{}[{} ->]{}\")", self.msg, before, level, after)
            }
            None => self.msg.clone(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.contextual_message(), self.span.start)?;
        if let Some(details) = &self.span.details {
            write!(f, ", {}", details)?;
        }
        Ok(())
    }
}

/// Append-only collection of diagnostics for one parse pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorSink {
    errors: Vec<ParseError>,
}

impl ErrorSink {
    pub fn new() -> Self {
        ErrorSink::default()
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn report(&mut self, span: &ParseSourceSpan, msg: impl Into<String>, level: ParseErrorLevel) {
        self.push(ParseError::with_level(span.clone(), msg, level));
    }

    pub fn report_warning(&mut self, span: &ParseSourceSpan, msg: impl Into<String>) {
        self.report(span, msg, ParseErrorLevel::Warning);
    }

    /// Appends every entry of `other`, preserving order.
    pub fn extend(&mut self, other: ErrorSink) {
        self.errors.extend(other.errors);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when at least one entry has [`ParseErrorLevel::Error`].
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(ParseError::is_error)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.errors.iter()
    }

    pub fn as_slice(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.msg.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

impl IntoIterator for ErrorSink {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorSink {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
