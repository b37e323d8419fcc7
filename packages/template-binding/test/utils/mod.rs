//! Test Utilities
//!
//! Source files, spans and attributes built from template snippets.
#![allow(dead_code)]

pub mod unparser;

use std::sync::Arc;

use template_binding::parse_util::{ParseSourceFile, ParseSourceSpan};
use template_binding::template_parser::TemplateAttribute;

pub fn source_file(content: &str) -> Arc<ParseSourceFile> {
    Arc::new(ParseSourceFile::new(content, "TestComp.html"))
}

/// Span over `start..end` of `file`.
pub fn span(file: &Arc<ParseSourceFile>, start: usize, end: usize) -> ParseSourceSpan {
    ParseSourceSpan::from_offsets(file, start, end)
}

/// Span over the whole of `file`.
pub fn full_span(file: &Arc<ParseSourceFile>) -> ParseSourceSpan {
    span(file, 0, file.content.len())
}

/// Builds the attribute named `name` as it appears in `file`: the source
/// span covers `name="value"`, the value span the text between the quotes.
/// Attributes without a value get an empty value and no value span.
pub fn attr(file: &Arc<ParseSourceFile>, name: &str) -> TemplateAttribute {
    let content = file.content.as_str();
    let start = find_attr_name(content, name)
        .unwrap_or_else(|| panic!("attribute {} not found in {}", name, content));
    let name_end = start + name.len();
    let rest = &content[name_end..];
    if let Some(quoted) = rest.strip_prefix("=\"") {
        let value_len = quoted.find('"').expect("unterminated attribute value");
        let value_start = name_end + 2;
        let value_end = value_start + value_len;
        TemplateAttribute::new(
            name,
            &content[value_start..value_end],
            span(file, start, value_end + 1),
            Some(span(file, value_start, value_end)),
        )
    } else {
        TemplateAttribute::new(name, "", span(file, start, name_end), None)
    }
}

/// The attributes called `names` in `file`, in the given order.
pub fn attrs(file: &Arc<ParseSourceFile>, names: &[&str]) -> Vec<TemplateAttribute> {
    names.iter().map(|name| attr(file, name)).collect()
}

fn find_attr_name(content: &str, name: &str) -> Option<usize> {
    content.match_indices(name).map(|(idx, _)| idx).find(|&idx| {
        let before = content[..idx].chars().last();
        let after = content[idx + name.len()..].chars().next();
        matches!(before, Some(' ') | Some('\n'))
            && matches!(after, Some('=') | Some(' ') | Some('>') | Some('/') | None)
    })
}
