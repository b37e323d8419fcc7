//! Utility functions

/// Splits `input` at the first `:` into two trimmed halves. Returns
/// `defaults` when there is no colon.
pub fn split_at_colon<'a>(
    input: &'a str,
    defaults: (Option<&'a str>, Option<&'a str>),
) -> (Option<&'a str>, Option<&'a str>) {
    split_at(input, ':', defaults)
}

/// Splits `input` at the first `.` into two trimmed halves. Returns
/// `defaults` when there is no period.
pub fn split_at_period<'a>(
    input: &'a str,
    defaults: (Option<&'a str>, Option<&'a str>),
) -> (Option<&'a str>, Option<&'a str>) {
    split_at(input, '.', defaults)
}

fn split_at<'a>(
    input: &'a str,
    character: char,
    defaults: (Option<&'a str>, Option<&'a str>),
) -> (Option<&'a str>, Option<&'a str>) {
    match input.split_once(character) {
        Some((head, tail)) => (Some(head.trim()), Some(tail.trim())),
        None => defaults,
    }
}

/// Upper-cases the first character of `s`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
