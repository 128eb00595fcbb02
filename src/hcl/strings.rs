//! Quoting and unquoting of block labels.
//!
//! Labels travel through the document model as plain values. They are
//! unescaped when read from a quoted literal and always written back as
//! quoted literals, including labels that were bare identifiers in the
//! source.

use std::fmt::Write;
use std::iter::Peekable;
use std::str::Chars;

/// Render a label value as a quoted HCL string literal.
pub fn quote_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len() + 2);
    out.push('"');

    let mut chars = label.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // `${` and `%{` would start a template sequence.
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(ch);
                out.push(ch);
            }
            ch if ch.is_control() => {
                let _ = write!(out, "\\u{:04x}", ch as u32);
            }
            ch => out.push(ch),
        }
    }

    out.push('"');
    out
}

/// Decode a quoted HCL string literal into its value.
///
/// Text without surrounding quotes is decoded as-is. Unknown escapes are
/// kept verbatim.
pub fn unquote_label(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(literal);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(marker @ ('u' | 'U')) => {
                    let width = if marker == 'u' { 4 } else { 8 };
                    let digits: String = chars.by_ref().take(width).collect();
                    match u32::from_str_radix(&digits, 16)
                        .ok()
                        .filter(|_| digits.len() == width)
                        .and_then(char::from_u32)
                    {
                        Some(decoded) => out.push(decoded),
                        None => {
                            out.push('\\');
                            out.push(marker);
                            out.push_str(&digits);
                        }
                    }
                }
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '$' | '%' if is_doubled_template_marker(ch, &chars) => {
                // `$${` decodes to `${`; drop the doubled marker.
                chars.next();
                out.push(ch);
            }
            ch => out.push(ch),
        }
    }

    out
}

fn is_doubled_template_marker(marker: char, rest: &Peekable<Chars<'_>>) -> bool {
    let mut lookahead = rest.clone();
    lookahead.next() == Some(marker) && lookahead.next() == Some('{')
}
