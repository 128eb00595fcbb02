//! Canonical rendering of a syntax tree.
//!
//! Output follows the conventional Terraform layout:
//!
//! - two-space indentation per nesting level;
//! - the `=` signs of consecutive attributes line up;
//! - labels are always quoted;
//! - continuation lines of multi-line expressions are re-indented to their
//!   bracket depth (heredoc bodies are left untouched);
//! - leading and trailing blank lines are dropped and the output ends with
//!   a single newline.
//!
//! An empty tree renders as empty output.

use crate::hcl::ast::{Attribute, Block, Body, File, Structure};
use crate::hcl::strings::quote_label;

const INDENT: &str = "  ";

/// Render a file canonically. Returns an empty vector when there is nothing
/// to render.
pub fn format(file: &File) -> Vec<u8> {
    let mut out = String::new();
    write_body(file.body(), 0, &mut out);

    let trimmed = out.trim_matches('\n');
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut rendered = String::with_capacity(trimmed.len() + 1);
    rendered.push_str(trimmed);
    rendered.push('\n');
    rendered.into_bytes()
}

/// Render a single body at the given nesting depth, without the final-newline
/// normalization applied by [`format`].
pub fn format_body(body: &Body, depth: usize) -> String {
    let mut out = String::new();
    write_body(body, depth, &mut out);
    out
}

fn write_body(body: &Body, depth: usize, out: &mut String) {
    let items = body.items();
    let mut index = 0;
    while index < items.len() {
        match &items[index] {
            Structure::Attribute(_) => {
                let group = alignment_group(&items[index..]);
                write_attributes(&group, depth, out);
                index += group.len();
            }
            Structure::Block(block) => {
                write_block(block, depth, out);
                index += 1;
            }
            Structure::Newline => {
                out.push('\n');
                index += 1;
            }
        }
    }
}

/// Leading run of attributes whose `=` signs line up. A multi-line attribute
/// is never aligned with its neighbours.
fn alignment_group(items: &[Structure]) -> Vec<&Attribute> {
    let mut group = Vec::new();
    for item in items {
        let Structure::Attribute(attr) = item else {
            break;
        };
        if attr.expr().is_multiline() {
            if group.is_empty() {
                group.push(attr);
            }
            break;
        }
        group.push(attr);
    }
    group
}

fn write_attributes(group: &[&Attribute], depth: usize, out: &mut String) {
    let width = group
        .iter()
        .map(|attr| attr.name().chars().count())
        .max()
        .unwrap_or(0);

    for attr in group {
        push_indent(depth, out);
        out.push_str(attr.name());
        for _ in attr.name().chars().count()..width {
            out.push(' ');
        }
        out.push_str(" = ");
        write_expression(attr.expr().as_str(), depth, out);
        out.push('\n');
    }
}

fn write_block(block: &Block, depth: usize, out: &mut String) {
    push_indent(depth, out);
    out.push_str(block.ident());
    for label in block.labels() {
        out.push(' ');
        out.push_str(&quote_label(label));
    }
    out.push_str(" {\n");
    write_body(block.body(), depth + 1, out);
    push_indent(depth, out);
    out.push_str("}\n");
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Write expression text after `name = `. Surrounding whitespace is dropped
/// and continuation lines are re-indented relative to `depth`.
fn write_expression(raw: &str, depth: usize, out: &mut String) {
    let text = raw.trim();
    let mut lines = text.split('\n');
    let mut scanner = LineScanner::default();

    if let Some(first) = lines.next() {
        out.push_str(first.trim_end());
        scanner.scan(first);
    }

    for line in lines {
        out.push('\n');
        if scanner.in_verbatim_region() {
            out.push_str(line);
            scanner.scan(line);
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let closers = trimmed
            .chars()
            .take_while(|ch| matches!(ch, '}' | ']' | ')'))
            .count();
        let level = scanner.depth().saturating_sub(closers);
        push_indent(depth + level, out);
        out.push_str(trimmed);
        scanner.scan(trimmed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// `{`, `[` or `(` in expression code.
    Bracket,
    /// Inside a quoted string.
    Quoted,
    /// `${` or `%{` inside a quoted string.
    Template,
}

/// Tracks bracket nesting across the lines of one expression.
#[derive(Debug, Default)]
struct LineScanner {
    stack: Vec<Frame>,
    heredoc: Option<String>,
    pending_heredoc: Option<String>,
    in_block_comment: bool,
}

impl LineScanner {
    fn depth(&self) -> usize {
        self.stack
            .iter()
            .filter(|frame| **frame == Frame::Bracket)
            .count()
    }

    /// Heredoc bodies and block comments are copied without re-indenting.
    fn in_verbatim_region(&self) -> bool {
        self.heredoc.is_some() || self.in_block_comment
    }

    fn scan(&mut self, line: &str) {
        if let Some(marker) = &self.heredoc {
            if line.trim() == marker {
                self.heredoc = None;
            }
            return;
        }

        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];
            let next = chars.get(i + 1).copied();

            if self.in_block_comment {
                if ch == '*' && next == Some('/') {
                    self.in_block_comment = false;
                    i += 1;
                }
                i += 1;
                continue;
            }

            if self.stack.last() == Some(&Frame::Quoted) {
                match ch {
                    '\\' => i += 1,
                    '"' => {
                        self.stack.pop();
                    }
                    // `$${` and `%%{` are literal text.
                    '$' | '%' if next == Some(ch) => i += 1,
                    '$' | '%' if next == Some('{') => {
                        self.stack.push(Frame::Template);
                        i += 1;
                    }
                    _ => {}
                }
                i += 1;
                continue;
            }

            match ch {
                '"' => self.stack.push(Frame::Quoted),
                '{' | '[' | '(' => self.stack.push(Frame::Bracket),
                '}' | ']' | ')' => {
                    if matches!(self.stack.last(), Some(Frame::Bracket | Frame::Template)) {
                        self.stack.pop();
                    }
                }
                '#' => break,
                '/' if next == Some('/') => break,
                '/' if next == Some('*') => {
                    self.in_block_comment = true;
                    i += 1;
                }
                '<' if next == Some('<') => {
                    let rest: String = chars[i + 2..].iter().collect();
                    let marker: String = rest
                        .trim_start_matches('-')
                        .chars()
                        .take_while(|c| c.is_alphanumeric() || *c == '_')
                        .collect();
                    if !marker.is_empty() {
                        self.pending_heredoc = Some(marker);
                        break;
                    }
                    i += 1;
                }
                _ => {}
            }
            i += 1;
        }

        if let Some(marker) = self.pending_heredoc.take() {
            self.heredoc = Some(marker);
        }
    }
}
