use crate::hcl::ast::{Attribute, Block, Body, Expression, File, Structure};
use crate::hcl::errors::{ParseError, SyntaxErrorKind, SyntaxErrorLocation};
use crate::hcl::strings::unquote_label;
use ast_grep_language::{LanguageExt, SupportLang};
use tree_sitter::{Node, Parser, Tree};

/// Tree-sitter parser wrapper for HCL configuration files.
pub struct HclParser {
    parser: Parser,
}

impl HclParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        // The HCL grammar ships with ast-grep-language.
        let ts_lang = SupportLang::Hcl.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| ParseError::LanguageSet)?;

        Ok(Self { parser })
    }

    /// Parse source text into a tree-sitter Tree.
    pub fn parse_tree(&mut self, source: &str) -> Result<Tree, ParseError> {
        self.parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailed)
    }

    /// Parse source text and return the tree along with the source.
    pub fn parse_with_source<'a>(
        &mut self,
        source: &'a str,
    ) -> Result<ParsedSource<'a>, ParseError> {
        let tree = self.parse_tree(source)?;
        Ok(ParsedSource { source, tree })
    }

    /// Parse configuration bytes into a syntax tree.
    ///
    /// Input with any syntax error is rejected; the error lists every
    /// location tree-sitter could not make sense of.
    pub fn parse(&mut self, input: &[u8]) -> Result<File, ParseError> {
        let source = std::str::from_utf8(input)?;
        let parsed = self.parse_with_source(source)?;

        if parsed.has_errors() {
            return Err(ParseError::Syntax {
                errors: parsed.syntax_errors(),
            });
        }

        Ok(parsed.to_file())
    }
}

/// Parse configuration bytes with a fresh parser.
pub fn parse(input: &[u8]) -> Result<File, ParseError> {
    HclParser::new()?.parse(input)
}

/// A parsed source file with its tree-sitter tree.
pub struct ParsedSource<'a> {
    pub source: &'a str,
    pub tree: Tree,
}

impl<'a> ParsedSource<'a> {
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Check if the tree contains any ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Locations of all ERROR and MISSING nodes, in source order.
    pub fn syntax_errors(&self) -> Vec<SyntaxErrorLocation> {
        let mut errors = Vec::new();
        collect_errors(self.tree.root_node(), self.source, &mut errors);
        errors
    }

    /// Extract text for a node's byte range.
    pub fn node_text(&self, node: Node<'_>) -> &'a str {
        &self.source[node.byte_range()]
    }

    /// Build the syntax tree for the whole file.
    ///
    /// Comments are dropped. A file holding a bare object (JSON-style
    /// configuration) has no blocks and yields an empty body.
    pub fn to_file(&self) -> File {
        let root = self.root_node();
        let mut cursor = root.walk();
        let body = root
            .named_children(&mut cursor)
            .find(|child| child.kind() == "body")
            .map(|body| self.build_body(body))
            .unwrap_or_default();
        File::new(body)
    }

    fn build_body(&self, node: Node<'_>) -> Body {
        let mut body = Body::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "attribute" => {
                    if let Some(attr) = self.build_attribute(child) {
                        body.push(Structure::Attribute(attr));
                    }
                }
                "block" => body.push(Structure::Block(self.build_block(child))),
                _ => {}
            }
        }
        body
    }

    fn build_attribute(&self, node: Node<'_>) -> Option<Attribute> {
        let mut name = None;
        let mut value = None;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "comment" => {}
                "identifier" if name.is_none() => name = Some(self.node_text(child)),
                _ if value.is_none() => value = Some(self.node_text(child)),
                _ => {}
            }
        }
        Some(Attribute::new(name?, Expression::raw(value?)))
    }

    fn build_block(&self, node: Node<'_>) -> Block {
        let mut ident = "";
        let mut labels = Vec::new();
        let mut body = Body::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "identifier" if ident.is_empty() => ident = self.node_text(child),
                "identifier" => labels.push(self.node_text(child).to_string()),
                "string_lit" => labels.push(unquote_label(self.node_text(child))),
                "body" => body = self.build_body(child),
                // block_start, block_end, comments
                _ => {}
            }
        }
        Block::new(ident, labels).with_body(body)
    }
}

fn collect_errors(node: Node<'_>, source: &str, errors: &mut Vec<SyntaxErrorLocation>) {
    if node.is_error() || node.is_missing() {
        let start = node.start_position();
        let byte_start = node.start_byte();
        let byte_end = node.end_byte();

        let kind = if node.is_missing() {
            SyntaxErrorKind::Missing(missing_token(node.kind()).to_string())
        } else {
            SyntaxErrorKind::Unexpected
        };

        errors.push(SyntaxErrorLocation {
            kind,
            byte_start,
            byte_end,
            line: start.row + 1,
            column: start.column + 1,
            context: error_context(source, byte_start, byte_end),
        });

        // Children of an ERROR node are the tokens it swallowed.
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, source, errors);
    }
}

fn missing_token(kind: &str) -> &str {
    match kind {
        "block_start" => "{",
        "block_end" => "}",
        other => other,
    }
}

/// Up to 20 bytes either side of an error span, on one line.
fn error_context(source: &str, byte_start: usize, byte_end: usize) -> String {
    let mut start = byte_start.saturating_sub(20);
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (byte_end + 20).min(source.len());
    while !source.is_char_boundary(end) {
        end += 1;
    }
    source[start..end].trim().replace('\n', "\\n")
}
