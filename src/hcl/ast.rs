//! Syntax tree shared by the parser, the converters and the formatter.
//!
//! The tree only models what the converters need: blocks, attributes whose
//! right-hand side is kept as raw text, and explicit blank lines. It is built
//! by [`HclParser`](crate::hcl::HclParser) from source and by
//! [`deserialize`](crate::convert::deserialize) from a document, then rendered
//! by [`format`](crate::hcl::format()).

/// A whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    body: Body,
}

impl File {
    pub fn new(body: Body) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }
}

/// One item of a body, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Structure {
    Attribute(Attribute),
    Block(Block),
    /// An empty line between items.
    Newline,
}

/// Ordered items of a file or of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    items: Vec<Structure>,
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Structure] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.items.iter().filter_map(|item| match item {
            Structure::Block(block) => Some(block),
            _ => None,
        })
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.items.iter().filter_map(|item| match item {
            Structure::Attribute(attr) => Some(attr),
            _ => None,
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes().find(|attr| attr.name == name)
    }

    /// Set `name` to the given expression tokens.
    ///
    /// An existing attribute with the same name is replaced in place,
    /// otherwise the attribute is appended.
    pub fn set_attribute_raw(&mut self, name: impl Into<String>, expr: Expression) {
        let name = name.into();
        let existing = self.items.iter().position(
            |item| matches!(item, Structure::Attribute(attr) if attr.name == name),
        );
        let attr = Structure::Attribute(Attribute::new(name, expr));

        match existing {
            Some(index) => self.items[index] = attr,
            None => self.items.push(attr),
        }
    }

    pub fn append_block(&mut self, block: Block) {
        self.items.push(Structure::Block(block));
    }

    pub fn append_newline(&mut self) {
        self.items.push(Structure::Newline);
    }

    pub(crate) fn push(&mut self, item: Structure) {
        self.items.push(item);
    }
}

/// `name = <expression>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    expr: Expression,
}

impl Attribute {
    pub fn new(name: impl Into<String>, expr: Expression) -> Self {
        Self {
            name: name.into(),
            expr,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr(&self) -> &Expression {
        &self.expr
    }
}

/// Unparsed expression tokens, exactly as they follow the `=` sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    raw: String,
}

impl Expression {
    pub fn raw(text: impl Into<String>) -> Self {
        Self { raw: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_multiline(&self) -> bool {
        self.raw.trim().contains('\n')
    }
}

/// `ident "label" ... { body }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    ident: String,
    labels: Vec<String>,
    body: Body,
}

impl Block {
    /// Create a block with an empty body. Labels are unquoted values.
    pub fn new<I, S>(ident: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ident: ident.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            body: Body::new(),
        }
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub(crate) fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }
}
