//! HCL syntax layer: tree-sitter parsing into a small syntax tree, label
//! quoting and canonical formatting.

pub mod ast;
pub mod errors;
pub mod format;
pub mod parser;
pub mod strings;

pub use ast::{Attribute, Block, Body, Expression, File, Structure};
pub use errors::{ParseError, SyntaxErrorKind, SyntaxErrorLocation};
pub use format::{format, format_body};
pub use parser::{parse, HclParser, ParsedSource};
pub use strings::{quote_label, unquote_label};
