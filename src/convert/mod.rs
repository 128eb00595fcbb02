//! Mapping between HCL source and the [`Document`] model.

pub mod deserialize;
pub mod serialize;

pub use deserialize::{deserialize, deserialize_file};
pub use serialize::{serialize, serialize_file};

use crate::document::Document;
use crate::hcl::{self, ParseError};
use tracing::debug;

/// Parse configuration bytes into a document.
pub fn to_document(input: &[u8]) -> Result<Document, ParseError> {
    let file = hcl::parse(input)?;
    let document = serialize_file(&file);
    debug!(
        bytes = input.len(),
        blocks = document.body.blocks.len(),
        "parsed configuration"
    );
    Ok(document)
}

/// Render a document as canonical configuration text.
///
/// Returns an empty vector for a document with no blocks.
pub fn from_document(document: &Document) -> Vec<u8> {
    hcl::format(&deserialize_file(document))
}
