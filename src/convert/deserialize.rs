use crate::document;
use crate::hcl::{self, Expression, File};

/// Convert a document back into a syntax tree ready for formatting.
pub fn deserialize_file(document: &document::Document) -> File {
    File::new(deserialize(&document.body))
}

/// Convert a document body into a syntax body.
///
/// Blocks keep their array order. Attributes are emitted sorted by name, and
/// top-level blocks are each followed by a blank line.
pub fn deserialize(body: &document::Body) -> hcl::Body {
    let mut target = hcl::Body::new();
    transfer_body(body, &mut target, 0);
    target
}

fn transfer_body(source: &document::Body, target: &mut hcl::Body, level: usize) {
    for block in &source.blocks {
        let mut converted = hcl::Block::new(block.block_type.as_str(), block.labels.iter().cloned());

        for (name, raw) in &block.attributes {
            converted
                .body_mut()
                .set_attribute_raw(name.as_str(), Expression::raw(format!(" {raw}")));
        }

        transfer_body(&block.body, converted.body_mut(), level + 1);

        target.append_block(converted);
        if level == 0 {
            target.append_newline();
        }
    }
}
