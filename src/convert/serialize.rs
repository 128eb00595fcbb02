use crate::document;
use crate::hcl::{self, File};
use tracing::debug;

/// Convert a parsed file into a document.
///
/// Attributes directly in the root body have no place in the document model
/// and are skipped.
pub fn serialize_file(file: &File) -> document::Document {
    let root_attributes = file.body().attributes().count();
    if root_attributes > 0 {
        debug!(count = root_attributes, "dropping root-level attributes");
    }
    document::Document::new(serialize(file.body()))
}

/// Convert the blocks of a syntax body, in source order.
pub fn serialize(body: &hcl::Body) -> document::Body {
    document::Body::new(body.blocks().map(serialize_block).collect())
}

fn serialize_block(block: &hcl::Block) -> document::Block {
    let attributes = block
        .body()
        .attributes()
        .map(|attr| {
            (
                attr.name().to_string(),
                attr.expr().as_str().trim_start().to_string(),
            )
        })
        .collect();

    document::Block {
        block_type: block.ident().to_string(),
        labels: block.labels().to_vec(),
        attributes,
        body: serialize(block.body()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hcl::{Block, Body, Expression};

    #[test]
    fn captures_type_labels_and_trimmed_attributes() {
        let mut block = Block::new("resource", ["aws_instance", "web"]);
        block
            .body_mut()
            .set_attribute_raw("ami", Expression::raw("   local.ami"));
        block
            .body_mut()
            .append_block(Block::new("lifecycle", Vec::<String>::new()));

        let mut body = Body::new();
        body.append_block(block);
        body.append_newline();

        let converted = serialize(&body);
        assert_eq!(converted.blocks.len(), 1);

        let resource = &converted.blocks[0];
        assert_eq!(resource.block_type, "resource");
        assert_eq!(resource.labels, vec!["aws_instance", "web"]);
        assert_eq!(resource.attributes["ami"], "local.ami");
        assert_eq!(resource.body.blocks[0].block_type, "lifecycle");
    }

    #[test]
    fn root_attributes_are_dropped() {
        let mut body = Body::new();
        body.set_attribute_raw("region", Expression::raw("\"eu-west-1\""));
        body.append_block(Block::new("locals", Vec::<String>::new()));

        let document = serialize_file(&File::new(body));
        assert_eq!(document.body.blocks.len(), 1);
        assert!(document.body.blocks[0].attributes.is_empty());
    }
}
