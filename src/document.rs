//! The JSON-mappable document model.
//!
//! A [`Document`] is the shape a configuration file takes while it is being
//! handed to a filter program:
//!
//! ```json
//! {"body":{"blocks":[{"type":"resource","labels":["aws_instance","web"],
//!   "attributes":{"ami":"local.ami"},"body":{"blocks":[]}}]}}
//! ```
//!
//! Attribute values are raw expression text. They are never evaluated, so a
//! string literal keeps its quotes (`"\"t2.micro\""`) while a reference does
//! not (`"local.ami"`).
//!
//! # Attribute order
//!
//! Attributes are stored in an ordered map keyed by name. Declaration order
//! from the source file is not preserved; every encoding (JSON and HCL) emits
//! attributes sorted by name so the output is deterministic.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Attribute name to raw expression text.
pub type Attributes = BTreeMap<String, String>;

/// Root of a converted configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Body,
}

/// Ordered sequence of blocks. Order is significant and survives every
/// conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocks: Vec<Block>,
}

/// A typed, labelled block with attributes and a nested body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub block_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Attributes,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Body,
}

impl Document {
    pub fn new(body: Body) -> Self {
        Self { body }
    }

    /// Decode a document from filter output.
    ///
    /// Missing or `null` fields decode as empty values and unknown fields are
    /// ignored. Anything that is not a single JSON object of the right shape
    /// (a bare string, an array, several concatenated values) is an error.
    pub fn from_json(input: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(input)
    }

    /// Compact JSON encoding, as fed to filter programs.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn to_json_pretty(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

impl Body {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Block {
    /// Create a block with no attributes and an empty body.
    pub fn new<I, S>(block_type: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            block_type: block_type.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            attributes: Attributes::new(),
            body: Body::default(),
        }
    }

    /// Set an attribute to raw expression text, e.g. `"\"t2.micro\""` or
    /// `"local.ami"`.
    pub fn with_attribute(mut self, name: impl Into<String>, raw: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), raw.into());
        self
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.body.blocks.push(block);
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
