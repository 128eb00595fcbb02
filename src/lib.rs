//! tq: query and edit HCL/Terraform configuration with jq
//!
//! Configuration is parsed with tree-sitter, converted into a JSON
//! [`Document`], handed to a filter program (`jq -r` by default) and, when the
//! filter output is still a document, converted back and formatted.
//!
//! # Architecture
//!
//! - [`hcl`]: tree-sitter parser, syntax tree and canonical formatter.
//! - [`convert`]: syntax tree to [`Document`] and back.
//! - [`filter`]: the [`FilterProcessor`] seam and the `jq` subprocess.
//! - [`query`]: the pipeline, with pass-through of output that cannot be
//!   converted back.
//!
//! Attribute values are raw expression text and are never evaluated.
//! Attribute declaration order does not survive a round trip; output is
//! always sorted by attribute name.
//!
//! # Example
//!
//! ```no_run
//! use tq::run_query;
//!
//! let input = br#"
//! resource "aws_instance" "web" {
//!   instance_type = "t2.micro"
//! }
//! "#;
//!
//! match run_query(".body.blocks[0].attributes.instance_type", input) {
//!     Ok(output) => print!("{}", String::from_utf8_lossy(&output)),
//!     Err(e) => eprintln!("Query failed: {}", e),
//! }
//! ```

pub mod config;
pub mod convert;
pub mod document;
pub mod filter;
pub mod hcl;
pub mod input;
pub mod query;

// Re-exports
pub use config::{load_from_path, load_from_str, ConfigError, ConfigSource, QueryConfig};
pub use convert::{from_document, to_document};
pub use document::{Attributes, Block, Body, Document};
pub use filter::{FilterError, FilterProcessor, JqCommand};
pub use hcl::{HclParser, ParseError};
pub use input::{read_inputs, Input, InputError};
pub use query::{run_query, FallbackReason, QueryError, QueryExecutor, QueryOptions, QueryOutput};
