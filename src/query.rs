//! The query pipeline: parse, convert to JSON, filter, convert back, format.
//!
//! When the filter output is not a document (a scalar, an array, a partial
//! selection) or renders to nothing, the filter output is returned unchanged.
//! [`QueryOptions::strict`] turns those cases into errors instead.

use crate::convert::{from_document, to_document};
use crate::document::Document;
use crate::filter::{FilterError, FilterProcessor, JqCommand};
use crate::hcl::ParseError;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to encode document as JSON: {0}")]
    Marshal(#[from] serde_json::Error),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("filter output cannot be converted back to configuration: {reason}")]
    NotConvertible { reason: FallbackReason },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Fail instead of returning raw filter output.
    pub strict: bool,
}

/// Why filter output was passed through instead of formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The output did not decode as a document.
    NotADocument { message: String },
    /// The output decoded but had no blocks to render.
    EmptyRendering,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NotADocument { message } => {
                write!(f, "output is not a document ({message})")
            }
            FallbackReason::EmptyRendering => write!(f, "document has no blocks to render"),
        }
    }
}

/// Result of a successful query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutput {
    /// Canonical configuration text.
    Formatted(Vec<u8>),
    /// Filter output returned as-is.
    Raw {
        bytes: Vec<u8>,
        reason: FallbackReason,
    },
}

impl QueryOutput {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            QueryOutput::Formatted(bytes) | QueryOutput::Raw { bytes, .. } => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            QueryOutput::Formatted(bytes) | QueryOutput::Raw { bytes, .. } => bytes,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, QueryOutput::Raw { .. })
    }
}

/// Runs queries through a filter processor.
#[derive(Debug, Clone)]
pub struct QueryExecutor<F> {
    filter: F,
    options: QueryOptions,
}

impl<F: FilterProcessor> QueryExecutor<F> {
    pub fn new(filter: F) -> Self {
        Self {
            filter,
            options: QueryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    /// Run `expression` against configuration bytes.
    pub fn execute(&self, expression: &str, input: &[u8]) -> Result<QueryOutput, QueryError> {
        let document = to_document(input)?;
        let payload = document.to_json()?;

        let output = self.filter.apply(expression, &payload)?;

        let document = match Document::from_json(&output) {
            Ok(document) => document,
            Err(err) => {
                return self.fall_back(
                    output,
                    FallbackReason::NotADocument {
                        message: err.to_string(),
                    },
                );
            }
        };

        let rendered = from_document(&document);
        if rendered.is_empty() {
            return self.fall_back(output, FallbackReason::EmptyRendering);
        }

        Ok(QueryOutput::Formatted(rendered))
    }

    /// Like [`execute`](Self::execute), returning only the bytes.
    pub fn run(&self, expression: &str, input: &[u8]) -> Result<Vec<u8>, QueryError> {
        self.execute(expression, input).map(QueryOutput::into_bytes)
    }

    fn fall_back(&self, bytes: Vec<u8>, reason: FallbackReason) -> Result<QueryOutput, QueryError> {
        if self.options.strict {
            return Err(QueryError::NotConvertible { reason });
        }
        debug!(%reason, bytes = bytes.len(), "returning raw filter output");
        Ok(QueryOutput::Raw { bytes, reason })
    }
}

/// Run a query with the default `jq -r` filter.
pub fn run_query(expression: &str, input: &[u8]) -> Result<Vec<u8>, QueryError> {
    QueryExecutor::new(JqCommand::default()).run(expression, input)
}
