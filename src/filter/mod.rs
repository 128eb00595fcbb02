//! Filter processors: programs that transform the JSON document.

pub mod command;
pub mod errors;

pub use command::{FilterOutput, JqCommand, DEFAULT_ARGS, DEFAULT_PROGRAM};
pub use errors::FilterError;

/// Applies a filter expression to a JSON payload.
///
/// Any closure with the same shape is a processor, which keeps tests free of
/// subprocesses:
///
/// ```
/// use tq::filter::{FilterError, FilterProcessor};
///
/// let identity = |_: &str, input: &[u8]| -> Result<Vec<u8>, FilterError> { Ok(input.to_vec()) };
/// assert_eq!(identity.apply(".", b"{}").unwrap(), b"{}");
/// ```
pub trait FilterProcessor {
    fn apply(&self, expression: &str, input: &[u8]) -> Result<Vec<u8>, FilterError>;
}

impl<F> FilterProcessor for F
where
    F: Fn(&str, &[u8]) -> Result<Vec<u8>, FilterError>,
{
    fn apply(&self, expression: &str, input: &[u8]) -> Result<Vec<u8>, FilterError> {
        self(expression, input)
    }
}
