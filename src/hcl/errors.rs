use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("configuration is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("failed to set HCL language for parser")]
    LanguageSet,

    #[error("failed to parse configuration")]
    ParseFailed,

    #[error("invalid HCL syntax: {}", describe_locations(.errors))]
    Syntax { errors: Vec<SyntaxErrorLocation> },
}

impl ParseError {
    /// Syntax error locations, empty for non-syntax failures.
    pub fn locations(&self) -> &[SyntaxErrorLocation] {
        match self {
            ParseError::Syntax { errors } => errors,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Input the grammar could not place.
    Unexpected,
    /// A token the grammar expected but never found (e.g. a closing brace).
    Missing(String),
}

/// Location of an error node in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorLocation {
    pub kind: SyntaxErrorKind,
    pub byte_start: usize,
    pub byte_end: usize,
    pub line: usize,
    pub column: usize,
    pub context: String,
}

impl fmt::Display for SyntaxErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}: ", self.line, self.column)?;
        match &self.kind {
            SyntaxErrorKind::Unexpected => write!(f, "unexpected input")?,
            SyntaxErrorKind::Missing(token) => write!(f, "missing `{}`", token)?,
        }
        if !self.context.is_empty() {
            write!(f, " near `{}`", self.context)?;
        }
        Ok(())
    }
}

fn describe_locations(errors: &[SyntaxErrorLocation]) -> String {
    if errors.is_empty() {
        return "unrecognized input".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(kind: SyntaxErrorKind, line: usize) -> SyntaxErrorLocation {
        SyntaxErrorLocation {
            kind,
            byte_start: 0,
            byte_end: 1,
            line,
            column: 3,
            context: "a {".to_string(),
        }
    }

    #[test]
    fn syntax_error_display_lists_every_location() {
        let err = ParseError::Syntax {
            errors: vec![
                location(SyntaxErrorKind::Missing("}".to_string()), 2),
                location(SyntaxErrorKind::Unexpected, 4),
            ],
        };
        assert_eq!(
            err.to_string(),
            "invalid HCL syntax: line 2, column 3: missing `}` near `a {`; line 4, column 3: unexpected input near `a {`"
        );
        assert_eq!(err.locations().len(), 2);
    }

    #[test]
    fn syntax_error_without_locations() {
        let err = ParseError::Syntax { errors: Vec::new() };
        assert_eq!(err.to_string(), "invalid HCL syntax: unrecognized input");
    }
}
