use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("failed to start filter program `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("filter program stdin was not captured")]
    StdinUnavailable,

    #[error("failed to write filter input: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read filter output: {source}")]
    Read {
        #[source]
        source: std::io::Error,
    },

    #[error("filter input writer panicked")]
    WriterPanicked,

    #[error("filter program `{program}` {}", exit_summary(.code, .stderr))]
    Exit {
        program: String,
        /// `None` when the process was killed by a signal.
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_summary(code: &Option<i32>, stderr: &str) -> String {
    let status = match code {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    };
    let stderr = stderr.trim();
    if stderr.is_empty() {
        status
    } else {
        format!("{status}: {stderr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_message_includes_stderr() {
        let err = FilterError::Exit {
            program: "jq".to_string(),
            code: Some(3),
            stderr: "jq: error: syntax error\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "filter program `jq` exited with status 3: jq: error: syntax error"
        );
    }

    #[test]
    fn exit_message_without_stderr() {
        let err = FilterError::Exit {
            program: "jq".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "filter program `jq` was terminated by a signal");
    }
}
