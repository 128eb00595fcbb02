use crate::filter::{FilterError, FilterProcessor};
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

pub const DEFAULT_PROGRAM: &str = "jq";
pub const DEFAULT_ARGS: &[&str] = &["-r"];

/// Runs an external filter program as `<program> <args...> <expression>`,
/// feeding the payload on stdin and collecting stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JqCommand {
    program: String,
    args: Vec<String>,
}

impl JqCommand {
    /// A command for `program` with no extra arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Replace the arguments placed before the expression.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for JqCommand {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM).with_args(DEFAULT_ARGS.iter().copied())
    }
}

/// Output of a successful filter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutput {
    pub stdout: Vec<u8>,
    /// Diagnostics the filter printed while still succeeding (jq warnings,
    /// `debug` and `stderr` builtins).
    pub stderr: String,
}

impl JqCommand {
    /// Run the filter and keep both of its output streams.
    pub fn run(&self, expression: &str, input: &[u8]) -> Result<FilterOutput, FilterError> {
        debug!(
            program = %self.program,
            args = ?self.args,
            expression,
            bytes = input.len(),
            "starting filter"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(expression)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| FilterError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let Some(mut stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(FilterError::StdinUnavailable);
        };

        // The payload is written on its own thread so a filter that produces
        // output before draining stdin cannot fill both pipes and stall.
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || {
                let result = stdin.write_all(input);
                drop(stdin);
                result
            });
            let output = child.wait_with_output();
            (writer.join(), output)
        });

        let output = output.map_err(|source| FilterError::Read { source })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            debug!(status = ?output.status.code(), %stderr, "filter failed");
            return Err(FilterError::Exit {
                program: self.program.clone(),
                code: output.status.code(),
                stderr,
            });
        }

        match written {
            Err(_) => return Err(FilterError::WriterPanicked),
            Ok(Err(source)) => return Err(FilterError::Write { source }),
            Ok(Ok(())) => {}
        }

        debug!(bytes = output.stdout.len(), "filter finished");
        Ok(FilterOutput {
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl FilterProcessor for JqCommand {
    /// Runs the filter, passing anything it wrote to stderr through to the
    /// process's own stderr.
    fn apply(&self, expression: &str, input: &[u8]) -> Result<Vec<u8>, FilterError> {
        let output = self.run(expression, input)?;
        if !output.stderr.is_empty() {
            let mut stderr = io::stderr().lock();
            let _ = stderr.write_all(output.stderr.as_bytes());
            let _ = stderr.flush();
        }
        Ok(output.stdout)
    }
}
