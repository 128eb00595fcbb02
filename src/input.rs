//! Gathering command-line input into a single buffer.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STDIN_NAME: &str = "STDIN";
pub const COMPOSITE_NAME: &str = "COMPOSITE";

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read from {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Concatenated input and a name for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    /// `STDIN`, the single file path, or `COMPOSITE` for several sources.
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Read every source, using the process's stdin for `-` or when no paths
/// are given.
pub fn read_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Input, InputError> {
    read_inputs_with(paths, io::stdin().lock())
}

/// Like [`read_inputs`], reading `-` from `stdin`.
///
/// Each source is followed by a newline so that files without a trailing
/// newline do not run into each other.
pub fn read_inputs_with<P, R>(paths: &[P], mut stdin: R) -> Result<Input, InputError>
where
    P: AsRef<Path>,
    R: Read,
{
    let stdin_only = [Path::new("-")];
    let sources: Vec<&Path> = if paths.is_empty() {
        stdin_only.to_vec()
    } else {
        paths.iter().map(|path| path.as_ref()).collect()
    };

    let name = match sources.as_slice() {
        [only] if is_stdin(only) => STDIN_NAME.to_string(),
        [only] => only.display().to_string(),
        _ => COMPOSITE_NAME.to_string(),
    };

    let mut bytes = Vec::new();
    for source in sources {
        if is_stdin(source) {
            stdin.read_to_end(&mut bytes).map_err(|err| InputError::Read {
                name: STDIN_NAME.to_string(),
                source: err,
            })?;
        } else {
            let mut file = File::open(source).map_err(|err| InputError::Open {
                path: source.to_path_buf(),
                source: err,
            })?;
            file.read_to_end(&mut bytes).map_err(|err| InputError::Read {
                name: source.display().to_string(),
                source: err,
            })?;
        }
        bytes.push(b'\n');
    }

    Ok(Input { name, bytes })
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const NO_PATHS: &[&str] = &[];

    #[test]
    fn no_paths_reads_stdin() {
        let input = read_inputs_with(NO_PATHS, &b"locals {}"[..]).unwrap();
        assert_eq!(input.name, "STDIN");
        assert_eq!(input.bytes, b"locals {}\n");
    }

    #[test]
    fn dash_reads_stdin() {
        let input = read_inputs_with(&["-"], &b"a"[..]).unwrap();
        assert_eq!(input.name, "STDIN");
        assert_eq!(input.bytes, b"a\n");
    }

    #[test]
    fn files_are_concatenated_with_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.tf");
        let second = dir.path().join("b.tf");
        fs::write(&first, "locals {\n}").unwrap();
        fs::write(&second, "terraform {\n}\n").unwrap();

        let single = read_inputs_with(&[&first], io::empty()).unwrap();
        assert_eq!(single.name, first.display().to_string());
        assert_eq!(single.bytes, b"locals {\n}\n");

        let both = read_inputs_with(&[&first, &second], io::empty()).unwrap();
        assert_eq!(both.name, "COMPOSITE");
        assert_eq!(both.bytes, b"locals {\n}\nterraform {\n}\n\n");
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.tf");

        let err = read_inputs_with(&[&missing], io::empty()).unwrap_err();
        assert!(matches!(err, InputError::Open { .. }));
        assert!(err.to_string().contains("missing.tf"));
    }
}
