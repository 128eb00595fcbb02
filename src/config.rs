//! Query settings: which filter program to run and whether fallbacks are
//! fatal.
//!
//! ```toml
//! strict = false
//!
//! [filter]
//! program = "jq"
//! args = ["-r"]
//! ```
//!
//! Every key is optional. The file is located through `--config`, then the
//! `TQ_CONFIG` environment variable; `TQ_JQ` overrides the filter program.

use crate::filter::{JqCommand, DEFAULT_ARGS, DEFAULT_PROGRAM};
use crate::query::QueryOptions;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "TQ_CONFIG";
pub const PROGRAM_ENV: &str = "TQ_JQ";

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    pub strict: bool,
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: DEFAULT_ARGS.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.filter.program.trim().is_empty() {
            return Err("filter.program must not be empty".to_string());
        }
        Ok(())
    }

    /// Apply environment overrides. `lookup` is usually `std::env::var`.
    pub fn apply_env<E>(&mut self, lookup: E)
    where
        E: Fn(&str) -> Option<String>,
    {
        if let Some(program) = lookup(PROGRAM_ENV).filter(|value| !value.trim().is_empty()) {
            self.filter.program = program;
        }
    }

    pub fn filter_command(&self) -> JqCommand {
        JqCommand::new(self.filter.program.as_str()).with_args(self.filter.args.iter().cloned())
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            strict: self.strict,
        }
    }
}

/// Where the configuration file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line.
    Flag(PathBuf),
    /// Named by the `TQ_CONFIG` environment variable.
    Env(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn locate<E>(flag: Option<&Path>, lookup: E) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        if let Some(path) = flag {
            return ConfigSource::Flag(path.to_path_buf());
        }
        match lookup(CONFIG_ENV) {
            Some(value) if !value.trim().is_empty() => ConfigSource::Env(PathBuf::from(value)),
            _ => ConfigSource::Defaults,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Flag(path) | ConfigSource::Env(path) => Some(path),
            ConfigSource::Defaults => None,
        }
    }

    pub fn load(&self) -> Result<QueryConfig, ConfigError> {
        match self.path() {
            Some(path) => load_from_path(path),
            None => Ok(QueryConfig::default()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Invalid {
        path: Option<PathBuf>,
        message: String,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(path),
                source,
            },
            ConfigError::Invalid {
                path: None,
                message,
            } => ConfigError::Invalid {
                path: Some(path),
                message,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read tq config from {}: {}", path.display(), source)
            }
            ConfigError::Toml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse tq config TOML ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse tq config TOML: {}", source),
            },
            ConfigError::Invalid { path, message } => match path {
                Some(path) => write!(f, "invalid tq config ({}): {}", path.display(), message),
                None => write!(f, "invalid tq config: {}", message),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Invalid { .. } => None,
        }
    }
}

pub fn load_from_str(input: &str) -> Result<QueryConfig, ConfigError> {
    let config: QueryConfig = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    config
        .validate()
        .map_err(|message| ConfigError::Invalid {
            path: None,
            message,
        })?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<QueryConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}
