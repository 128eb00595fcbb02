use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tq::config::{ConfigSource, QueryConfig, CONFIG_ENV};
use tq::{from_document, read_inputs, to_document, Document, QueryExecutor};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "tq")]
#[command(about = "Query and edit HCL/Terraform configuration with jq", long_about = None)]
#[command(version)]
struct Cli {
    /// Log pipeline steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a jq expression against configuration and print the result
    Query {
        /// jq expression applied to the JSON form of the configuration
        expression: String,

        /// Input files (stdin if none, or `-`)
        files: Vec<PathBuf>,

        /// Fail when the result cannot be converted back to configuration
        #[arg(long)]
        strict: bool,

        /// Filter program to run instead of `jq`
        #[arg(long, value_name = "PROGRAM")]
        jq: Option<String>,

        /// Argument passed to the filter program before the expression
        /// (repeatable, replaces the default `-r`)
        #[arg(long = "jq-arg", value_name = "ARG", allow_hyphen_values = true)]
        jq_args: Vec<String>,

        /// Path to a tq config file (overrides TQ_CONFIG)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the JSON document form of configuration
    ToJson {
        /// Input files (stdin if none, or `-`)
        files: Vec<PathBuf>,

        /// Indent the JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Convert a JSON document back into formatted configuration
    FromJson {
        /// Input files (stdin if none, or `-`)
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Query {
            expression,
            files,
            strict,
            jq,
            jq_args,
            config,
        } => cmd_query(
            &expression,
            &files,
            QueryOverrides {
                strict,
                program: jq,
                args: jq_args,
            },
            config.as_deref(),
        ),

        Commands::ToJson { files, pretty } => cmd_to_json(&files, pretty),

        Commands::FromJson { files } => cmd_from_json(&files),
    }
}

/// Logs go to stderr; stdout carries only results.
fn init_logging(verbose: bool) {
    let default_directive = if verbose { "tq=debug" } else { "tq=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Settings given on the command line, highest priority.
struct QueryOverrides {
    strict: bool,
    program: Option<String>,
    args: Vec<String>,
}

fn cmd_query(
    expression: &str,
    files: &[PathBuf],
    overrides: QueryOverrides,
    config_flag: Option<&Path>,
) -> Result<()> {
    let mut config = resolve_config(config_flag)?;
    config.apply_env(|key| env::var(key).ok());

    if let Some(program) = overrides.program {
        config.filter.program = program;
    }
    if !overrides.args.is_empty() {
        config.filter.args = overrides.args;
    }
    if overrides.strict {
        config.strict = true;
    }
    config
        .validate()
        .map_err(|message| anyhow::anyhow!("invalid filter settings: {}", message))?;

    let input = read_inputs(files)?;
    let executor =
        QueryExecutor::new(config.filter_command()).with_options(config.query_options());
    let output = executor
        .execute(expression, &input.bytes)
        .with_context(|| format!("query failed for {}", input.name))?;

    if output.is_fallback() {
        debug!("printing raw filter output");
    }
    write_stdout(output.as_bytes())
}

fn cmd_to_json(files: &[PathBuf], pretty: bool) -> Result<()> {
    let input = read_inputs(files)?;
    let document = to_document(&input.bytes)
        .with_context(|| format!("failed to parse {}", input.name))?;

    let mut json = if pretty {
        document.to_json_pretty()?
    } else {
        document.to_json()?
    };
    json.push(b'\n');
    write_stdout(&json)
}

fn cmd_from_json(files: &[PathBuf]) -> Result<()> {
    let input = read_inputs(files)?;
    let document = Document::from_json(&input.bytes)
        .with_context(|| format!("{} is not a tq JSON document", input.name))?;
    write_stdout(&from_document(&document))
}

/// Resolve the config file.
///
/// Priority order:
/// 1. Explicit --config flag
/// 2. TQ_CONFIG environment variable (ignored with a warning if missing)
/// 3. Built-in defaults
fn resolve_config(flag: Option<&Path>) -> Result<QueryConfig> {
    let source = ConfigSource::locate(flag, |key| env::var(key).ok());

    if let ConfigSource::Env(path) = &source {
        if !path.exists() {
            eprintln!(
                "{}",
                format!(
                    "Warning: {} is set but path doesn't exist: {}",
                    CONFIG_ENV,
                    path.display()
                )
                .yellow()
            );
            return Ok(QueryConfig::default());
        }
    }

    debug!(?source, "loading configuration");
    Ok(source.load()?)
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(bytes).context("failed to write output")?;
    stdout.flush().context("failed to write output")?;
    Ok(())
}
