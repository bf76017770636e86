//! Command-line interface for `jeq`.
//!
//! Compares two JSON (or YAML) documents and prints the first difference, or
//! checks that one document contains the other as a subtree. The exit code
//! tells scripts the outcome: 0 when the documents match, 1 when they do not,
//! 2 when the inputs or flags could not be used.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use jeq_core::{
    compare_with, find_missing_subtree, ArrayMode, CompareOptions, Difference, Node, Path,
};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

const EXIT_MATCH: i32 = 0;
const EXIT_MISMATCH: i32 = 1;
const EXIT_ERROR: i32 = 2;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    /// One human-readable line per finding.
    #[default]
    Text,
    /// A single JSON report object.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "jeq",
    version,
    about = "Check JSON documents for structural equivalence.",
    long_about = "Prints the first difference between ACTUAL and EXPECTED.\n\
                  When EXPECTED is omitted it is read from STDIN.\n\
                  Empty input is treated as an absent (null) document."
)]
struct Cli {
    /// Compare arrays as sets (order and repetition are ignored).
    #[arg(long = "set", action = ArgAction::SetTrue)]
    set: bool,

    /// JSON array of comparison options, e.g. '["SET"]'.
    #[arg(long = "opts", default_value = "[]")]
    opts: String,

    /// Check that ACTUAL contains EXPECTED as a subtree instead of comparing.
    #[arg(long = "contains", action = ArgAction::SetTrue)]
    contains: bool,

    /// Read inputs as YAML instead of JSON.
    #[arg(long = "yaml", action = ArgAction::SetTrue)]
    yaml: bool,

    /// Output format.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write output to FILE instead of STDOUT.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Positional inputs (ACTUAL \[EXPECTED]).
    #[arg(value_name = "FILE")]
    inputs: Vec<OsString>,
}

#[derive(Debug, Serialize)]
struct CompareReport<'a> {
    equivalent: bool,
    mode: ArrayMode,
    difference: Option<&'a Difference>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContainsReport<'a> {
    contained: bool,
    missing: Option<&'a Path>,
}

fn main() {
    let code = match Cli::try_parse() {
        Ok(cli) => {
            init_tracing(cli.verbose);
            match run(&cli) {
                Ok(code) => code,
                Err(err) => {
                    let _ = writeln!(io::stderr(), "{err:#}");
                    EXIT_ERROR
                }
            }
        }
        Err(err) => {
            let code = if err.use_stderr() { EXIT_ERROR } else { EXIT_MATCH };
            let _ = err.print();
            code
        }
    };
    std::process::exit(code);
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "jeq=debug,jeq_core=debug",
        _ => "jeq=trace,jeq_core=trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

fn run(cli: &Cli) -> Result<i32> {
    let (first, second) = match cli.inputs.len() {
        1 => (InputSource::File(path_from(&cli.inputs[0])?), InputSource::Stdin),
        2 => (
            InputSource::File(path_from(&cli.inputs[0])?),
            InputSource::File(path_from(&cli.inputs[1])?),
        ),
        _ => bail!("expected ACTUAL [EXPECTED]; see --help"),
    };

    let actual_text = read_input(&first)?;
    let expected_text = read_input(&second)?;
    let actual = parse_document(&actual_text, cli.yaml).context("failed to parse ACTUAL")?;
    let expected = parse_document(&expected_text, cli.yaml).context("failed to parse EXPECTED")?;

    let options = build_options(cli)?;
    tracing::debug!(mode = %options.array_mode(), contains = cli.contains, "inputs parsed");

    let (rendered, matched) = if cli.contains {
        check_contains(actual.as_ref(), expected.as_ref(), cli.format)?
    } else {
        check_equivalent(actual.as_ref(), expected.as_ref(), &options, cli.format)?
    };

    if let Some(path) = &cli.output {
        fs::write(path, rendered.as_bytes())
            .with_context(|| format!("failed to write output to {}", path.display()))?;
    } else {
        print!("{rendered}");
        io::stdout().flush().ok();
    }

    Ok(if matched { EXIT_MATCH } else { EXIT_MISMATCH })
}

fn check_equivalent(
    actual: Option<&Node>,
    expected: Option<&Node>,
    options: &CompareOptions,
    format: OutputFormat,
) -> Result<(String, bool)> {
    let difference = compare_with(actual, expected, options);
    let matched = difference.is_none();
    let rendered = match format {
        OutputFormat::Text => match &difference {
            Some(difference) => format!("JSON document {difference}\n"),
            None => String::new(),
        },
        OutputFormat::Json => {
            let report = CompareReport {
                equivalent: matched,
                mode: options.array_mode(),
                difference: difference.as_ref(),
                message: difference.as_ref().map(Difference::describe),
            };
            let mut json = serde_json::to_string(&report).context("failed to serialize report")?;
            json.push('\n');
            json
        }
    };
    Ok((rendered, matched))
}

fn check_contains(
    actual: Option<&Node>,
    subtree: Option<&Node>,
    format: OutputFormat,
) -> Result<(String, bool)> {
    let Some(subtree) = subtree else {
        bail!("--contains requires a non-empty EXPECTED document");
    };
    let missing = match actual {
        Some(actual) => find_missing_subtree(actual, subtree),
        None => Some(Path::root()),
    };
    let matched = missing.is_none();
    let rendered = match format {
        OutputFormat::Text => match &missing {
            Some(path) => format!("JSON document does not contain {path} of the subtree\n"),
            None => String::new(),
        },
        OutputFormat::Json => {
            let report = ContainsReport { contained: matched, missing: missing.as_ref() };
            let mut json = serde_json::to_string(&report).context("failed to serialize report")?;
            json.push('\n');
            json
        }
    };
    Ok((rendered, matched))
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

fn path_from(input: &OsString) -> Result<PathBuf> {
    let path = PathBuf::from(input);
    if path.as_os_str().is_empty() {
        bail!("expected file path; got empty string");
    }
    Ok(path)
}

fn read_input(source: &InputSource) -> Result<String> {
    match source {
        InputSource::File(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("failed to read STDIN")?;
            Ok(buffer)
        }
    }
}

/// Whitespace-only input is an absent document rather than a parse error.
fn parse_document(input: &str, yaml: bool) -> Result<Option<Node>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    let node = if yaml { Node::from_yaml_str(input)? } else { Node::from_json_str(input)? };
    Ok(Some(node))
}

fn build_options(cli: &Cli) -> Result<CompareOptions> {
    let mut options = CompareOptions::default();
    for mode in parse_opts_json(&cli.opts)? {
        options = options.with_array_mode(mode);
    }
    if cli.set {
        options = options.with_array_mode(ArrayMode::Set);
    }
    Ok(options)
}

fn parse_opts_json(raw: &str) -> Result<Vec<ArrayMode>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("--opts requires a JSON array");
    }

    let value: Value = serde_json::from_str(trimmed)
        .with_context(|| format!("failed to parse --opts JSON: {trimmed}"))?;
    let Value::Array(items) = value else {
        bail!("--opts expects a JSON array, but received {value}");
    };

    let mut parsed = Vec::with_capacity(items.len());
    for item in &items {
        let Value::String(name) = item else {
            bail!("unsupported --opts entry: {item}");
        };
        let mode = name
            .parse::<ArrayMode>()
            .map_err(|err| anyhow!("unsupported --opts option: {err}"))?;
        parsed.push(mode);
    }
    Ok(parsed)
}
