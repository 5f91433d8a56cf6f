use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{builder::PossibleValue, Parser, ValueEnum};
use env_logger::Env;
use log::{debug, info, LevelFilter};
use matrix::{matrix::Matrix, parse_error::MatrixParseError};

#[derive(Clone, Debug, PartialEq, Eq)]
enum View {
    Rows,
    Cols,
    Both,
}

impl Display for View {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rows => f.write_str("rows"),
            Self::Cols => f.write_str("cols"),
            Self::Both => f.write_str("both"),
        }
    }
}

impl ValueEnum for View {
    fn value_variants<'a>() -> &'a [Self] {
        &[View::Rows, View::Cols, View::Both]
    }
    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            View::Rows => Some(PossibleValue::new("rows")),
            View::Cols => Some(PossibleValue::new("cols").alias("columns")),
            View::Both => Some(PossibleValue::new("both")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl ValueEnum for Format {
    fn value_variants<'a>() -> &'a [Self] {
        &[Format::Text, Format::Json]
    }
    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Format::Text => Some(PossibleValue::new("text")),
            Format::Json => Some(PossibleValue::new("json")),
        }
    }
}

#[derive(Clone, Debug)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl ValueEnum for LogLevel {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            LogLevel::Off,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }
    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }))
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Print an integer matrix read from a file or stdin, by rows, by columns, or both.
#[derive(Parser, Debug)]
struct Args {
    /// Whitespace-separated integers, one row per line. Reads stdin if absent or `-`.
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    #[arg(default_value_t = View::Both, long)]
    view: View,
    #[arg(default_value_t = Format::Text, long)]
    format: Format,
    /// Overrides RUST_LOG.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

#[derive(Debug)]
enum AppError {
    Io(Option<PathBuf>, io::Error),
    Parse(MatrixParseError),
    Json(serde_json::Error),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(Some(path), e) => {
                f.write_fmt(format_args!("could not read {}: {}", path.display(), e))
            }
            AppError::Io(None, e) => f.write_fmt(format_args!("could not read stdin: {}", e)),
            AppError::Parse(e) => f.write_fmt(format_args!("malformed matrix: {}", e)),
            AppError::Json(e) => f.write_fmt(format_args!("could not write JSON: {}", e)),
        }
    }
}

impl From<MatrixParseError> for AppError {
    fn from(value: MatrixParseError) -> Self {
        AppError::Parse(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError::Json(value)
    }
}

fn read_input(path: Option<&Path>) -> Result<String, AppError> {
    match path {
        Some(path) if path != Path::new("-") => {
            debug!("Reading matrix from {}", path.display());
            fs::read_to_string(path).map_err(|e| AppError::Io(Some(path.to_owned()), e))
        }
        _ => {
            debug!("Reading matrix from stdin");
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| AppError::Io(None, e))?;
            Ok(text)
        }
    }
}

/// Text files conventionally end in a newline, which would otherwise parse as an empty
/// final row. Only one line terminator is removed: a blank line at the end is still an error.
fn strip_final_newline(text: &str) -> &str {
    match text.strip_suffix('\n') {
        Some(text) => text.strip_suffix('\r').unwrap_or(text),
        None => text,
    }
}

/// One line per inner vector, values separated by single spaces.
fn grid(lines: &[Vec<i64>]) -> String {
    lines
        .iter()
        .map(|line| {
            line.iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render(m: &Matrix, view: &View, format: &Format) -> Result<String, AppError> {
    let rendered = match (format, view) {
        (Format::Text, View::Rows) => m.to_string(),
        (Format::Text, View::Cols) => grid(&m.cols()),
        (Format::Text, View::Both) => format!("rows:\n{}\ncols:\n{}", m, grid(&m.cols())),
        (Format::Json, View::Rows) => serde_json::to_string(m)?,
        (Format::Json, View::Cols) => serde_json::to_string(&m.cols())?,
        (Format::Json, View::Both) => {
            let mut both = serde_json::Map::new();
            both.insert("rows".to_owned(), serde_json::to_value(m)?);
            both.insert("cols".to_owned(), serde_json::to_value(m.cols())?);
            serde_json::to_string(&both)?
        }
    };
    Ok(rendered)
}

fn run(args: &Args) -> Result<String, AppError> {
    let text = read_input(args.input.as_deref())?;
    debug!("Read {} bytes", text.len());
    let m = Matrix::parse(strip_final_newline(&text))?;
    info!("Parsed {}x{} matrix", m.row_count(), m.col_count());
    render(&m, &args.view, &args.format)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = args.log_level.clone() {
        logger.filter_level(level.into());
    }
    logger.init();

    match run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
