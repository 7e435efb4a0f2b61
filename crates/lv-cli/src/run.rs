//! Line-oriented obfuscation runs.
//!
//! Reads input line by line, pushes each line through one engine session
//! and writes the result to the output. Mapping snapshots can seed the
//! session and be written after it.

use crate::exit_codes::ExitCode;
use lv_obfuscate::{
    IpStyle, Mappings, NameStyle, ObfuscateError, Obfuscator, ObfuscatorConfig,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// How each input line is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Every line goes through the string pipeline.
    #[default]
    Text,
    /// Every line is a JSON document; other lines fall back to text.
    Json,
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Mode::Text),
            "json" | "jsonl" => Ok(Mode::Json),
            _ => Err(format!("unknown mode: {}", s)),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Text => write!(f, "text"),
            Mode::Json => write!(f, "json"),
        }
    }
}

/// Parse an IP style flag value.
pub fn parse_ip_style(s: &str) -> Result<IpStyle, String> {
    IpStyle::parse_str(s).ok_or_else(|| format!("unknown ip style: {}", s))
}

/// Parse a name style flag value.
pub fn parse_name_style(s: &str) -> Result<NameStyle, String> {
    NameStyle::parse_str(s).ok_or_else(|| format!("unknown name style: {}", s))
}

/// Errors from a CLI run.
#[derive(Error, Debug)]
pub enum RunError {
    /// Engine config or snapshot problem.
    #[error(transparent)]
    Engine(#[from] ObfuscateError),

    /// Input could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Reading or writing failed mid-stream.
    #[error("i/o error while processing {input}: {source}")]
    Stream {
        input: String,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    /// Exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RunError::Engine(ObfuscateError::Io(_)) => ExitCode::IoError,
            RunError::Engine(_) => ExitCode::ArgsError,
            RunError::Input { .. } | RunError::Stream { .. } => ExitCode::IoError,
        }
    }
}

/// Everything a run needs, resolved from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Input file; stdin when absent or `-`.
    pub input: Option<PathBuf>,
    pub mode: Mode,
    /// Engine config file (JSON or TOML).
    pub config_path: Option<PathBuf>,
    pub coefficient: Option<f64>,
    pub date_offset_days: Option<i64>,
    pub ip_style: Option<IpStyle>,
    pub name_style: Option<NameStyle>,
    /// Snapshot restored before the first line.
    pub mappings_in: Option<PathBuf>,
    /// Snapshot written after the last line.
    pub mappings_out: Option<PathBuf>,
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub lines: usize,
    /// Lines in JSON mode that did not parse and went through the text pipeline.
    pub non_json: usize,
}

/// Build the engine config: file (or defaults), then flag overrides.
pub fn build_config(opts: &RunOptions) -> Result<ObfuscatorConfig, RunError> {
    let mut config = match &opts.config_path {
        Some(path) => {
            let config = ObfuscatorConfig::load(path)?;
            debug!(path = %path.display(), "loaded engine config");
            config
        }
        None => ObfuscatorConfig::default(),
    };

    if let Some(coefficient) = opts.coefficient {
        config.coefficient = coefficient;
    }
    if let Some(days) = opts.date_offset_days {
        config.date_offset_days = days;
    }
    if let Some(style) = opts.ip_style {
        config.ip_style = style;
    }
    if let Some(style) = opts.name_style {
        config.name_style = style;
    }

    config.validate()?;
    Ok(config)
}

/// Obfuscate every line of `reader` into `writer`.
///
/// Invalid UTF-8 is replaced lossily; line terminators are kept.
pub fn process<R: BufRead, W: Write>(
    engine: &mut Obfuscator,
    mode: Mode,
    mut reader: R,
    writer: &mut W,
) -> io::Result<RunStats> {
    let mut stats = RunStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let raw = String::from_utf8_lossy(&buf);
        let (line, newline) = match raw.strip_suffix('\n') {
            Some(line) => (line, true),
            None => (&*raw, false),
        };

        let out = match mode {
            Mode::Text => engine.obfuscate_string(line),
            Mode::Json => match serde_json::from_str::<serde_json::Value>(line) {
                Ok(doc) => engine.obfuscate_json(&doc).to_string(),
                Err(_) => {
                    stats.non_json += 1;
                    engine.obfuscate_string(line)
                }
            },
        };

        writer.write_all(out.as_bytes())?;
        if newline {
            writer.write_all(b"\n")?;
        }
        stats.lines += 1;
    }

    writer.flush()?;
    Ok(stats)
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>, RunError> {
    match path {
        None => Ok(Box::new(BufReader::new(io::stdin()))),
        Some(p) if p == Path::new("-") => Ok(Box::new(BufReader::new(io::stdin()))),
        Some(p) => {
            let file = File::open(p).map_err(|source| RunError::Input {
                path: p.display().to_string(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Run one obfuscation session from `opts`, writing to stdout.
pub fn run(opts: &RunOptions) -> Result<RunStats, RunError> {
    let config = build_config(opts)?;
    let mut engine = Obfuscator::new(config)?;

    if let Some(path) = &opts.mappings_in {
        let mappings = Mappings::load(path)?;
        engine.restore(&mappings);
        info!(path = %path.display(), entries = mappings.total_entries(), "restored mappings");
    }

    let input_name = opts
        .input
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    let reader = open_input(opts.input.as_deref())?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    let stats =
        process(&mut engine, opts.mode, reader, &mut writer).map_err(|source| RunError::Stream {
            input: input_name.clone(),
            source,
        })?;

    if stats.non_json > 0 {
        warn!(
            count = stats.non_json,
            "lines were not valid JSON and were obfuscated as text"
        );
    }

    if let Some(path) = &opts.mappings_out {
        let mappings = engine.mappings();
        mappings.save(path)?;
        info!(path = %path.display(), entries = mappings.total_entries(), "wrote mappings");
    }

    info!(
        input = %input_name,
        mode = %opts.mode,
        lines = stats.lines,
        mapped = engine.store().total_len(),
        "obfuscation finished"
    );
    Ok(stats)
}
