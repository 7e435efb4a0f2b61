//! logveil - obfuscate identifying data in logs and JSON documents.
//!
//! Reads lines from a file or stdin, writes obfuscated lines to stdout and
//! logs to stderr.

use clap::{Args, Parser};
use lv_cli::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use lv_cli::run::{parse_ip_style, parse_name_style};
use lv_cli::{run, ExitCode, Mode, RunOptions};
use lv_obfuscate::{IpStyle, NameStyle};
use std::path::PathBuf;

/// Deterministic, format-preserving obfuscation for logs and documents
#[derive(Parser)]
#[command(name = "logveil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to read (stdin when absent or "-")
    input: Option<PathBuf>,

    /// Engine config file (JSON or TOML)
    #[arg(short, long, env = "LOGVEIL_CONFIG")]
    config: Option<PathBuf>,

    /// Line interpretation: text or json
    #[arg(long, default_value = "text")]
    mode: Mode,

    #[command(flatten)]
    engine: EngineOpts,

    /// Restore a mapping snapshot before the run
    #[arg(long, value_name = "PATH")]
    mappings_in: Option<PathBuf>,

    /// Write the mapping snapshot after the run
    #[arg(long, value_name = "PATH")]
    mappings_out: Option<PathBuf>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Overrides for the engine config
#[derive(Args, Debug)]
struct EngineOpts {
    /// Multiplier for integers, floats and ports
    #[arg(long)]
    coefficient: Option<f64>,

    /// Days added to every YYYY-MM-DD date
    #[arg(long, value_name = "DAYS", allow_hyphen_values = true)]
    date_offset: Option<i64>,

    /// IPv4 substitute style: keep-ends or private-range
    #[arg(long, value_parser = parse_ip_style)]
    ip_style: Option<IpStyle>,

    /// Name substitute style: readable or hash-prefixed
    #[arg(long, value_parser = parse_name_style)]
    name_style: Option<NameStyle>,
}

/// Logging options
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Log format on stderr: human or jsonl
    #[arg(long, env = "LOGVEIL_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn run_options(self) -> RunOptions {
        RunOptions {
            input: self.input,
            mode: self.mode,
            config_path: self.config,
            coefficient: self.engine.coefficient,
            date_offset_days: self.engine.date_offset,
            ip_style: self.engine.ip_style,
            name_style: self.engine.name_style,
            mappings_in: self.mappings_in,
            mappings_out: self.mappings_out,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version also land here
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let log_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet);
    let log_config = LogConfig::from_env(log_level, cli.global.log_format);
    init_logging(&log_config);

    let exit_code = match run(&cli.run_options()) {
        Ok(_) => ExitCode::Clean,
        Err(err) => {
            let code = err.exit_code();
            tracing::debug!(code = %code, "run failed");
            eprintln!("error: {}", err);
            code
        }
    };

    std::process::exit(exit_code.as_i32());
}
