// rentratio - interactive price-to-rent explorer for ZHVI/ZORI data

mod exit_codes;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use rentratio_cli::chart::{PanelTicks, TerminalChart};
use rentratio_cli::{load_dataset, SessionController, SessionExit};
use rentratio_config::{AnalyzerConfig, ConfigError};
use rentratio_io::LoadError;

use exit_codes::{config_exit_code, load_exit_code, EXIT_ERROR, EXIT_SUCCESS};

/// Fallback size when stdout is not a terminal.
const DEFAULT_SIZE: (u16, u16) = (100, 32);
/// Rows left free under the chart for the prompt and the typed line.
const PROMPT_ROWS: u16 = 2;

#[derive(Parser)]
#[command(name = "rentratio")]
#[command(about = "Compare home values, rents and price-to-rent ratios across US cities")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Config file (default: ./rentratio.toml when present, else built-in settings)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(_) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<SessionExit, CliError> {
    let config = AnalyzerConfig::discover(cli.config.as_deref()).map_err(CliError::config)?;
    let data = load_dataset(&config).map_err(CliError::load)?;

    let stdout = io::stdout();
    let colored = stdout.is_terminal();
    let (width, height) = if colored {
        crossterm::terminal::size().unwrap_or(DEFAULT_SIZE)
    } else {
        DEFAULT_SIZE
    };

    let chart = TerminalChart::new(stdout, width, height.saturating_sub(PROMPT_ROWS))
        .with_color(colored)
        .with_ticks(PanelTicks::from(&config.panels));
    let mut session = SessionController::new(&data, config.default_regions(), chart);

    session
        .run(io::stdin().lock(), io::stdout())
        .map_err(|e| CliError::io(format!("input closed unexpectedly: {}", e)))
}

/// Config section that configures the named source table.
fn source_section(table: &str) -> &'static str {
    match table {
        "zori" => "[secondary]",
        _ => "[primary]",
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::Read { .. } => "pass --config <FILE> or create ./rentratio.toml",
            ConfigError::Parse(_) | ConfigError::Validation(_) => {
                "known sections: [primary], [secondary], [regions], [[duplicates]], [panels]"
            }
        };
        Self {
            code: config_exit_code(&err),
            message: err.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    pub fn load(err: LoadError) -> Self {
        let section = source_section(err.table());
        let hint = match &err {
            LoadError::SourceUnavailable { .. } => Some(format!("set {section} path in rentratio.toml")),
            LoadError::SchemaMismatch { .. } => {
                Some(format!("check {section} admin_columns in rentratio.toml"))
            }
            LoadError::InvalidPeriodLabel { .. } => {
                Some(format!("check {section} period_suffix_len in rentratio.toml"))
            }
            _ => None,
        };
        Self {
            code: load_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }
}
