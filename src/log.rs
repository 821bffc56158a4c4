//! Program logging, built on `fern`.
//!
//! Messages always go to the console: warnings and errors to stderr, everything else to stdout.
//! During a run two files are also written to the scenario's output folder. The run log holds
//! every message at `info` level or above. The error log holds only warnings and errors, which
//! makes skipped countries and cells easy to find after a lenient run.
use anyhow::{Context, Result, anyhow};
use chrono::Local;
use fern::{Dispatch, FormatCallback};
use fern::colors::{Color, ColoredLevelConfig};
use log::{Level, LevelFilter, Record};
use std::env;
use std::fmt::Arguments;
use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Set once the global logger has been installed
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The log level used when neither the environment nor `settings.toml` gives one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The environment variable which overrides the log level from `settings.toml`
pub const LOG_LEVEL_ENV_VAR: &str = "LCOE_TABLES_LOG_LEVEL";

/// Every message at `info` level or above
const RUN_LOG_FILE_NAME: &str = "lcoe_tables_info.log";

/// Warnings and errors only
const ERROR_LOG_FILE_NAME: &str = "lcoe_tables_error.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Parse a log level name.
///
/// Names are case-insensitive: `off`, `error`, `warn`, `info`, `debug` or `trace`.
pub fn parse_level(name: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(name.trim()).map_err(|_| anyhow!("Unknown log level: {name}"))
}

/// Choose the log level, with the environment variable taking precedence over settings
fn resolve_level(log_level_from_settings: &str) -> Result<LevelFilter> {
    match env::var(LOG_LEVEL_ENV_VAR) {
        Ok(level) => parse_level(&level),
        Err(_) => parse_level(log_level_from_settings),
    }
}

/// Install the global logger.
///
/// # Arguments
///
/// * `log_level_from_settings` - The log level given in `settings.toml`
/// * `log_dir` - Folder for the run and error log files. No files are written if `None`.
pub fn init(log_level_from_settings: &str, log_dir: Option<&Path>) -> Result<()> {
    let level = resolve_level(log_level_from_settings)?;

    let mut dispatch = Dispatch::new().chain(console_dispatch(level));
    if let Some(log_dir) = log_dir {
        dispatch = dispatch.chain(file_dispatch(log_dir, level)?);
    }
    dispatch.apply().context("Logger already initialised")?;

    // Only reachable once, as a second `apply` fails above
    LOGGER_INIT
        .set(())
        .map_err(|()| anyhow!("Logger initialisation flag already set"))
}

fn level_colours() -> ColoredLevelConfig {
    ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta)
}

/// Write a console line: `[12:34:56 INFO] message`, with the level coloured if `colours` is given
fn write_console_line(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    colours: Option<&ColoredLevelConfig>,
) {
    let time = Local::now().format("%H:%M:%S");
    match colours {
        Some(colours) => out.finish(format_args!(
            "[{time} {}] {message}",
            colours.color(record.level())
        )),
        None => out.finish(format_args!("[{time} {}] {message}", record.level())),
    }
}

/// Console output, coloured only when writing to a terminal
fn console_dispatch(level: LevelFilter) -> Dispatch {
    let stdout_colours = std::io::stdout().is_terminal().then(level_colours);
    let stderr_colours = std::io::stderr().is_terminal().then(level_colours);

    Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(|metadata| metadata.level() > Level::Warn)
                .level(level)
                .format(move |out, message, record| {
                    write_console_line(out, message, record, stdout_colours.as_ref());
                })
                .chain(std::io::stdout()),
        )
        .chain(
            Dispatch::new()
                .level(level.min(LevelFilter::Warn))
                .format(move |out, message, record| {
                    write_console_line(out, message, record, stderr_colours.as_ref());
                })
                .chain(std::io::stderr()),
        )
}

/// File output: `2026-01-31 12:34:56 WARN  lcoe_tables::input::country: message`
fn file_dispatch(log_dir: &Path, level: LevelFilter) -> Result<Dispatch> {
    let create = |file_name: &str| {
        let file_path = log_dir.join(file_name);
        File::create(&file_path)
            .with_context(|| format!("Failed to create log file {}", file_path.display()))
    };

    Ok(Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {}: {message}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target()
            ));
        })
        .chain(
            Dispatch::new()
                .level(level.max(LevelFilter::Info))
                .chain(create(RUN_LOG_FILE_NAME)?),
        )
        .chain(
            Dispatch::new()
                .level(LevelFilter::Warn)
                .chain(create(ERROR_LOG_FILE_NAME)?),
        ))
}
