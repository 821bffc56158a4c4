//! The `settings` command: inspecting and editing the program settings file.
use crate::log::{LOG_LEVEL_ENV_VAR, parse_level};
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::env;
use std::fmt::Write;

/// Subcommands for settings
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Open the settings file in a text editor, creating it first if needed
    Edit,
    /// Print the path the settings file is read from
    Path,
    /// Print a settings file with every option commented out at its default
    DumpDefault,
    /// Print the settings a run would use, after environment overrides
    Show,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::Edit => handle_edit_command()?,
            Self::Path => println!("{}", get_settings_file_path().display()),
            Self::DumpDefault => print!("{}", Settings::default_file_contents()),
            Self::Show => handle_show_command()?,
        }

        Ok(())
    }
}

/// Handle the `edit` command
fn handle_edit_command() -> Result<()> {
    let file_path = get_settings_file_path();
    if Settings::write_default_file(&file_path)? {
        println!("Created settings file: {}", file_path.display());
    }

    println!("Opening settings file for editing: {}", file_path.display());
    edit::edit_file(&file_path)
        .with_context(|| format!("Failed to open editor for {}", file_path.display()))?;

    Ok(())
}

/// Handle the `show` command
fn handle_show_command() -> Result<()> {
    let settings = Settings::load().context("Failed to load settings.")?;
    let env_level = env::var(LOG_LEVEL_ENV_VAR).ok();
    print!(
        "{}",
        describe_settings(&settings, env_level.as_deref(), rayon::current_num_threads())?
    );

    Ok(())
}

/// Describe the effective settings, one per line.
///
/// `env_level` is the value of the log level environment variable, if set, and `cores` the number
/// of worker threads used when `threads` is 0.
fn describe_settings(settings: &Settings, env_level: Option<&str>, cores: usize) -> Result<String> {
    let mut out = String::new();

    // Fail here rather than at the start of a run
    parse_level(env_level.unwrap_or(&settings.log_level))?;
    match env_level {
        Some(level) => writeln!(out, "log_level = {level} (from {LOG_LEVEL_ENV_VAR})")?,
        None => writeln!(out, "log_level = {}", settings.log_level)?,
    }
    writeln!(out, "overwrite = {}", settings.overwrite)?;
    writeln!(
        out,
        "lenient = {} ({})",
        settings.lenient,
        if settings.lenient {
            "invalid rows and cells are skipped"
        } else {
            "invalid rows and cells stop the run"
        }
    )?;
    match settings.threads {
        0 => writeln!(out, "threads = 0 (one per core: {cores})")?,
        threads => writeln!(out, "threads = {threads}")?,
    }

    Ok(out)
}
