//! The command line interface for the program.
use crate::log;
use crate::observer::LogObserver;
use crate::output::{create_output_directory, get_output_dir};
use crate::run::{load_countries, run};
use crate::scenario::DemandScenario;
use crate::settings::Settings;
use crate::tables::GenerationOptions;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the program.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args)]
pub struct RunOpts {
    /// Annual electricity consumption per household, in kWh
    #[arg(short, long)]
    pub scenario: DemandScenario,
    /// Directory in which the scenario's output folder is created [default: lcoes]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Whether to skip invalid country rows and result cells instead of stopping
    #[arg(long)]
    pub lenient: bool,
    /// Number of worker threads (0 means one per core)
    #[arg(long)]
    pub threads: Option<usize>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Generate the LCOE tables for a set of countries.
    Run {
        /// Path to the country specifications CSV file.
        specs_path: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage example country specifications.
    Example {
        /// The available subcommands for managing examples.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a country specifications file.
    Validate {
        /// Path to the country specifications CSV file.
        specs_path: PathBuf,
        /// Whether to skip invalid rows instead of failing
        #[arg(long)]
        lenient: bool,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { specs_path, opts } => handle_run_command(&specs_path, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate {
                specs_path,
                lenient,
            } => handle_validate_command(&specs_path, lenient, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ lcoe-tables --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help in markdown format
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Handle the `run` command.
pub fn handle_run_command(
    specs_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let mut settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // These settings can be overridden by command-line arguments
    if opts.overwrite {
        settings.overwrite = true;
    }
    if opts.lenient {
        settings.lenient = true;
    }
    if let Some(threads) = opts.threads {
        settings.threads = threads;
    }

    // Each scenario gets its own subfolder, so only this scenario's outputs can be overwritten
    let output_dir = get_output_dir(opts.output_dir.as_deref(), opts.scenario);
    let output_path = output_dir.as_path();
    let overwrite =
        create_output_directory(output_path, settings.overwrite).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(&settings.log_level, Some(output_path)).context("Failed to initialise logging.")?;

    info!("Country specifications: {}", specs_path.display());
    info!("Demand scenario: {} kWh/household/year", opts.scenario);
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let options = GenerationOptions {
        lenient: settings.lenient,
        threads: settings.threads,
    };
    let results = run(specs_path, opts.scenario, output_path, &options, &LogObserver)?;
    info!(
        "Generated tables for {} countries",
        results.tables.countries.len()
    );

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(
    specs_path: &Path,
    lenient: bool,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    // Load/validate the country specifications
    let countries = load_countries(specs_path, lenient || settings.lenient, &LogObserver)
        .context("Failed to validate country specifications.")?;
    info!(
        "Validation successful! Found {} valid countries.",
        countries.len()
    );

    Ok(())
}
