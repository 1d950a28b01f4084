//! The command line interface for GUANO.
use crate::census::Census;
use crate::finance::{projection_value, total_projection_value, treatment_cost, yield_loss};
use crate::log;
use crate::output::{format_census_summary, format_projection_table};
use crate::projection::{ControlPolicy, YieldProjector};
use crate::scenario::Scenario;
use crate::settings::Settings;
use crate::year::parse_year_str;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;
pub mod soil;
use soil::SoilSubcommands;

/// The command line interface for GUANO.
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
#[derive(Args, Default)]
pub struct RunOpts {
    /// Years to project (e.g. "11;12;13" or "11-25"), overriding the scenario file
    #[arg(short, long)]
    pub years: Option<String>,
    /// Directory in which to write a log file
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Project yields for a scenario with and without treatment.
    Run {
        /// Path to the scenario file.
        scenario_path: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Validate a scenario file.
    Validate {
        /// Path to the scenario file.
        scenario_path: PathBuf,
    },
    /// Manage example scenarios.
    Example {
        /// The available subcommands for managing example scenarios.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Look up soil series.
    Soil {
        /// The available subcommands for the soil series table.
        #[command(subcommand)]
        subcommand: SoilSubcommands,
    },
    /// Manage the program settings file.
    Settings {
        /// The available subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run {
                scenario_path,
                opts,
            } => handle_run_command(&scenario_path, &opts, None),
            Self::Validate { scenario_path } => handle_validate_command(&scenario_path, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Soil { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start GUANO
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ guano --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `run` command.
pub fn handle_run_command(
    scenario_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger
    log::init(Some(settings.log_level.as_str()), opts.log_dir.as_deref())
        .context("Failed to initialise logging.")?;

    // Load the scenario to run
    let scenario = Scenario::from_path(scenario_path).context("Failed to load scenario.")?;
    info!("Loaded scenario from {}", scenario_path.display());

    let years = opts
        .years
        .as_deref()
        .map(parse_year_str)
        .transpose()
        .context("Invalid --years option.")?;

    let projector = YieldProjector::new(scenario.parameters.clone())?;
    let input = scenario.projection_input(ControlPolicy::Controlled, years)?;
    let comparison = projector
        .compare(&input)
        .context("Failed to project yields.")?;
    info!(
        "Projected {} years for a stand of {} palms ({} infected)",
        comparison.years.len(),
        input.total_palm_count,
        input.infected_palm_count
    );

    let decimal_places = settings.decimal_places;
    if let Some(census) = &scenario.census {
        print_census_summary(census, &scenario, decimal_places);
    } else {
        warn!("No census given, so treatment costs cannot be estimated");
    }

    let values = projection_value(&comparison, scenario.price);
    println!(
        "Current yield: {:.decimal_places$} t/year\n",
        input.base_yield.value()
    );
    print!(
        "{}",
        format_projection_table(&comparison, &values, decimal_places)
    );
    println!(
        "\nValue of yield saved by treatment: RM {:.decimal_places$}",
        total_projection_value(&comparison, scenario.price).value()
    );

    Ok(())
}

/// Print the costs of treatment and the yield lost for a census
fn print_census_summary(census: &Census, scenario: &Scenario, decimal_places: usize) {
    let costs = treatment_cost(census, &scenario.costs);
    let loss = yield_loss(census, &scenario.parameters.census, scenario.price);
    println!(
        "{}",
        format_census_summary(census, &costs, &loss, decimal_places)
    );
}

/// Handle the `validate` command.
pub fn handle_validate_command(scenario_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(settings.log_level.as_str()), None).context("Failed to initialise logging.")?;

    // Load/validate the scenario
    let scenario = Scenario::from_path(scenario_path).context("Failed to validate scenario.")?;

    // Check that the scenario can be projected under the configured soil policy
    let projector = YieldProjector::new(scenario.parameters.clone())?;
    let input = scenario.projection_input(ControlPolicy::Controlled, None)?;
    projector
        .factors(&input)
        .context("Failed to validate scenario.")?;
    input.validate().context("Failed to validate scenario.")?;
    info!("Scenario validation successful!");

    Ok(())
}
