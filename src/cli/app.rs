//! Main CLI application structure

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::suggest::NoSuggestion;
use super::{favourite, home, ingredient, inventory, recipe, suggest};
use crate::storage::{Config, Household};

#[derive(Parser)]
#[command(name = "larder")]
#[command(author, version, about = "Local-first kitchen manager that suggests what to cook next")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Home to act on (defaults to the configured home, or the only one)
    #[arg(long, global = true)]
    pub home: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new larder household
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage homes
    #[command(subcommand)]
    Home(home::HomeCommands),

    /// Manage the ingredient catalog
    #[command(subcommand)]
    Ingredient(ingredient::IngredientCommands),

    /// Manage recipes and their ingredient requirements
    #[command(subcommand)]
    Recipe(recipe::RecipeCommands),

    /// Manage a home's ingredient stock
    #[command(subcommand)]
    Inventory(inventory::InventoryCommands),

    /// Manage a home's favourite recipes
    #[command(subcommand)]
    Favourite(favourite::FavouriteCommands),

    /// Suggest a favourite recipe that can be cooked with what's in stock
    Suggest {
        /// Show every favourite in ranked order with its verdict
        #[arg(long)]
        explain: bool,
    },
}

/// Installs the stderr log subscriber
///
/// `LARDER_LOG` takes an `EnvFilter` directive and overrides `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("LARDER_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("larder_cli={}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Exit code for "nothing on the favourites list can be cooked"
///
/// clap already uses 2 for usage errors.
pub const NO_SUGGESTION_EXIT: u8 = 3;

/// Main entry point for the CLI
///
/// Errors are reported through [`Output`], so `--format json` callers get a
/// JSON error object on stderr.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => match Config::global_only() {
            Ok(config) => config.global.default_format.into(),
            Err(e) => {
                Output::new(OutputFormat::Text, cli.verbose).error(&format!("{:#}", e));
                return ExitCode::FAILURE;
            }
        },
    };
    let output = Output::new(format, cli.verbose);

    match execute(cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is::<NoSuggestion>() => {
            output.error(&e.to_string());
            ExitCode::from(NO_SUGGESTION_EXIT)
        }
        Err(e) => {
            output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli, output: &Output) -> Result<()> {
    let home_arg = cli.home.as_deref();

    output.verbose("Larder starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing household at: {}", path));
            let household = Household::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Created .larder directory at: {}", household.larder_dir().display()),
            );
            output.success(&format!(
                "Initialized larder household at {}",
                household.root().display()
            ));
        }

        Commands::Home(cmd) => home::run(cmd, output, home_arg)?,
        Commands::Ingredient(cmd) => ingredient::run(cmd, output)?,
        Commands::Recipe(cmd) => recipe::run(cmd, output)?,
        Commands::Inventory(cmd) => inventory::run(cmd, output, home_arg)?,
        Commands::Favourite(cmd) => favourite::run(cmd, output, home_arg)?,

        Commands::Suggest { explain } => {
            output.verbose_ctx("suggest", &format!("Suggesting recipe, explain={}", explain));
            suggest::run(output, home_arg, explain)?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}
