//! agentmod CLI - Command-line interface for the agentmod module host.

mod commands;
mod discovery;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use miette::Result;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agentmod")]
#[command(author, version, about = "Loadable agent module that hosts lifecycle plugins")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to agentmod.json (auto-detected if not specified)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Directory modules are loaded from (overrides the config file)
    #[arg(short = 'm', long, global = true)]
    module_path: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Call the hooks of the built-in sample module
    Sample,

    /// List supported item keys and loadable modules
    List {
        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Process a single item key and print the result
    Get {
        /// Item key, e.g. plugin.file[sample]
        key: String,
    },

    /// Write a default agentmod.json and create the plugin directory
    Init {
        /// Force overwrite existing agentmod.json
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    // Handle commands that don't need a config file separately
    match cli.command {
        Commands::Sample => return commands::sample::execute(),
        Commands::Init { force } => return commands::init::execute(cli.module_path, force),
        _ => {}
    }

    let config = discovery::load_config(cli.config.as_deref(), cli.module_path)?;

    match cli.command {
        Commands::List { detailed } => commands::list::execute(config, detailed),
        Commands::Get { key } => commands::get::execute(config, &key),
        Commands::Sample | Commands::Init { .. } => unreachable!("handled earlier"),
    }
}
