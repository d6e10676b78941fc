use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cuewatch_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cuewatch", version, about = "Playback-synchronized annotation overlay resolver")]
struct Cli {
    /// Log resolver decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.config/cuewatch/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a playback clock over an analysis payload
    Replay(commands::replay::ReplayArgs),
    /// Show how a payload loads
    Inspect(commands::inspect::InspectArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Config::load_from(path)?),
        None => Ok(Config::load_or_default()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Replay(args) => {
            load_config(cli.config.as_ref()).and_then(|cfg| commands::replay::run(args, &cfg))
        }
        Commands::Inspect(args) => {
            load_config(cli.config.as_ref()).and_then(|cfg| commands::inspect::run(args, &cfg))
        }
        Commands::Config { action } => commands::config::run(action, cli.config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
