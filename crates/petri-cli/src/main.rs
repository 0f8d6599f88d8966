mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "petri", about = "Microscope acquisition preprocessing tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show acquisition stack metadata
    Info(commands::info::InfoArgs),
    /// Preview how a directory of plane files groups into wells
    Scan(commands::scan::ScanArgs),
    /// Print or save a default batch config
    Config(commands::config::ConfigArgs),
    /// Pick one in-focus z-slice per frame from a z-stack
    Focus(commands::focus::FocusArgs),
    /// Run a preprocessing batch
    Run(commands::run::RunArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Scan(args) => commands::scan::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Focus(args) => commands::focus::run(args),
        Commands::Run(args) => commands::run::run(args),
    }
}
