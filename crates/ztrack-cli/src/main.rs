mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ztrack", about = "Larval zebrafish eye and tail tracking")]
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
    /// Show video metadata
    Info(commands::info::InfoArgs),
    /// List tracker methods and their parameters
    Trackers(commands::trackers::TrackersArgs),
    /// Write a default tracking configuration
    Config(commands::config::ConfigArgs),
    /// Compute, show or delete the cached background of a video
    Background(commands::background::BackgroundArgs),
    /// Track every frame of a video
    Track(commands::track::TrackArgs),
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
        Commands::Trackers(args) => commands::trackers::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Background(args) => commands::background::run(args),
        Commands::Track(args) => commands::track::run(args),
    }
}
