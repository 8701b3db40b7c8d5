//! Lowcut CLI - offline front end for the Butterworth low-cut filter.

mod commands;
mod error;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lowcut")]
#[command(author, version, about = "Butterworth low-cut filter CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a WAV file through the low-cut stage
    Render(commands::render::RenderArgs),

    /// Print the designed filter's magnitude response
    Response(commands::response::ResponseArgs),

    /// Show the parameter layout
    Params(commands::params::ParamsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Response(args) => commands::response::run(args),
        Commands::Params(args) => commands::params::run(args),
    }
}
