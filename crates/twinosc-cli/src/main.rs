//! twinosc CLI - offline driver for the twinosc oscillator core.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "twinosc")]
#[command(author, version, about = "Two-voice unison oscillator core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the oscillator core offline with fixed control values and report the result
    Render(commands::render::RenderArgs),

    /// Print the unison and relative-tuning quantizer tables
    Quantize(commands::quantize::QuantizeArgs),

    /// Show, create, and validate the settings file
    Settings(commands::settings::SettingsArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so report output on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Quantize(args) => commands::quantize::run(args),
        Commands::Settings(args) => commands::settings::run(args),
    }
}
