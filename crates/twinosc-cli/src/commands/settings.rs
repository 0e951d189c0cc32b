//! Settings file management commands.

use anyhow::{Context, bail};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use twinosc_config::{
    CalibrationEntry, ConfigError, Settings, ensure_user_config_dir, load_from_or_default,
    settings_path,
};

#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsCommand,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the effective settings, with every calibration channel resolved
    Show {
        /// Settings file (defaults to the user settings file)
        path: Option<PathBuf>,
    },

    /// Write a settings file with default values
    Init {
        /// Destination (defaults to the user settings file)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check a settings file and list every problem
    Validate {
        /// Settings file (defaults to the user settings file)
        path: Option<PathBuf>,
    },

    /// Print the user settings file location
    Path,
}

pub fn run(args: SettingsArgs) -> anyhow::Result<()> {
    match args.command {
        SettingsCommand::Show { path } => show(path.unwrap_or_else(settings_path)),
        SettingsCommand::Init { path, force } => init(path, force),
        SettingsCommand::Validate { path } => validate(&path.unwrap_or_else(settings_path)),
        SettingsCommand::Path => {
            println!("{}", settings_path().display());
            Ok(())
        }
    }
}

fn show(path: PathBuf) -> anyhow::Result<()> {
    let settings = load_from_or_default(&path)
        .with_context(|| format!("loading settings from {}", path.display()))?;

    let source = if path.is_file() {
        path.display().to_string()
    } else {
        format!("defaults ({} not found)", path.display())
    };

    let mut effective = settings.clone();
    effective.calibration = settings
        .calibration()
        .iter()
        .map(|(channel, cal)| (channel.name().to_string(), CalibrationEntry::from(cal)))
        .collect();

    println!("# Source: {source}");
    print!("{}", effective.to_toml()?);
    Ok(())
}

fn init(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path,
        None => ensure_user_config_dir()?.join(twinosc_config::SETTINGS_FILE),
    };

    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Settings::with_full_calibration().save(&path)?;
    tracing::info!(path = %path.display(), "settings written");
    println!("Wrote {}", path.display());
    Ok(())
}

fn validate(path: &Path) -> anyhow::Result<()> {
    match Settings::load(path) {
        Ok(settings) => {
            println!(
                "{}: OK ({} Hz, {} calibration entries)",
                path.display(),
                settings.sample_rate,
                settings.calibration.len()
            );
            Ok(())
        }
        Err(ConfigError::Validation(err)) => {
            println!("{}: invalid", path.display());
            for problem in err.errors() {
                println!("  - {problem}");
            }
            bail!("{} problem(s) in {}", err.errors().len(), path.display())
        }
        Err(err) => Err(err.into()),
    }
}
