//! Command line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{ConfigError, ConfigLoader, Settings};

#[derive(Debug, Parser)]
#[command(
    name = "reserva-rs",
    about = "Booking and catalog backend",
    long_version = crate::clap_long_version()
)]
pub struct Cli {
    /// Load a single configuration file instead of the layered config
    /// directory.
    #[arg(short, long, global = true, env = "RESERVA_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand, Default)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[default]
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

/// Resolves settings from the CLI flags and environment.
pub fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    match &cli.config {
        Some(path) => ConfigLoader::with_file(path.clone()),
        None => ConfigLoader::new().load(),
    }
}
