//! CLI command definitions and dispatch.

pub mod config;
pub mod replay;

use clap::{Parser, Subcommand};

use hs_access_core::config::AppConfig;
use hs_access_core::error::AppError;

use crate::output::OutputFormat;

/// HydroShare access-control engine
#[derive(Debug, Parser)]
#[command(name = "hs-access", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment; `config/{env}.toml` overlays the defaults
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a JSON-lines access script against a fresh engine
    Replay(replay::ReplayArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, app_config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Replay(args) => replay::execute(args, app_config, self.format).await,
            Commands::Config(args) => config::execute(args, &app_config, self.format),
        }
    }
}
