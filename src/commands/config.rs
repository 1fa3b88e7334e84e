//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use hs_access_core::config::AppConfig;
use hs_access_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration
    Show,
    /// Check that the configuration is usable
    Validate,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match args.command {
        ConfigCommand::Show => output::print_item(config, format),
        ConfigCommand::Validate => {
            if !matches!(config.logging.format.as_str(), "json" | "pretty") {
                let message = format!("Unknown log format '{}'", config.logging.format);
                output::print_error(&message);
                return Err(AppError::configuration(message));
            }
            output::print_success("Configuration is valid");
            output::print_kv("Log level", &config.logging.level);
            output::print_kv("Log format", &config.logging.format);
            output::print_kv("Notify buffer", &config.access.notify_buffer.to_string());
            output::print_kv("Log denials", &config.access.log_denials.to_string());
        }
    }
    Ok(())
}
