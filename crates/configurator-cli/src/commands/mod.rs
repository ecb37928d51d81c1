//! CLI command definitions and dispatch.

pub mod config;
pub mod presence;
pub mod settings;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use configurator_core::config::AppConfig;
use configurator_core::error::AppError;

/// HEAT Labs Configurator administration
#[derive(Debug, Parser)]
#[command(name = "configurator", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file, without extension
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Configuration environment overlay (`config/<env>.toml`)
    #[arg(short, long, env = "CONFIGURATOR_ENV", default_value = "development")]
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
    /// Global and project settings
    Settings(settings::SettingsArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Rich presence diagnostics
    Presence(presence::PresenceArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Settings(args) => settings::execute(args, &self.load_config()?, self.format).await,
            Commands::Config(args) => config::execute(args, self, self.format).await,
            Commands::Presence(args) => presence::execute(args, &self.load_config()?, self.format).await,
        }
    }

    /// Load the configuration selected by `--config` and `--env`.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }
}

/// Parse a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}
