//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use configurator_core::config::AppConfig;
use configurator_core::error::AppError;
use configurator_settings::SettingsStore;

use super::Cli;

/// Default configuration shipped with the workspace.
const DEFAULT_CONFIG: &str = include_str!("../../../../config/default.toml");

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
    /// Show current configuration
    Show,
    /// Validate the merged configuration
    Validate,
    /// Generate a default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config/generated.toml")]
        output: String,
    },
}

/// Execute config commands
pub async fn execute(args: &ConfigArgs, cli: &Cli, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = cli.load_config()?;
            output::print_value(&serde_json::to_value(&config)?, format);
        }
        ConfigCommand::Validate => match cli.load_config() {
            Ok(config) => {
                output::print_success(&format!(
                    "Configuration '{}' (env: {}) is valid",
                    cli.config, cli.env
                ));
                for warning in validate(&config) {
                    output::print_warning(&warning);
                }
                let settings = SettingsStore::from_config(&config.app)
                    .map(|store| store.global_path().display().to_string())
                    .unwrap_or_else(|e| format!("unavailable ({})", e));
                output::print_kv("App id", &config.app.app_id);
                output::print_kv("Global settings", &settings);
                output::print_kv(
                    "Presence",
                    if config.presence.is_active() { "active" } else { "off" },
                );
                output::print_kv("Log level", &config.logging.level);
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
        },
        ConfigCommand::Generate { output: out_path } => {
            if let Some(parent) = std::path::Path::new(out_path).parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::internal(format!("Failed to create dir: {}", e)))?;
            }

            tokio::fs::write(out_path, DEFAULT_CONFIG)
                .await
                .map_err(|e| AppError::internal(format!("Failed to write config: {}", e)))?;

            output::print_success(&format!("Default config written to '{}'", out_path));
        }
    }

    Ok(())
}

/// Non-fatal problems with a configuration that loaded fine.
fn validate(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let presence = &config.presence;

    if presence.enabled && presence.client_id.trim().is_empty() {
        warnings.push("presence.client_id is empty; rich presence stays off".to_string());
    }
    if presence.refresh_interval_seconds == 0 {
        warnings.push("presence.refresh_interval_seconds is 0; the status is never refreshed".to_string());
    }
    if presence.io_timeout_seconds == 0 {
        warnings.push("presence.io_timeout_seconds is 0; every presence exchange times out".to_string());
    }
    if presence.profile.links.len() > 2 {
        warnings.push(format!(
            "{} presence links configured; only the first 2 are shown",
            presence.profile.links.len()
        ));
    }
    if !matches!(config.logging.format.as_str(), "json" | "pretty") {
        warnings.push(format!(
            "logging.format '{}' is unknown; pretty output is used",
            config.logging.format
        ));
    }

    warnings
}
