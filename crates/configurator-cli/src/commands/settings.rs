//! Settings inspection and editing commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use configurator_core::config::AppConfig;
use configurator_core::error::AppError;
use configurator_settings::{GlobalSettings, SettingsRecord, SettingsStore};

/// Arguments for settings commands
#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Settings subcommand
    #[command(subcommand)]
    pub command: SettingsCommand,
}

/// Settings subcommands
#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show global settings
    Show,
    /// Print the global settings file path
    Path,
    /// Set one global setting (value parsed as JSON, else taken as text)
    Set {
        /// Setting key, e.g. `gamePath`
        key: String,
        /// New value
        value: String,
    },
    /// Remove an unknown global setting key
    Unset {
        /// Setting key
        key: String,
    },
    /// Restore the default global settings
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Project-local settings
    Local {
        /// Local subcommand
        #[command(subcommand)]
        command: LocalCommand,
    },
}

/// Local settings subcommands
#[derive(Debug, Subcommand)]
pub enum LocalCommand {
    /// Show the local settings of a project
    Show {
        /// Project file
        project: PathBuf,
    },
    /// Set one local setting of a project
    Set {
        /// Project file
        project: PathBuf,
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
}

/// Execute settings commands
pub async fn execute(
    args: &SettingsArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = SettingsStore::from_config(&config.app)?;
    run(&args.command, &store, format).await
}

async fn run(
    command: &SettingsCommand,
    store: &SettingsStore,
    format: OutputFormat,
) -> Result<(), AppError> {
    match command {
        SettingsCommand::Show => {
            let settings = store.load_global().await?;
            output::print_value(&serde_json::to_value(&settings)?, format);
        }
        SettingsCommand::Path => {
            println!("{}", store.global_path().display());
        }
        SettingsCommand::Set { key, value } => {
            let mut patch = SettingsRecord::new();
            patch.insert(key.clone(), super::parse_value(value));
            store.update_global(&patch).await?;
            output::print_success(&format!("Set '{}'", key));
        }
        SettingsCommand::Unset { key } => {
            if key == "gamePath" || key == "autoLoad" {
                return Err(AppError::validation(format!(
                    "'{}' is a built-in setting; use `settings set` or `settings reset`",
                    key
                )));
            }
            let mut patch = SettingsRecord::new();
            patch.insert(key.clone(), serde_json::Value::Null);
            store.update_global(&patch).await?;
            output::print_success(&format!("Removed '{}'", key));
        }
        SettingsCommand::Reset { yes } => {
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt("This will replace all global settings with the defaults. Continue?")
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            store.save_global(&GlobalSettings::default()).await?;
            output::print_success("Global settings reset to defaults");
        }
        SettingsCommand::Local { command } => match command {
            LocalCommand::Show { project } => match store.load_local(project).await? {
                Some(record) => output::print_value(&serde_json::Value::Object(record), format),
                None => output::print_warning(&format!(
                    "No local settings for {} yet",
                    project.display()
                )),
            },
            LocalCommand::Set {
                project,
                key,
                value,
            } => {
                let mut record = store.load_local(project).await?.unwrap_or_default();
                record.insert(key.clone(), super::parse_value(value));
                store.save_local(project, &record).await?;
                output::print_kv("Written", &SettingsStore::local_path(project).display().to_string());
            }
        },
    }

    Ok(())
}
