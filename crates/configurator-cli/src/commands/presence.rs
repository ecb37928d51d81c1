//! Rich presence diagnostics.

use std::time::Duration;

use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use configurator_core::config::AppConfig;
use configurator_core::error::AppError;
use configurator_core::traits::presence::PresenceChannel;
use configurator_core::types::presence::{PresenceEvent, PresenceStatus};
use configurator_core::types::status::StatusKind;
use configurator_presence::channel::discord::{DiscordIpcChannel, activity_payload, transport};

/// Arguments for presence commands
#[derive(Debug, Args)]
pub struct PresenceArgs {
    /// Presence subcommand
    #[command(subcommand)]
    pub command: PresenceCommand,
}

/// Presence subcommands
#[derive(Debug, Subcommand)]
pub enum PresenceCommand {
    /// List the IPC endpoints probed on this machine
    Endpoints,
    /// Show the activity sent for a status
    Preview {
        /// Status kind: idle, editing, loading, saving
        #[arg(default_value = "idle")]
        kind: String,
        /// Override the details line
        #[arg(long)]
        details: Option<String>,
        /// Override the state line
        #[arg(long)]
        state: Option<String>,
    },
    /// Connect, show the idle status, then clear it
    Check {
        /// Seconds to keep the status visible
        #[arg(long, default_value_t = 5)]
        hold: u64,
    },
}

/// Endpoint display row
#[derive(Debug, Serialize, Tabled)]
struct EndpointRow {
    /// Endpoint path
    endpoint: String,
    /// Whether something listens there
    present: bool,
}

/// Execute presence commands
pub async fn execute(
    args: &PresenceArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        PresenceCommand::Endpoints => {
            let rows: Vec<EndpointRow> = transport::default_endpoints()
                .into_iter()
                .map(|path| EndpointRow {
                    present: path.exists(),
                    endpoint: path.display().to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        PresenceCommand::Preview {
            kind,
            details,
            state,
        } => {
            let event = PresenceEvent {
                kind: StatusKind::from_str_or_default(kind),
                details: details.clone(),
                state: state.clone(),
            };
            let status = PresenceStatus::build(&event, Utc::now(), &config.presence.profile);
            output::print_value(&activity_payload(&status), format);
        }
        PresenceCommand::Check { hold } => check(config, Duration::from_secs(*hold)).await?,
    }

    Ok(())
}

async fn check(config: &AppConfig, hold: Duration) -> Result<(), AppError> {
    let presence = &config.presence;
    if !presence.is_active() {
        return Err(AppError::configuration(
            "Presence is disabled or presence.client_id is empty",
        ));
    }

    let mut channel = DiscordIpcChannel::new(presence.io_timeout());
    tracing::debug!("Presence check with {:?}", channel);
    println!("Connecting to Discord...");
    channel.connect(presence.client_id.trim()).await?;
    output::print_success("Connected");

    let status = PresenceStatus::build(
        &PresenceEvent::new(StatusKind::Idle),
        Utc::now(),
        &presence.profile,
    );
    let sent = channel.set_status(&status).await;
    if sent.is_ok() {
        output::print_success(&format!("Status shown for {}s", hold.as_secs()));
        tokio::time::sleep(hold).await;
    }

    channel.clear_and_disconnect().await;
    sent?;
    output::print_success("Status cleared");
    Ok(())
}
