//! HEAT Labs Configurator host
//!
//! Headless host process: keeps the Discord rich presence in sync with what
//! the UI reports on stdin and performs project file work on its behalf.

use std::time::Duration;

use clap::Parser;
use tokio::io::BufReader;
use tokio::task::JoinHandle;

use configurator_core::config::AppConfig;
use configurator_core::config::presence::PresenceConfig;
use configurator_core::error::AppError;
use configurator_host::logging::init_logging;
use configurator_host::signal::shutdown_signal;
use configurator_host::{Host, LocalFileIo, ProjectSession};
use configurator_presence::{
    AppStatusBridge, ControllerSettings, DiscordIpcChannel, MemoryChannel, PresenceController,
};
use configurator_settings::SettingsStore;

/// How long shutdown waits for the presence teardown.
const PRESENCE_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// HEAT Labs Configurator host
#[derive(Debug, Parser)]
#[command(name = "configurator-host", version, about, long_about = None)]
struct Args {
    /// Base configuration file, without extension
    #[arg(short, long, env = "CONFIGURATOR_CONFIG", default_value = "config/default")]
    config: String,

    /// Configuration environment overlay (`config/<env>.toml`)
    #[arg(short, long, env = "CONFIGURATOR_ENV", default_value = "development")]
    env: String,

    /// Log presence updates instead of talking to Discord
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match AppConfig::load_from(&args.config, &args.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(config, args.dry_run).await {
        tracing::error!("Host error: {}", e);
        std::process::exit(1);
    }
}

/// Main host run function
async fn run(config: AppConfig, dry_run: bool) -> Result<(), AppError> {
    tracing::info!("Starting Configurator host v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Global settings ──────────────────────────────────
    let store = SettingsStore::from_config(&config.app)?;
    let global = store.load_global().await?;
    tracing::info!(
        "Global settings from {} (game path: '{}', auto load: {})",
        store.global_path().display(),
        global.game_path,
        global.auto_load
    );

    // ── Step 2: Presence ─────────────────────────────────────────
    let presence = spawn_presence(&config.presence, dry_run);
    let bridge = match &presence {
        Some((controller, _)) => {
            controller.start();
            AppStatusBridge::new(controller.clone())
        }
        None => AppStatusBridge::disabled(),
    };

    // ── Step 3: Inbound event loop ───────────────────────────────
    let session = ProjectSession::new(LocalFileIo, store, bridge.clone());
    let mut host = Host::new(session, bridge, tokio::io::stdout());
    let exit = host
        .run(BufReader::new(tokio::io::stdin()), shutdown_signal())
        .await;
    tracing::info!("Event loop stopped ({:?}), shutting down...", exit);

    // ── Step 4: Graceful shutdown ────────────────────────────────
    if let Some((controller, task)) = presence {
        let teardown = async {
            controller.shutdown().await;
            let _ = task.await;
        };
        if tokio::time::timeout(PRESENCE_SHUTDOWN_TIMEOUT, teardown)
            .await
            .is_err()
        {
            tracing::warn!("Presence teardown timed out");
        }
    }

    tracing::info!("Configurator host shut down gracefully");
    Ok(())
}

/// Spawn the presence controller, or `None` when presence is off.
fn spawn_presence(
    config: &PresenceConfig,
    dry_run: bool,
) -> Option<(PresenceController, JoinHandle<()>)> {
    let settings = ControllerSettings::from_config(config);

    if dry_run {
        tracing::info!("Dry run: presence updates are only logged");
        return Some(PresenceController::spawn(MemoryChannel::new(), settings));
    }

    if !config.is_active() {
        tracing::info!("Rich presence disabled");
        return None;
    }

    let channel = DiscordIpcChannel::new(config.io_timeout());
    Some(PresenceController::spawn(channel, settings))
}
