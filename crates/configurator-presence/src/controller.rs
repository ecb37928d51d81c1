//! Presence connection controller.
//!
//! A single task owns the [`PresenceChannel`] and every piece of mutable
//! state: the connection state, the connection start time, the last status
//! sent and the one armed timer. Handles talk to it over a command queue,
//! so requests are applied strictly in the order they were made and no
//! timer callback can race a shutdown.
//!
//! Lifecycle:
//!
//! ```text
//! Disconnected --start--> Connecting --ok--> Connected --send error--> Disconnected
//!                              |                                            ^
//!                              +--error--> Disconnected (retry armed) ------+
//! ```

use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior, Sleep};

use configurator_core::config::presence::PresenceConfig;
use configurator_core::traits::presence::PresenceChannel;
use configurator_core::types::presence::{PresenceEvent, PresenceProfile, PresenceStatus};
use configurator_core::types::status::{ConnectionState, StatusKind};

/// Capacity of the transition broadcast; slow subscribers see `Lagged`.
const TRANSITION_CAPACITY: usize = 64;

/// Controller settings
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Client identity presented on connect
    pub identity: String,
    /// Keep-alive re-send interval; zero disables the refresh
    pub refresh_interval: Duration,
    /// Delay before a failed connect is retried
    pub retry_delay: Duration,
    /// Imagery and links attached to every status
    pub profile: PresenceProfile,
}

impl ControllerSettings {
    /// Build settings from the `[presence]` configuration section.
    pub fn from_config(config: &PresenceConfig) -> Self {
        Self {
            identity: config.client_id.trim().to_string(),
            refresh_interval: config.refresh_interval(),
            retry_delay: config.retry_delay(),
            profile: config.profile.clone(),
        }
    }
}

enum Command {
    Start,
    Event(PresenceEvent),
    Shutdown(oneshot::Sender<()>),
}

/// Handle to a running presence controller.
///
/// Cheap to clone. Dropping every handle shuts the controller down.
#[derive(Debug, Clone)]
pub struct PresenceController {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ConnectionState>,
    transitions: broadcast::Sender<ConnectionState>,
}

impl PresenceController {
    /// Spawn the controller task around `channel`.
    ///
    /// The controller starts out disconnected; call [`start`](Self::start)
    /// to connect.
    pub fn spawn<C: PresenceChannel>(channel: C, settings: ControllerSettings) -> (Self, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (transition_tx, _) = broadcast::channel(TRANSITION_CAPACITY);

        tracing::info!(
            "Spawning presence controller on {} channel",
            channel.channel_type()
        );

        let actor = Actor {
            channel,
            settings,
            commands: command_rx,
            state: state_tx,
            transitions: transition_tx.clone(),
            timer: Timer::Idle,
            started_at: None,
            last_status: None,
        };
        let task = tokio::spawn(actor.run());

        (
            Self {
                commands: command_tx,
                state: state_rx,
                transitions: transition_tx,
            },
            task,
        )
    }

    /// Begin connecting. Ignored unless disconnected.
    pub fn start(&self) {
        self.send(Command::Start);
    }

    /// Request a status change.
    ///
    /// Applied only while connected; dropped otherwise.
    pub fn on_event(&self, event: PresenceEvent) {
        self.send(Command::Event(event));
    }

    /// Cancel all timers, clear the status and disconnect.
    ///
    /// Resolves once the channel has been torn down. Safe to call more than
    /// once; later calls return immediately.
    pub async fn shutdown(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.commands.send(Command::Shutdown(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Whether status updates are currently applied.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Subscribe to state transitions made from now on.
    pub fn transitions(&self) -> broadcast::Receiver<ConnectionState> {
        self.transitions.subscribe()
    }

    /// A watch receiver on the connection state.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::debug!("Presence controller already stopped, request dropped");
        }
    }
}

/// The single timer slot. Holding one value makes it impossible for the
/// refresh and the retry timer to be armed at the same time.
enum Timer {
    Idle,
    Refresh(Interval),
    Retry(Pin<Box<Sleep>>),
}

enum Fired {
    Refresh,
    Retry,
}

impl Timer {
    async fn fired(&mut self) -> Fired {
        match self {
            Self::Idle => std::future::pending().await,
            Self::Refresh(interval) => {
                interval.tick().await;
                Fired::Refresh
            }
            Self::Retry(sleep) => {
                sleep.as_mut().await;
                Fired::Retry
            }
        }
    }
}

enum Flow {
    Continue,
    Stop(Option<oneshot::Sender<()>>),
}

struct Actor<C> {
    channel: C,
    settings: ControllerSettings,
    commands: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<ConnectionState>,
    transitions: broadcast::Sender<ConnectionState>,
    timer: Timer,
    started_at: Option<DateTime<Utc>>,
    last_status: Option<PresenceStatus>,
}

impl<C: PresenceChannel> Actor<C> {
    async fn run(mut self) {
        loop {
            let flow = tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Start) => self.start().await,
                    Some(Command::Event(event)) => {
                        self.apply(event).await;
                        Flow::Continue
                    }
                    Some(Command::Shutdown(ack)) => Flow::Stop(Some(ack)),
                    None => Flow::Stop(None),
                },
                fired = self.timer.fired() => match fired {
                    Fired::Refresh => {
                        self.refresh().await;
                        Flow::Continue
                    }
                    Fired::Retry => {
                        self.timer = Timer::Idle;
                        self.start().await
                    }
                },
            };

            if let Flow::Stop(ack) = flow {
                self.shutdown().await;
                if let Some(ack) = ack {
                    let _ = ack.send(());
                }
                break;
            }
        }

        tracing::debug!("Presence controller stopped");
    }

    fn current(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Move to `next`, disarming whatever timer belonged to the old state.
    fn transition(&mut self, next: ConnectionState) {
        let previous = self.current();
        if previous == next {
            return;
        }

        self.timer = Timer::Idle;
        self.state.send_replace(next);
        let _ = self.transitions.send(next);
        tracing::info!("Presence connection {} -> {}", previous, next);
    }

    async fn start(&mut self) -> Flow {
        if self.current() != ConnectionState::Disconnected {
            tracing::debug!("Presence start ignored while {}", self.current());
            return Flow::Continue;
        }

        self.transition(ConnectionState::Connecting);

        let outcome = {
            let connect = self.channel.connect(&self.settings.identity);
            tokio::pin!(connect);

            // Keep draining commands so a shutdown is not stuck behind a
            // slow connect.
            loop {
                tokio::select! {
                    result = &mut connect => break Ok(result),
                    command = self.commands.recv() => match command {
                        Some(Command::Event(event)) => {
                            tracing::debug!("Dropping {} status while connecting", event.kind);
                        }
                        Some(Command::Start) => {
                            tracing::debug!("Presence start ignored while connecting");
                        }
                        Some(Command::Shutdown(ack)) => break Err(Some(ack)),
                        None => break Err(None),
                    },
                }
            }
        };

        match outcome {
            Ok(Ok(())) => {
                self.started_at = Some(Utc::now());
                self.transition(ConnectionState::Connected);
                self.push(PresenceEvent::new(StatusKind::Idle)).await;
                if self.current() == ConnectionState::Connected {
                    self.arm_refresh();
                }
                Flow::Continue
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    "Presence connect failed, retrying in {:?}: {}",
                    self.settings.retry_delay,
                    e
                );
                self.transition(ConnectionState::Disconnected);
                self.timer = Timer::Retry(Box::pin(time::sleep(self.settings.retry_delay)));
                Flow::Continue
            }
            Err(ack) => Flow::Stop(ack),
        }
    }

    fn arm_refresh(&mut self) {
        let period = self.settings.refresh_interval;
        if period.is_zero() {
            return;
        }
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Timer::Refresh(interval);
    }

    async fn apply(&mut self, event: PresenceEvent) {
        if self.current() != ConnectionState::Connected {
            tracing::debug!("Dropping {} status while {}", event.kind, self.current());
            return;
        }
        self.push(event).await;
    }

    async fn push(&mut self, event: PresenceEvent) {
        let started_at = *self.started_at.get_or_insert_with(Utc::now);
        let status = PresenceStatus::build(&event, started_at, &self.settings.profile);
        self.send(status).await;
    }

    async fn refresh(&mut self) {
        if self.current() != ConnectionState::Connected {
            return;
        }
        if let Some(status) = self.last_status.clone() {
            tracing::trace!("Refreshing presence status");
            self.send(status).await;
        }
    }

    /// Send `status`. Any failure drops the connection without a retry.
    async fn send(&mut self, status: PresenceStatus) {
        let result = self.channel.set_status(&status).await;
        self.last_status = Some(status);

        if let Err(e) = result {
            tracing::warn!("Presence update failed, disconnecting: {}", e);
            self.channel.clear_and_disconnect().await;
            self.transition(ConnectionState::Disconnected);
        }
    }

    async fn shutdown(&mut self) {
        self.timer = Timer::Idle;
        self.channel.clear_and_disconnect().await;
        self.transition(ConnectionState::Disconnected);
        self.last_status = None;
        self.started_at = None;
    }
}
