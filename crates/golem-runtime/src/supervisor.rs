//! Connection supervision: connect, authenticate, route events, reconnect.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use golem_client::chunker;
use golem_client::session::{Connector, GameSession, SessionEvent};
use golem_config::GolemConfig;
use golem_core::Result;
use golem_llm::gateway::ReplyGateway;

use crate::commands;
use crate::router::ChatRouter;
use crate::state::{AuthPhase, BotState, SharedState};

/// Grace period between spawn and the auth command, letting the server
/// settle the player into world state first.
pub const AUTH_GRACE: Duration = Duration::from_secs(2);
/// Fixed delay before every reconnect attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Owns the bot lifecycle. One instance per process; its state outlives
/// individual connections.
pub struct BotRuntime {
    config: GolemConfig,
    gateway: Arc<ReplyGateway>,
    router: ChatRouter,
    state: SharedState,
    current: Mutex<Option<Arc<dyn GameSession>>>,
}

impl BotRuntime {
    pub fn new(config: GolemConfig, gateway: Arc<ReplyGateway>) -> Result<Self> {
        let router = ChatRouter::new(&config.bot.username)?;
        Ok(Self {
            config,
            gateway,
            router,
            state: Arc::new(Mutex::new(BotState::new())),
            current: Mutex::new(None),
        })
    }

    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    pub fn gateway(&self) -> Arc<ReplyGateway> {
        Arc::clone(&self.gateway)
    }

    /// Run until the surrounding task is aborted. Each pass of the loop is
    /// one connection; accumulated state (team, home, conversation memory,
    /// the registered latch) survives across passes.
    pub async fn run(&self, connector: Arc<dyn Connector>) {
        loop {
            info!(
                host = %self.config.server.host,
                port = self.config.server.port,
                username = %self.config.bot.username,
                "connecting"
            );
            match connector.connect().await {
                Ok((session, events)) => {
                    *self.current.lock() = Some(Arc::clone(&session));
                    self.drive_session(session, events).await;
                    *self.current.lock() = None;
                }
                Err(e) => error!(error = %e, "connection attempt failed"),
            }

            // Connection-scoped work dies with the connection: any live
            // follow loop is invalidated here.
            self.state.lock().follow.stop();

            info!(
                delay_secs = RECONNECT_DELAY.as_secs(),
                "attempting to reconnect after delay"
            );
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }

    /// Send a graceful quit to the live session, if any.
    pub async fn shutdown(&self) {
        let session = self.current.lock().take();
        if let Some(session) = session {
            session.quit().await;
        }
    }

    /// Drain one connection's events to completion, in arrival order.
    async fn drive_session(
        &self,
        session: Arc<dyn GameSession>,
        mut events: mpsc::Receiver<SessionEvent>,
    ) {
        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::Ready => {
                    info!("spawned into world");
                    self.spawn_auth(Arc::clone(&session));
                }
                SessionEvent::Chat { speaker, text } => {
                    self.on_chat(&session, speaker, text).await;
                }
                SessionEvent::Whisper { speaker, text } => {
                    info!(%speaker, %text, "whisper");
                    self.spawn_reply(Arc::clone(&session), speaker, text, true);
                }
                SessionEvent::Error { message } => {
                    warn!(%message, "session error");
                }
                SessionEvent::Disconnected { reason } => {
                    warn!(?reason, "disconnected");
                    return;
                }
            }
        }
        warn!("event stream closed without a disconnect notice");
    }

    /// The first connection of the process registers (password doubled for
    /// the confirmation field); every connection after that logs in. The
    /// latch never resets within a process lifetime.
    fn spawn_auth(&self, session: Arc<dyn GameSession>) {
        let state = Arc::clone(&self.state);
        let password = self.config.auth.password.clone();
        tokio::spawn(async move {
            tokio::time::sleep(AUTH_GRACE).await;
            let already_registered = {
                let mut s = state.lock();
                let was = s.registered;
                if was {
                    s.auth = AuthPhase::LoggedIn;
                } else {
                    s.auth = AuthPhase::Registering;
                    s.registered = true;
                }
                was
            };
            let result = if already_registered {
                info!("attempting to login");
                session.send_chat(&format!("/login {password}")).await
            } else {
                info!("attempting to register");
                session
                    .send_chat(&format!("/register {password} {password}"))
                    .await
            };
            if let Err(e) = result {
                warn!(error = %e, "auth command failed");
            }
        });
    }

    async fn on_chat(&self, session: &Arc<dyn GameSession>, speaker: String, text: String) {
        if self.router.is_self(&speaker) {
            return;
        }
        info!(%speaker, %text, "chat");

        // Pass 1: directed speech → AI reply. Detached so a slow backend
        // call never blocks the next incoming event.
        if let Some(residue) = self.router.directed_residue(&text) {
            self.spawn_reply(Arc::clone(session), speaker.clone(), residue, false);
        }

        // Pass 2: structured command. Independent of pass 1; both may fire
        // for the same line.
        if let Some(command) = ChatRouter::parse_command(&text) {
            if let Err(e) = commands::execute(&self.state, &self.gateway, session, command).await {
                warn!(error = %e, "command failed");
            }
        }
    }

    fn spawn_reply(
        &self,
        session: Arc<dyn GameSession>,
        speaker: String,
        text: String,
        whisper: bool,
    ) {
        let gateway = Arc::clone(&self.gateway);
        tokio::spawn(async move {
            let reply = gateway.reply(&speaker, &text).await;
            if let Err(e) = chunker::send_reply(session.as_ref(), &speaker, &reply, whisper).await {
                warn!(error = %e, "failed to deliver reply");
            }
        });
    }
}
