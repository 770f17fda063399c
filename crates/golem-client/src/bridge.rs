//! WebSocket bridge to an external game-client process.
//!
//! The bridge sidecar (a mineflayer-based Node.js process) owns the
//! Minecraft wire protocol, entity tracking, and pathfinding; this adapter
//! speaks a small JSON frame protocol to it:
//!
//! - fire-and-forget commands: `{"cmd":"chat","text":"..."}`
//! - correlated queries: `{"cmd":"query","id":7,"query":{...}}` answered by
//!   `{"event":"result","id":7,"data":...}`
//! - lifecycle frames (`ready`, `chat`, `whisper`, `error`, `disconnected`)
//!   which map 1:1 onto [`SessionEvent`]
//!
//! On accept the bridge announces itself with
//! `{"event":"hello","pathfinder":true}` before any lifecycle frame; the
//! `pathfinder` flag tells us whether the sidecar loaded its pathfinding
//! plugin.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use golem_core::{GolemError, Position, Result};

use crate::session::{BlockQuery, Connector, GameSession, Pathfinder, SessionEvent};

/// How long we wait for the bridge's hello frame after the socket opens.
const HELLO_TIMEOUT: Duration = Duration::from_secs(10);
/// How long a correlated query may stay unanswered.
const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

type PendingQueries = Arc<Mutex<HashMap<u64, oneshot::Sender<Value>>>>;

/// Where the bridge should take the bot.
#[derive(Debug, Clone)]
pub struct BridgeTarget {
    pub host: String,
    pub port: u16,
    pub version: String,
    pub username: String,
}

/// Connects to the game-client bridge over WebSocket.
pub struct BridgeConnector {
    url: String,
    target: BridgeTarget,
}

impl BridgeConnector {
    pub fn new(url: impl Into<String>, target: BridgeTarget) -> Self {
        Self {
            url: url.into(),
            target,
        }
    }
}

#[async_trait]
impl Connector for BridgeConnector {
    async fn connect(&self) -> Result<(Arc<dyn GameSession>, mpsc::Receiver<SessionEvent>)> {
        info!(url = %self.url, "connecting to game-client bridge");

        let (ws, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| GolemError::Connection(format!("bridge connect failed: {e}")))?;
        let (mut write, mut read) = ws.split();

        let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(256);

        // The bridge announces itself before any lifecycle frame. Frames
        // arriving out of order are forwarded rather than dropped.
        let hello = tokio::time::timeout(HELLO_TIMEOUT, async {
            while let Some(msg) = read.next().await {
                let Ok(msg) = msg else { break };
                let Ok(text) = msg.to_text() else { continue };
                let Ok(frame) = serde_json::from_str::<Value>(text) else {
                    continue;
                };
                if frame["event"] == "hello" {
                    return Some(frame);
                }
                if let Some(event) = frame_to_event(&frame) {
                    let _ = event_tx.send(event).await;
                }
            }
            None
        })
        .await
        .map_err(|_| GolemError::Connection("bridge sent no hello frame".into()))?
        .ok_or_else(|| GolemError::Connection("bridge closed during handshake".into()))?;

        let has_pathfinder = hello["pathfinder"].as_bool().unwrap_or(false);
        info!(pathfinder = has_pathfinder, "bridge handshake complete");

        let (out_tx, mut out_rx) = mpsc::channel::<String>(64);
        let pending: PendingQueries = Arc::new(Mutex::new(HashMap::new()));

        // Tell the sidecar where to take the bot. It answers with `ready`
        // once the player has spawned.
        let connect_frame = json!({
            "cmd": "connect",
            "host": self.target.host,
            "port": self.target.port,
            "version": self.target.version,
            "username": self.target.username,
        });
        out_tx
            .send(connect_frame.to_string())
            .await
            .map_err(|_| GolemError::Connection("bridge closed during handshake".into()))?;

        // Writer task: drains outbound frames into the socket.
        tokio::spawn(async move {
            while let Some(frame) = out_rx.recv().await {
                if write.send(Message::Text(frame.into())).await.is_err() {
                    debug!("bridge writer: socket closed");
                    break;
                }
            }
            let _ = write.close().await;
        });

        // Reader task: routes result frames to pending queries, everything
        // else to the session event stream.
        let pending_reader = Arc::clone(&pending);
        tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Close(_)) => break,
                    Ok(msg) => {
                        let Ok(text) = msg.to_text() else { continue };
                        let Ok(frame) = serde_json::from_str::<Value>(text) else {
                            continue;
                        };
                        if frame["event"] == "result" {
                            if let Some(id) = frame["id"].as_u64() {
                                if let Some(tx) = pending_reader.lock().remove(&id) {
                                    let _ = tx.send(frame["data"].clone());
                                }
                            }
                            continue;
                        }
                        match frame_to_event(&frame) {
                            Some(event) => {
                                let ended = matches!(event, SessionEvent::Disconnected { .. });
                                if event_tx.send(event).await.is_err() || ended {
                                    return;
                                }
                            }
                            None => debug!("skipping unrecognized bridge frame"),
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "bridge read error");
                        break;
                    }
                }
            }
            // Stream ended without an explicit disconnect frame.
            let _ = event_tx
                .send(SessionEvent::Disconnected {
                    reason: Some("bridge stream ended".into()),
                })
                .await;
        });

        let pathfinder =
            has_pathfinder.then(|| Arc::new(BridgePathfinder { out: out_tx.clone() }));

        let session = BridgeSession {
            out: out_tx,
            pending,
            next_id: AtomicU64::new(1),
            pathfinder,
        };

        Ok((Arc::new(session), event_rx))
    }
}

/// Map a lifecycle frame onto a session event.
fn frame_to_event(frame: &Value) -> Option<SessionEvent> {
    match frame["event"].as_str()? {
        "ready" => Some(SessionEvent::Ready),
        "chat" => Some(SessionEvent::Chat {
            speaker: frame["speaker"].as_str()?.to_string(),
            text: frame["text"].as_str()?.to_string(),
        }),
        "whisper" => Some(SessionEvent::Whisper {
            speaker: frame["speaker"].as_str()?.to_string(),
            text: frame["text"].as_str()?.to_string(),
        }),
        "error" => Some(SessionEvent::Error {
            message: frame["message"].as_str().unwrap_or("unknown").to_string(),
        }),
        "disconnected" => Some(SessionEvent::Disconnected {
            reason: frame["reason"].as_str().map(String::from),
        }),
        _ => None,
    }
}

fn parse_position(data: &Value) -> Option<Position> {
    Some(Position::new(
        data["x"].as_f64()?,
        data["y"].as_f64()?,
        data["z"].as_f64()?,
    ))
}

/// A live game session proxied through the bridge.
struct BridgeSession {
    out: mpsc::Sender<String>,
    pending: PendingQueries,
    next_id: AtomicU64,
    pathfinder: Option<Arc<BridgePathfinder>>,
}

impl BridgeSession {
    async fn send_frame(&self, frame: Value) -> Result<()> {
        self.out
            .send(frame.to_string())
            .await
            .map_err(|_| GolemError::Session("bridge connection is gone".into()))
    }

    async fn query(&self, query: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        if let Err(e) = self
            .send_frame(json!({ "cmd": "query", "id": id, "query": query }))
            .await
        {
            self.pending.lock().remove(&id);
            return Err(e);
        }

        match tokio::time::timeout(QUERY_TIMEOUT, rx).await {
            Ok(Ok(data)) => Ok(data),
            Ok(Err(_)) => Err(GolemError::Session(
                "bridge closed before answering query".into(),
            )),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(GolemError::Session("bridge query timed out".into()))
            }
        }
    }
}

#[async_trait]
impl GameSession for BridgeSession {
    async fn send_chat(&self, text: &str) -> Result<()> {
        self.send_frame(json!({ "cmd": "chat", "text": text })).await
    }

    async fn send_whisper(&self, to: &str, text: &str) -> Result<()> {
        self.send_frame(json!({ "cmd": "whisper", "to": to, "text": text }))
            .await
    }

    async fn players(&self) -> Result<Vec<String>> {
        let data = self.query(json!({ "kind": "players" })).await?;
        Ok(data
            .as_array()
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| n.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn player_position(&self, name: &str) -> Result<Option<Position>> {
        let data = self
            .query(json!({ "kind": "player_position", "name": name }))
            .await?;
        Ok(parse_position(&data))
    }

    async fn own_position(&self) -> Result<Position> {
        let data = self.query(json!({ "kind": "own_position" })).await?;
        parse_position(&data)
            .ok_or_else(|| GolemError::Session("bridge reported no own position".into()))
    }

    async fn dimension(&self) -> Result<String> {
        let data = self.query(json!({ "kind": "dimension" })).await?;
        Ok(data.as_str().unwrap_or("overworld").to_string())
    }

    async fn nearest_entity(&self, kind: &str, radius: f64) -> Result<Option<Position>> {
        let data = self
            .query(json!({ "kind": "nearest_entity", "entity": kind, "radius": radius }))
            .await?;
        Ok(parse_position(&data))
    }

    async fn nearest_block(&self, query: &BlockQuery, radius: f64) -> Result<Option<Position>> {
        let data = self
            .query(json!({
                "kind": "nearest_block",
                "block": serde_json::to_value(query)?,
                "radius": radius,
            }))
            .await?;
        Ok(parse_position(&data))
    }

    async fn look_at(&self, pos: Position) -> Result<()> {
        self.send_frame(json!({ "cmd": "look_at", "x": pos.x, "y": pos.y, "z": pos.z }))
            .await
    }

    async fn walk_forward(&self, duration: Duration) -> Result<()> {
        self.send_frame(json!({ "cmd": "walk_forward", "ms": duration.as_millis() as u64 }))
            .await
    }

    fn pathfinder(&self) -> Option<Arc<dyn Pathfinder>> {
        self.pathfinder
            .as_ref()
            .map(|p| Arc::clone(p) as Arc<dyn Pathfinder>)
    }

    async fn quit(&self) {
        let _ = self.send_frame(json!({ "cmd": "quit" })).await;
    }
}

/// Pathfinding collaborator proxied through the bridge.
struct BridgePathfinder {
    out: mpsc::Sender<String>,
}

#[async_trait]
impl Pathfinder for BridgePathfinder {
    async fn set_goal(&self, pos: Position, tolerance: f64) -> Result<()> {
        self.out
            .send(
                json!({ "cmd": "goal", "x": pos.x, "y": pos.y, "z": pos.z, "tolerance": tolerance })
                    .to_string(),
            )
            .await
            .map_err(|_| GolemError::Navigation("bridge connection is gone".into()))
    }

    async fn clear_goal(&self) -> Result<()> {
        self.out
            .send(json!({ "cmd": "clear_goal" }).to_string())
            .await
            .map_err(|_| GolemError::Navigation("bridge connection is gone".into()))
    }
}
