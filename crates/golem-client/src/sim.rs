//! In-process game-world double.
//!
//! Stands in for the bridge during tests and offline dry runs: a scriptable
//! world the runtime can act against, with every outbound chat, whisper, and
//! pathfinder goal recorded for assertions.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use golem_core::{GolemError, Position, Result};

use crate::session::{BlockQuery, Connector, GameSession, Pathfinder, SessionEvent};

/// A message the bot sent through the sim session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Chat(String),
    Whisper { to: String, text: String },
}

#[derive(Default)]
struct WorldState {
    players: HashMap<String, Position>,
    entities: Vec<(String, Position)>,
    blocks: Vec<(String, Position)>,
    own: Position,
    dimension: String,
    sent: Vec<SentMessage>,
    goals: Vec<(Position, f64)>,
    cleared_goals: usize,
    quits: usize,
}

/// Shared, clonable handle onto the simulated world.
#[derive(Clone)]
pub struct SimWorld {
    inner: Arc<Mutex<WorldState>>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    pub fn new() -> Self {
        let world = Self {
            inner: Arc::new(Mutex::new(WorldState::default())),
        };
        world.inner.lock().dimension = "overworld".into();
        world
    }

    // ── World setup ────────────────────────────────────────────

    pub fn add_player(&self, name: impl Into<String>, pos: Position) {
        self.inner.lock().players.insert(name.into(), pos);
    }

    pub fn move_player(&self, name: &str, pos: Position) {
        if let Some(p) = self.inner.lock().players.get_mut(name) {
            *p = pos;
        }
    }

    pub fn remove_player(&self, name: &str) {
        self.inner.lock().players.remove(name);
    }

    pub fn set_own_position(&self, pos: Position) {
        self.inner.lock().own = pos;
    }

    pub fn set_dimension(&self, dimension: impl Into<String>) {
        self.inner.lock().dimension = dimension.into();
    }

    pub fn add_entity(&self, kind: impl Into<String>, pos: Position) {
        self.inner.lock().entities.push((kind.into(), pos));
    }

    pub fn add_block(&self, name: impl Into<String>, pos: Position) {
        self.inner.lock().blocks.push((name.into(), pos));
    }

    // ── Assertions ─────────────────────────────────────────────

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.inner.lock().sent.clone()
    }

    /// Public chats sent so far, in order.
    pub fn chats(&self) -> Vec<String> {
        self.inner
            .lock()
            .sent
            .iter()
            .filter_map(|m| match m {
                SentMessage::Chat(text) => Some(text.clone()),
                SentMessage::Whisper { .. } => None,
            })
            .collect()
    }

    /// Pathfinder goals issued so far.
    pub fn goals(&self) -> Vec<(Position, f64)> {
        self.inner.lock().goals.clone()
    }

    pub fn cleared_goals(&self) -> usize {
        self.inner.lock().cleared_goals
    }

    pub fn quits(&self) -> usize {
        self.inner.lock().quits
    }

    pub fn clear_sent(&self) {
        self.inner.lock().sent.clear();
    }
}

/// [`GameSession`] over a [`SimWorld`].
pub struct SimSession {
    world: SimWorld,
    pathfinder: Option<Arc<SimPathfinder>>,
}

impl SimSession {
    pub fn new(world: SimWorld) -> Self {
        let pathfinder = Arc::new(SimPathfinder {
            world: world.clone(),
        });
        Self {
            world,
            pathfinder: Some(pathfinder),
        }
    }

    /// A session whose world has no pathfinding collaborator.
    pub fn without_pathfinder(world: SimWorld) -> Self {
        Self {
            world,
            pathfinder: None,
        }
    }
}

#[async_trait]
impl GameSession for SimSession {
    async fn send_chat(&self, text: &str) -> Result<()> {
        self.world
            .inner
            .lock()
            .sent
            .push(SentMessage::Chat(text.to_string()));
        Ok(())
    }

    async fn send_whisper(&self, to: &str, text: &str) -> Result<()> {
        self.world.inner.lock().sent.push(SentMessage::Whisper {
            to: to.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn players(&self) -> Result<Vec<String>> {
        Ok(self.world.inner.lock().players.keys().cloned().collect())
    }

    async fn player_position(&self, name: &str) -> Result<Option<Position>> {
        Ok(self.world.inner.lock().players.get(name).copied())
    }

    async fn own_position(&self) -> Result<Position> {
        Ok(self.world.inner.lock().own)
    }

    async fn dimension(&self) -> Result<String> {
        Ok(self.world.inner.lock().dimension.clone())
    }

    async fn nearest_entity(&self, kind: &str, radius: f64) -> Result<Option<Position>> {
        let state = self.world.inner.lock();
        let own = state.own;
        Ok(state
            .entities
            .iter()
            .filter(|(k, pos)| k == kind && own.distance_to(*pos) < radius)
            .min_by(|(_, a), (_, b)| own.distance_to(*a).total_cmp(&own.distance_to(*b)))
            .map(|(_, pos)| *pos))
    }

    async fn nearest_block(&self, query: &BlockQuery, radius: f64) -> Result<Option<Position>> {
        let state = self.world.inner.lock();
        let own = state.own;
        Ok(state
            .blocks
            .iter()
            .filter(|(name, pos)| query.matches(name) && own.distance_to(*pos) < radius)
            .min_by(|(_, a), (_, b)| own.distance_to(*a).total_cmp(&own.distance_to(*b)))
            .map(|(_, pos)| *pos))
    }

    async fn look_at(&self, _pos: Position) -> Result<()> {
        Ok(())
    }

    async fn walk_forward(&self, _duration: Duration) -> Result<()> {
        Ok(())
    }

    fn pathfinder(&self) -> Option<Arc<dyn Pathfinder>> {
        self.pathfinder
            .as_ref()
            .map(|p| Arc::clone(p) as Arc<dyn Pathfinder>)
    }

    async fn quit(&self) {
        self.world.inner.lock().quits += 1;
    }
}

/// Pathfinding collaborator recording goals into the sim world.
pub struct SimPathfinder {
    world: SimWorld,
}

#[async_trait]
impl Pathfinder for SimPathfinder {
    async fn set_goal(&self, pos: Position, tolerance: f64) -> Result<()> {
        self.world.inner.lock().goals.push((pos, tolerance));
        Ok(())
    }

    async fn clear_goal(&self) -> Result<()> {
        self.world.inner.lock().cleared_goals += 1;
        Ok(())
    }
}

/// Connector handing out pre-scripted sim sessions, one per `connect` call.
pub struct SimConnector {
    world: SimWorld,
    pathfinder: bool,
    scripted: Mutex<VecDeque<mpsc::Receiver<SessionEvent>>>,
}

impl SimConnector {
    pub fn new(world: SimWorld) -> Self {
        Self {
            world,
            pathfinder: true,
            scripted: Mutex::new(VecDeque::new()),
        }
    }

    /// Sessions handed out by this connector will have no pathfinder.
    pub fn without_pathfinder(mut self) -> Self {
        self.pathfinder = false;
        self
    }

    /// Queue one connection; the returned sender drives that session's
    /// event stream. Dropping the sender ends the session.
    pub fn script(&self) -> mpsc::Sender<SessionEvent> {
        let (tx, rx) = mpsc::channel(64);
        self.scripted.lock().push_back(rx);
        tx
    }
}

#[async_trait]
impl Connector for SimConnector {
    async fn connect(&self) -> Result<(Arc<dyn GameSession>, mpsc::Receiver<SessionEvent>)> {
        let events = self
            .scripted
            .lock()
            .pop_front()
            .ok_or_else(|| GolemError::Connection("no scripted connection left".into()))?;
        let session = if self.pathfinder {
            SimSession::new(self.world.clone())
        } else {
            SimSession::without_pathfinder(self.world.clone())
        };
        Ok((Arc::new(session), events))
    }
}
