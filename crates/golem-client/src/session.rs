use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use golem_core::{Position, Result};

/// Lifecycle and chat events emitted by a game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The player entity has settled into the world.
    Ready,
    /// A public chat line.
    Chat { speaker: String, text: String },
    /// A private message addressed to the bot.
    Whisper { speaker: String, text: String },
    /// A non-fatal session error.
    Error { message: String },
    /// The connection dropped.
    Disconnected { reason: Option<String> },
}

/// Block-name query for world scans.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum BlockQuery {
    /// Block name equals one of these.
    Exact { names: Vec<String> },
    /// Block name contains one of these fragments.
    Substring { fragments: Vec<String> },
}

impl BlockQuery {
    pub fn exact<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Exact {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn substring<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Substring {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, block_name: &str) -> bool {
        match self {
            Self::Exact { names } => names.iter().any(|n| n == block_name),
            Self::Substring { fragments } => fragments.iter().any(|f| block_name.contains(f.as_str())),
        }
    }
}

/// A live connection to the game world.
///
/// One instance per connection attempt; a reconnect produces a fresh
/// session. Implementations must be cheap to share across tasks.
#[async_trait]
pub trait GameSession: Send + Sync {
    /// Send a public chat line. Also carries server commands such as
    /// `/register` and `/login`.
    async fn send_chat(&self, text: &str) -> Result<()>;

    /// Whisper a private message to a player.
    async fn send_whisper(&self, to: &str, text: &str) -> Result<()>;

    /// Names of the currently connected players.
    async fn players(&self) -> Result<Vec<String>>;

    /// Live position of a player, `None` when out of tracking range.
    async fn player_position(&self, name: &str) -> Result<Option<Position>>;

    /// The bot's own position.
    async fn own_position(&self) -> Result<Position>;

    /// Dimension the bot currently occupies.
    async fn dimension(&self) -> Result<String>;

    /// Nearest entity of the given kind within `radius`, if any.
    async fn nearest_entity(&self, kind: &str, radius: f64) -> Result<Option<Position>>;

    /// Nearest block matching the query within `radius`, if any.
    async fn nearest_block(&self, query: &BlockQuery, radius: f64) -> Result<Option<Position>>;

    /// Turn to face a point.
    async fn look_at(&self, pos: Position) -> Result<()>;

    /// Walk straight ahead for the given duration (degraded movement when
    /// no pathfinder is loaded).
    async fn walk_forward(&self, duration: Duration) -> Result<()>;

    /// The pathfinding collaborator, when loaded.
    fn pathfinder(&self) -> Option<Arc<dyn Pathfinder>>;

    /// Leave the server gracefully. Best-effort; errors are swallowed.
    async fn quit(&self);
}

/// External navigation collaborator.
#[async_trait]
pub trait Pathfinder: Send + Sync {
    /// Navigate to within `tolerance` blocks of a point.
    async fn set_goal(&self, pos: Position, tolerance: f64) -> Result<()>;

    /// Drop any outstanding navigation goal.
    async fn clear_goal(&self) -> Result<()>;
}

/// Establishes game sessions. The supervisor calls `connect` once per
/// connection attempt, including reconnects.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<(Arc<dyn GameSession>, mpsc::Receiver<SessionEvent>)>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_query_exact() {
        let q = BlockQuery::exact(["water"]);
        assert!(q.matches("water"));
        assert!(!q.matches("waterlogged_slab"));
    }

    #[test]
    fn test_block_query_substring() {
        let q = BlockQuery::substring(["log", "wood"]);
        assert!(q.matches("oak_log"));
        assert!(q.matches("dark_oak_wood"));
        assert!(!q.matches("stone"));
    }
}
