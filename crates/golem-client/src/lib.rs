//! # golem-client
//!
//! The boundary between the bot and the game world. Protocol parsing,
//! entity tracking, and pathfinding geometry are supplied by external
//! collaborators behind the [`session::GameSession`] and
//! [`session::Pathfinder`] traits:
//!
//! - [`bridge::BridgeConnector`] speaks a small JSON frame protocol over
//!   WebSocket to a game-client bridge process (a mineflayer-based sidecar
//!   that owns the Minecraft wire protocol).
//! - [`sim::SimConnector`] is an in-process world double for tests and
//!   offline dry runs.
//!
//! Outbound replies go through [`chunker`], which enforces the server's
//! message-length ceiling.

pub mod bridge;
pub mod chunker;
pub mod session;
pub mod sim;

pub use bridge::{BridgeConnector, BridgeTarget};
pub use session::{BlockQuery, Connector, GameSession, Pathfinder, SessionEvent};
