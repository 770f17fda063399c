//! # golem-runtime
//!
//! The orchestration layer — the event loop that connects the game session,
//! the command router, the reply gateway, and the movement coordinator.
//!
//! ```text
//!          ┌──────────────┐
//!          │  Connector    │  ← bridge or simulator
//!          └──────┬────────┘
//!                 │ SessionEvent
//!                 ▼
//!          ┌──────────────┐
//!          │  Supervisor   │  ← connect, auth, reconnect
//!          └──────┬────────┘
//!                 │ chat / whisper
//!        ┌────────┴─────────┐
//!        ▼                  ▼
//!  directed speech    structured command
//!        │                  │
//!        ▼                  ▼
//!  ReplyGateway        BotState + Movement
//!        │                  │
//!        └────────┬─────────┘
//!                 ▼
//!        chunked chat / whisper send
//! ```
//!
//! All handlers run to completion on one logical event loop; slow work (the
//! auth grace delay, backend calls, follow reconciliation) is detached so it
//! never blocks the next incoming event.

pub(crate) mod commands;
pub(crate) mod movement;
pub mod router;
pub mod state;
pub mod supervisor;

pub use router::{ChatRouter, Command};
pub use state::{AuthPhase, BotState, FollowState, SharedState};
pub use supervisor::BotRuntime;
