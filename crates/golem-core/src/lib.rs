//! # golem-core
//!
//! Core types, traits, and primitives for the Golem Minecraft bot.
//! This crate defines the shared vocabulary used by every other crate in the workspace.

pub mod chat;
pub mod error;
pub mod types;

pub use chat::{ChatTurn, Role};
pub use error::{GolemError, Result};
pub use types::{Backend, Location, Position, UnknownBackend};
