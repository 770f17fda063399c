//! # golem-config
//!
//! Configuration for the Golem bot (`golem.toml`). Loaded once at startup;
//! the running bot never re-reads it.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::GolemConfig;
