use thiserror::Error;

/// Unified error type for the entire Golem bot.
#[derive(Error, Debug)]
pub enum GolemError {
    // ── Connection errors ──────────────────────────────────────
    #[error("connection error: {0}")]
    Connection(String),

    #[error("game session error: {0}")]
    Session(String),

    // ── Backend errors ─────────────────────────────────────────
    #[error("backend error: {backend}: {reason}")]
    Backend { backend: String, reason: String },

    // ── Movement errors ────────────────────────────────────────
    #[error("navigation error: {0}")]
    Navigation(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GolemError>;
