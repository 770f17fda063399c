use async_trait::async_trait;
use golem_core::{ChatTurn, GolemError, Result};

/// Token budget for a single reply. The system prompt also asks for
/// brevity, so this is a hard stop, not the steering mechanism.
pub const MAX_REPLY_TOKENS: u32 = 100;
/// Sampling temperature for every backend.
pub const TEMPERATURE: f32 = 0.7;

/// A request to a reply backend.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// System instruction: bot identity, brevity, current player.
    pub system: String,
    /// Windowed conversation context, oldest first.
    pub history: Vec<ChatTurn>,
    /// The new user turn.
    pub user_text: String,
}

/// Trait implemented by each reply backend (ChatGPT, Gemini, DeepSeek).
///
/// Wire format, auth header, and response shape are internal to the
/// adapter; callers only see reply text or an error.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Identifier, e.g. "chatgpt".
    fn name(&self) -> &str;

    /// Send a request and return the reply text.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;

    /// Check if this backend is configured / reachable.
    async fn health_check(&self) -> Result<()>;
}

pub(crate) fn backend_err(backend: &str, reason: impl Into<String>) -> GolemError {
    GolemError::Backend {
        backend: backend.into(),
        reason: reason.into(),
    }
}
