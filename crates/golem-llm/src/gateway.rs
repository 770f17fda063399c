use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use golem_core::Backend;

use crate::history::ConversationLog;
use crate::provider::{ChatBackend, ChatRequest};

/// Uniform facade over the interchangeable reply backends.
///
/// Never fails outward: any fault in the underlying backend surfaces to the
/// player as a fixed apology string naming the unavailable backend, and the
/// conversation memory is left untouched.
pub struct ReplyGateway {
    bot_name: String,
    backends: HashMap<Backend, Arc<dyn ChatBackend>>,
    active: Mutex<Backend>,
    log: Mutex<ConversationLog>,
}

impl ReplyGateway {
    pub fn new(bot_name: impl Into<String>, default_backend: Backend) -> Self {
        Self {
            bot_name: bot_name.into(),
            backends: HashMap::new(),
            active: Mutex::new(default_backend),
            log: Mutex::new(ConversationLog::new()),
        }
    }

    /// Register an adapter for a backend.
    pub fn register(&mut self, kind: Backend, backend: Arc<dyn ChatBackend>) {
        debug!(backend = kind.as_str(), "registered reply backend");
        self.backends.insert(kind, backend);
    }

    /// The backend currently answering replies.
    pub fn active(&self) -> Backend {
        *self.active.lock()
    }

    pub fn set_active(&self, kind: Backend) {
        *self.active.lock() = kind;
    }

    /// Number of turns currently held in conversation memory.
    pub fn history_len(&self) -> usize {
        self.log.lock().len()
    }

    /// Produce a reply for a chat or whisper line addressed to the bot.
    pub async fn reply(&self, speaker: &str, text: &str) -> String {
        // `switch to <name>` is matched before any backend dispatch and
        // never touches conversation memory.
        if let Some(rest) = strip_prefix_ci(text, "switch to ") {
            if let Ok(kind) = rest.trim().parse::<Backend>() {
                self.set_active(kind);
                debug!(backend = kind.as_str(), "switched active backend");
                return format!("Switched to {} model!", kind.label().to_uppercase());
            }
        }

        let kind = self.active();
        let Some(backend) = self.backends.get(&kind) else {
            warn!(backend = kind.as_str(), "no adapter registered for active backend");
            return apology(kind);
        };

        let request = ChatRequest {
            system: self.system_prompt(speaker),
            history: self.log.lock().context_window(),
            user_text: text.to_string(),
        };

        match backend.complete(&request).await {
            Ok(reply) => {
                self.log.lock().record_exchange(text, &reply);
                reply
            }
            Err(e) => {
                warn!(backend = kind.as_str(), error = %e, "backend call failed");
                apology(kind)
            }
        }
    }

    fn system_prompt(&self, speaker: &str) -> String {
        format!(
            "You are a helpful Minecraft bot named {}. \
             You are playing on a Minecraft server and chatting with players. \
             Keep responses short (under 100 characters) and friendly. \
             You can help with Minecraft questions, chat casually, and be helpful to players. \
             Current player: {}",
            self.bot_name, speaker
        )
    }
}

fn apology(kind: Backend) -> String {
    format!("Sorry, {} is not responding right now!", kind.label())
}

/// Case-insensitive (ASCII) prefix strip.
fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_prefix_ci() {
        assert_eq!(strip_prefix_ci("Switch To gemini", "switch to "), Some("gemini"));
        assert_eq!(strip_prefix_ci("hello", "switch to "), None);
        assert_eq!(strip_prefix_ci("sw", "switch to "), None);
    }
}
