use async_trait::async_trait;
use golem_core::{Result, Role};
use tracing::info;

use crate::provider::*;

/// OpenAI chat-completions backend.
pub struct ChatGptBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ChatGptBackend {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: "https://api.openai.com/v1".into(),
        }
    }

    /// Use a custom base URL (for proxies and tests).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl ChatBackend for ChatGptBackend {
    fn name(&self) -> &str {
        "chatgpt"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system,
        })];
        for turn in &request.history {
            let role = match turn.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            messages.push(serde_json::json!({
                "role": role,
                "content": turn.content,
            }));
        }
        messages.push(serde_json::json!({
            "role": "user",
            "content": request.user_text,
        }));

        let body = serde_json::json!({
            "model": "gpt-3.5-turbo",
            "messages": messages,
            "max_tokens": MAX_REPLY_TOKENS,
            "temperature": TEMPERATURE,
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| backend_err("chatgpt", e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(backend_err("chatgpt", format!("HTTP {status}: {text}")));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| backend_err("chatgpt", e.to_string()))?;

        data["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| backend_err("chatgpt", "response had no reply text"))
    }

    async fn health_check(&self) -> Result<()> {
        info!(backend = "chatgpt", "checking API health");
        if self.api_key.is_empty() {
            return Err(backend_err("chatgpt", "API key not set"));
        }
        Ok(())
    }
}
