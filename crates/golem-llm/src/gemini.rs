use async_trait::async_trait;
use golem_core::{Result, Role};

use crate::provider::*;

/// Google Gemini backend.
///
/// The generateContent API takes a single text part, so the system
/// instruction and the conversation window are flattened into one prompt.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiBackend {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
        }
    }

    /// Use a custom base URL (for proxies and tests).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl ChatBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let mut prompt = request.system.clone();
        for turn in &request.history {
            let who = match turn.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            prompt.push_str(&format!("\n{who}: {}", turn.content));
        }
        prompt.push_str(&format!("\n\nUser: {}", request.user_text));

        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let url = format!(
            "{}/models/gemini-pro:generateContent?key={}",
            self.base_url, self.api_key
        );
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| backend_err("gemini", e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(backend_err("gemini", format!("HTTP {status}: {text}")));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| backend_err("gemini", e.to_string()))?;

        data["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| backend_err("gemini", "response had no reply text"))
    }

    async fn health_check(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(backend_err("gemini", "API key not set"));
        }
        Ok(())
    }
}
