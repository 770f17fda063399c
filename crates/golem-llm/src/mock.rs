//! Mock reply backend for deterministic testing.
//!
//! Returns pre-configured replies without making any HTTP calls.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::provider::{ChatBackend, ChatRequest, backend_err};
use golem_core::Result;

/// A mock reply backend that returns pre-configured replies.
///
/// # Example
/// ```
/// use golem_llm::mock::MockBackend;
/// let backend = MockBackend::new("chatgpt")
///     .with_reply("Hello, world!");
/// ```
pub struct MockBackend {
    replies: Arc<Mutex<Vec<MockReply>>>,
    /// Track all requests received (for assertions in tests).
    pub requests: Arc<Mutex<Vec<ChatRequest>>>,
    name: String,
}

/// A pre-configured reply from the mock backend.
#[derive(Clone)]
pub struct MockReply {
    pub text: String,
    /// If set, the backend will return this error instead.
    pub error: Option<String>,
}

impl MockReply {
    /// Create a text reply.
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            error: None,
        }
    }

    /// Create an error reply.
    pub fn error(msg: &str) -> Self {
        Self {
            text: String::new(),
            error: Some(msg.to_string()),
        }
    }
}

impl MockBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(vec![])),
            requests: Arc::new(Mutex::new(vec![])),
            name: name.into(),
        }
    }

    /// Queue a simple text reply.
    pub fn with_reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push(MockReply::text(text));
        self
    }

    /// Queue an error reply.
    pub fn with_error(self, error: &str) -> Self {
        self.replies.lock().unwrap().push(MockReply::error(error));
        self
    }

    /// Queue a reply directly (for mutable access patterns).
    pub fn queue_reply(&mut self, reply: MockReply) {
        self.replies.lock().unwrap().push(reply);
    }

    /// Get all requests that were made to this backend.
    pub fn recorded_requests(&self) -> Arc<Mutex<Vec<ChatRequest>>> {
        Arc::clone(&self.requests)
    }

    /// Pop the next queued reply, or return a default placeholder.
    fn next_reply(&self) -> MockReply {
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            MockReply::text("(mock: no more queued replies)")
        } else {
            replies.remove(0)
        }
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        let mock = self.next_reply();

        if let Some(error) = mock.error {
            return Err(backend_err(&self.name, error));
        }

        Ok(mock.text)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(text: &str) -> ChatRequest {
        ChatRequest {
            system: "be nice".into(),
            history: vec![],
            user_text: text.into(),
        }
    }

    #[tokio::test]
    async fn test_mock_text_reply() {
        let backend = MockBackend::new("mock").with_reply("Hello!");
        let reply = backend.complete(&make_request("hi")).await.unwrap();
        assert_eq!(reply, "Hello!");
    }

    #[tokio::test]
    async fn test_mock_error() {
        let backend = MockBackend::new("mock").with_error("HTTP 429: rate limited");
        assert!(backend.complete(&make_request("hi")).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let backend = MockBackend::new("mock").with_reply("ok");
        let _ = backend.complete(&make_request("hello")).await;
        let recorded = backend.recorded_requests();
        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].user_text, "hello");
        assert_eq!(recorded[0].system, "be nice");
    }

    #[tokio::test]
    async fn test_mock_multiple_replies_in_order() {
        let backend = MockBackend::new("mock")
            .with_reply("first")
            .with_reply("second");
        assert_eq!(backend.complete(&make_request("a")).await.unwrap(), "first");
        assert_eq!(backend.complete(&make_request("b")).await.unwrap(), "second");
    }
}
