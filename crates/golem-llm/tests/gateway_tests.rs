#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use golem_core::{Backend, Role};
    use golem_llm::gateway::ReplyGateway;
    use golem_llm::history::{CONTEXT_TURNS, MAX_TURNS};
    use golem_llm::mock::MockBackend;

    fn gateway_with(backends: Vec<(Backend, MockBackend)>) -> ReplyGateway {
        let mut gateway = ReplyGateway::new("Golem", Backend::ChatGpt);
        for (kind, backend) in backends {
            gateway.register(kind, Arc::new(backend));
        }
        gateway
    }

    // ── Backend switching ──────────────────────────────────────

    #[tokio::test]
    async fn test_switch_to_sets_backend_without_dispatch() {
        let chatgpt = MockBackend::new("chatgpt").with_reply("from chatgpt");
        let gemini = MockBackend::new("gemini").with_reply("from gemini");
        let chatgpt_requests = chatgpt.recorded_requests();
        let gemini_requests = gemini.recorded_requests();

        let gateway = gateway_with(vec![(Backend::ChatGpt, chatgpt), (Backend::Gemini, gemini)]);

        let reply = gateway.reply("Steve", "switch to gemini").await;
        assert_eq!(reply, "Switched to GEMINI model!");
        assert_eq!(gateway.active(), Backend::Gemini);

        // No backend was consulted and memory is untouched
        assert!(chatgpt_requests.lock().unwrap().is_empty());
        assert!(gemini_requests.lock().unwrap().is_empty());
        assert_eq!(gateway.history_len(), 0);

        // Subsequent replies go to the switched adapter
        let reply = gateway.reply("Steve", "hello").await;
        assert_eq!(reply, "from gemini");
        assert!(chatgpt_requests.lock().unwrap().is_empty());
        assert_eq!(gemini_requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_switch_is_case_insensitive() {
        let gateway = gateway_with(vec![]);
        let reply = gateway.reply("Steve", "Switch To DeepSeek").await;
        assert_eq!(reply, "Switched to DEEPSEEK model!");
        assert_eq!(gateway.active(), Backend::DeepSeek);
    }

    #[tokio::test]
    async fn test_unknown_switch_target_falls_through_to_dispatch() {
        let chatgpt = MockBackend::new("chatgpt").with_reply("no such model, sorry");
        let requests = chatgpt.recorded_requests();
        let gateway = gateway_with(vec![(Backend::ChatGpt, chatgpt)]);

        let reply = gateway.reply("Steve", "switch to claude").await;
        assert_eq!(reply, "no such model, sorry");
        assert_eq!(gateway.active(), Backend::ChatGpt);
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    // ── Conversation memory ────────────────────────────────────

    #[tokio::test]
    async fn test_success_appends_both_turns() {
        let chatgpt = MockBackend::new("chatgpt").with_reply("hi Steve");
        let gateway = gateway_with(vec![(Backend::ChatGpt, chatgpt)]);

        gateway.reply("Steve", "hello there").await;
        assert_eq!(gateway.history_len(), 2);
    }

    #[tokio::test]
    async fn test_memory_never_exceeds_cap() {
        let mut chatgpt = MockBackend::new("chatgpt");
        for i in 0..12 {
            chatgpt.queue_reply(golem_llm::mock::MockReply::text(&format!("a{i}")));
        }
        let gateway = gateway_with(vec![(Backend::ChatGpt, chatgpt)]);

        for i in 0..12 {
            gateway.reply("Steve", &format!("q{i}")).await;
            assert!(gateway.history_len() <= MAX_TURNS);
        }
        assert_eq!(gateway.history_len(), MAX_TURNS);
    }

    #[tokio::test]
    async fn test_context_window_capped_at_five_prior_turns() {
        let mut chatgpt = MockBackend::new("chatgpt");
        for i in 0..7 {
            chatgpt.queue_reply(golem_llm::mock::MockReply::text(&format!("a{i}")));
        }
        let requests = chatgpt.recorded_requests();
        let gateway = gateway_with(vec![(Backend::ChatGpt, chatgpt)]);

        for i in 0..7 {
            gateway.reply("Steve", &format!("q{i}")).await;
        }

        let recorded = requests.lock().unwrap();
        let last = recorded.last().unwrap();
        assert_eq!(last.history.len(), CONTEXT_TURNS);
        assert_eq!(last.user_text, "q6");
        // Window ends with the previous exchange's assistant turn
        assert_eq!(last.history.last().unwrap().content, "a5");
        assert_eq!(last.history.last().unwrap().role, Role::Assistant);
    }

    // ── Failure handling ───────────────────────────────────────

    #[tokio::test]
    async fn test_backend_error_returns_apology_and_leaves_memory_unmodified() {
        let chatgpt = MockBackend::new("chatgpt")
            .with_reply("fine")
            .with_error("HTTP 500: boom");
        let gateway = gateway_with(vec![(Backend::ChatGpt, chatgpt)]);

        gateway.reply("Steve", "first").await;
        assert_eq!(gateway.history_len(), 2);

        let reply = gateway.reply("Steve", "second").await;
        assert_eq!(reply, "Sorry, ChatGPT is not responding right now!");
        assert_eq!(gateway.history_len(), 2);
    }

    #[tokio::test]
    async fn test_unregistered_backend_returns_apology() {
        let gateway = gateway_with(vec![]);
        let reply = gateway.reply("Steve", "anyone home?").await;
        assert_eq!(reply, "Sorry, ChatGPT is not responding right now!");
    }

    #[tokio::test]
    async fn test_apology_names_the_active_backend() {
        let gemini = MockBackend::new("gemini").with_error("HTTP 503");
        let gateway = gateway_with(vec![(Backend::Gemini, gemini)]);
        gateway.set_active(Backend::Gemini);

        let reply = gateway.reply("Steve", "hi").await;
        assert_eq!(reply, "Sorry, Gemini is not responding right now!");
    }

    // ── System prompt ──────────────────────────────────────────

    #[tokio::test]
    async fn test_system_prompt_names_bot_and_speaker() {
        let chatgpt = MockBackend::new("chatgpt").with_reply("ok");
        let requests = chatgpt.recorded_requests();
        let gateway = gateway_with(vec![(Backend::ChatGpt, chatgpt)]);

        gateway.reply("Alex", "hello").await;

        let recorded = requests.lock().unwrap();
        let system = &recorded[0].system;
        assert!(system.contains("named Golem"));
        assert!(system.contains("Current player: Alex"));
        assert!(system.contains("under 100 characters"));
    }
}
