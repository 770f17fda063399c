#[cfg(test)]
mod tests {
    use golem_config::ConfigLoader;
    use golem_config::schema::*;
    use golem_core::Backend;
    use std::io::Write;

    // ── Default tests ──────────────────────────────────────────

    #[test]
    fn test_golem_config_defaults() {
        let config = GolemConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 25565);
        assert_eq!(config.server.version, "1.20.1");
        assert_eq!(config.bot.username, "Golem");
        assert_eq!(config.ai.default_backend, "chatgpt");
        assert_eq!(config.default_backend(), Backend::ChatGpt);
    }

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "pretty");
    }

    #[test]
    fn test_bridge_config_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.url, "ws://127.0.0.1:3720");
    }

    // ── TOML roundtrip tests ───────────────────────────────────

    #[test]
    fn test_config_toml_roundtrip() {
        let config = GolemConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let restored: GolemConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(restored.server.host, config.server.host);
        assert_eq!(restored.bot.username, config.bot.username);
        assert_eq!(restored.ai.default_backend, config.ai.default_backend);
    }

    #[test]
    fn test_partial_toml_applies_defaults() {
        let toml_str = r#"
[server]
host = "mc.example.com"

[ai]
default_backend = "gemini"

[ai.gemini]
api_key = "g-123"
"#;
        let config: GolemConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, "mc.example.com");
        assert_eq!(config.default_backend(), Backend::Gemini);
        assert_eq!(config.ai.gemini.api_key.as_deref(), Some("g-123"));
        // Defaults should fill in
        assert_eq!(config.server.port, 25565);
        assert_eq!(config.bot.username, "Golem");
        assert!(config.ai.chatgpt.api_key.is_none());
    }

    // ── Validation tests ───────────────────────────────────────

    #[test]
    fn test_validate_rejects_unknown_backend() {
        let mut config = GolemConfig::default();
        config.ai.default_backend = "claude".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_username() {
        let mut config = GolemConfig::default();
        config.bot.username = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_warns_on_missing_key_and_password() {
        let config = GolemConfig::default();
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.contains("API key")));
        assert!(warnings.iter().any(|w| w.contains("auth.password")));
    }

    #[test]
    fn test_validate_clean_config_has_no_warnings() {
        let mut config = GolemConfig::default();
        config.ai.chatgpt.api_key = Some("sk-test".into());
        config.auth.password = "hunter2".into();
        assert!(config.validate().unwrap().is_empty());
    }

    // ── ConfigLoader tests ─────────────────────────────────────

    #[test]
    fn test_loader_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("golem.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[bot]
username = "Clanker"

[auth]
password = "hunter2"

[ai.chatgpt]
api_key = "sk-test"
"#
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.bot.username, "Clanker");
        assert_eq!(config.auth.password, "hunter2");
    }

    #[test]
    fn test_loader_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("golem.toml");
        std::fs::write(&path, "this is not toml [").unwrap();
        assert!(ConfigLoader::load(Some(&path)).is_err());
    }

    #[test]
    fn test_resolve_path_prefers_explicit() {
        let explicit = std::path::Path::new("/tmp/custom.toml");
        assert_eq!(ConfigLoader::resolve_path(Some(explicit)), explicit);
    }
}
