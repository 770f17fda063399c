use serde::{Deserialize, Serialize};

use golem_core::Backend;

/// Root configuration — maps to `golem.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GolemConfig {
    pub server: ServerConfig,
    pub bot: BotConfig,
    pub auth: AuthConfig,
    pub ai: AiConfig,
    pub bridge: BridgeConfig,
    pub logging: LoggingConfig,
}

// ── Server ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Minecraft server hostname or IP.
    pub host: String,
    /// Minecraft server port.
    pub port: u16,
    /// Protocol version the bridge should speak, e.g. "1.20.1".
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 25565,
            version: "1.20.1".into(),
        }
    }
}

// ── Bot ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// In-game username. Also drives directed-speech detection: any chat
    /// line containing this name is treated as addressed to the bot.
    pub username: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            username: "Golem".into(),
        }
    }
}

// ── Auth ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Password for the server's /register and /login chat commands.
    pub password: String,
}

// ── AI ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Backend used until a player issues `switch to <name>`:
    /// "chatgpt", "gemini", or "deepseek".
    pub default_backend: String,
    pub chatgpt: BackendCredentials,
    pub gemini: BackendCredentials,
    pub deepseek: BackendCredentials,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            default_backend: "chatgpt".into(),
            chatgpt: BackendCredentials::default(),
            gemini: BackendCredentials::default(),
            deepseek: BackendCredentials::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendCredentials {
    /// API key. Can also be supplied via OPENAI_API_KEY / GEMINI_API_KEY /
    /// DEEPSEEK_API_KEY environment variables; the config file takes
    /// priority, env is the fallback.
    pub api_key: Option<String>,
}

// ── Bridge ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// WebSocket URL of the game-client bridge process.
    pub url: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:3720".into(),
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json", "compact".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Default for root ───────────────────────────────────────────

impl Default for GolemConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            bot: BotConfig::default(),
            auth: AuthConfig::default(),
            ai: AiConfig::default(),
            bridge: BridgeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GolemConfig {
    /// The configured default backend. Guaranteed to parse once
    /// `validate()` has passed.
    pub fn default_backend(&self) -> Backend {
        self.ai.default_backend.parse().unwrap_or(Backend::ChatGpt)
    }

    /// Credentials for a backend.
    pub fn credentials_for(&self, backend: Backend) -> &BackendCredentials {
        match backend {
            Backend::ChatGpt => &self.ai.chatgpt,
            Backend::Gemini => &self.ai.gemini,
            Backend::DeepSeek => &self.ai.deepseek,
        }
    }

    /// Validate the config. Returns non-fatal warnings on success.
    pub fn validate(&self) -> Result<Vec<String>, String> {
        let mut warnings = Vec::new();

        if self.bot.username.trim().is_empty() {
            return Err("bot.username must not be empty".into());
        }
        if self.server.host.trim().is_empty() {
            return Err("server.host must not be empty".into());
        }

        let backend: Backend = self.ai.default_backend.parse().map_err(|_| {
            format!(
                "ai.default_backend: unknown backend '{}' (expected chatgpt, gemini, or deepseek)",
                self.ai.default_backend
            )
        })?;

        if self.credentials_for(backend).api_key.is_none() {
            warnings.push(format!(
                "no API key configured for default backend '{backend}' — AI replies will fail until one is set"
            ));
        }
        if self.auth.password.is_empty() {
            warnings.push("auth.password is empty — /register and /login will be sent without a password".into());
        }

        Ok(warnings)
    }
}
