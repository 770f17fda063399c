use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::schema::GolemConfig;

/// Loads the Golem configuration.
///
/// Resolution order for the config path: explicit path > GOLEM_CONFIG env >
/// ~/.golem/golem.toml. The config is read once at startup and is immutable
/// for the lifetime of the process.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the config path: explicit path > GOLEM_CONFIG env > ~/.golem/golem.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("GOLEM_CONFIG") {
            return PathBuf::from(p);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".golem")
            .join("golem.toml")
    }

    /// Load the config from disk, falling back to defaults.
    pub fn load(path: Option<&Path>) -> golem_core::Result<GolemConfig> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            toml::from_str::<GolemConfig>(&raw).map_err(|e| {
                golem_core::GolemError::Config(format!(
                    "failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            GolemConfig::default()
        };

        // Apply environment variable overrides
        let config = Self::apply_env_overrides(config);

        // Validate config — log warnings, fail on errors
        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => {
                return Err(golem_core::GolemError::Config(e));
            }
        }

        Ok(config)
    }

    /// Apply env var overrides (GOLEM_SERVER_HOST, GOLEM_LOG_LEVEL, etc.)
    fn apply_env_overrides(mut config: GolemConfig) -> GolemConfig {
        if let Ok(v) = std::env::var("GOLEM_SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = std::env::var("GOLEM_SERVER_PORT") {
            if let Ok(port) = v.parse::<u16>() {
                config.server.port = port;
            }
        }
        if let Ok(v) = std::env::var("GOLEM_BOT_USERNAME") {
            config.bot.username = v;
        }
        if let Ok(v) = std::env::var("GOLEM_LOG_LEVEL") {
            config.logging.level = v;
        }
        // API keys: env var fills in when the config file doesn't have the
        // key set. Config file takes priority, env is the fallback.
        if config.ai.chatgpt.api_key.is_none() {
            if let Ok(v) = std::env::var("OPENAI_API_KEY") {
                config.ai.chatgpt.api_key = Some(v);
            }
        }
        if config.ai.gemini.api_key.is_none() {
            if let Ok(v) = std::env::var("GEMINI_API_KEY") {
                config.ai.gemini.api_key = Some(v);
            }
        }
        if config.ai.deepseek.api_key.is_none() {
            if let Ok(v) = std::env::var("DEEPSEEK_API_KEY") {
                config.ai.deepseek.api_key = Some(v);
            }
        }
        config
    }
}
