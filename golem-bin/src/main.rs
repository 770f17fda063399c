use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use golem_client::bridge::{BridgeConnector, BridgeTarget};
use golem_client::session::{Connector, SessionEvent};
use golem_client::sim::{SimConnector, SimWorld};
use golem_config::{ConfigLoader, GolemConfig};
use golem_core::Backend;
use golem_llm::chatgpt::ChatGptBackend;
use golem_llm::deepseek::DeepSeekBackend;
use golem_llm::gateway::ReplyGateway;
use golem_llm::gemini::GeminiBackend;
use golem_runtime::BotRuntime;

/// Chat-driven Minecraft companion bot.
#[derive(Parser)]
#[command(name = "golem", version, about)]
struct Cli {
    /// Path to golem.toml (default: ~/.golem/golem.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run against the in-process simulator instead of the game bridge.
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> golem_core::Result<()> {
    let config = ConfigLoader::load(cli.config.as_deref())?;
    init_tracing(&config);

    info!(
        username = %config.bot.username,
        server = %format!("{}:{}", config.server.host, config.server.port),
        backend = %config.ai.default_backend,
        "starting golem"
    );

    let gateway = Arc::new(build_gateway(&config));
    let runtime = Arc::new(BotRuntime::new(config.clone(), gateway)?);

    let connector: Arc<dyn Connector> = if cli.offline {
        info!("offline mode — using the in-process simulator");
        offline_connector()
    } else {
        let target = BridgeTarget {
            host: config.server.host.clone(),
            port: config.server.port,
            version: config.server.version.clone(),
            username: config.bot.username.clone(),
        };
        Arc::new(BridgeConnector::new(config.bridge.url.clone(), target))
    };

    let run_task = {
        let runtime = Arc::clone(&runtime);
        tokio::spawn(async move { runtime.run(connector).await })
    };

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    runtime.shutdown().await;
    run_task.abort();
    Ok(())
}

/// Wire up one adapter per configured API key. Backends without a key stay
/// unregistered; the gateway answers for them with an apology.
fn build_gateway(config: &GolemConfig) -> ReplyGateway {
    let mut gateway = ReplyGateway::new(config.bot.username.clone(), config.default_backend());
    if let Some(key) = &config.ai.chatgpt.api_key {
        gateway.register(Backend::ChatGpt, Arc::new(ChatGptBackend::new(key.clone())));
    }
    if let Some(key) = &config.ai.gemini.api_key {
        gateway.register(Backend::Gemini, Arc::new(GeminiBackend::new(key.clone())));
    }
    if let Some(key) = &config.ai.deepseek.api_key {
        gateway.register(Backend::DeepSeek, Arc::new(DeepSeekBackend::new(key.clone())));
    }
    gateway
}

/// An empty simulated world that reports ready and then idles. Useful for
/// poking at logging and config without a server.
fn offline_connector() -> Arc<dyn Connector> {
    let connector = SimConnector::new(SimWorld::new());
    let events = connector.script();
    tokio::spawn(async move {
        let _ = events.send(SessionEvent::Ready).await;
        // Keep the scripted connection open until shutdown.
        std::future::pending::<()>().await;
    });
    Arc::new(connector)
}

fn init_tracing(config: &GolemConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.logging.format.as_str() {
        "json" => builder.json().init(),
        "compact" => builder.compact().init(),
        _ => builder.init(),
    }
}
