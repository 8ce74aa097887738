use clap::Parser;
use gemini_core::config::MODEL_ENV;
use gemini_relay::config::RelayConfig;
use gemini_relay::delivery::HttpCallbackSink;
use gemini_relay::http_server::{self, AppState};
use gemini_relay::logging;
use gemini_relay::provider::GeminiProviderFactory;
use gemini_relay::relay::Relay;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "relay-daemon", about = "Relays Nightbot commands to Gemini")]
struct Args {
    /// Path to config file (defaults to ~/.config/gemini-relay/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP server address
    #[arg(long, env = "RELAY_HTTP_ADDR")]
    http_addr: Option<SocketAddr>,

    /// Gemini model to use
    #[arg(short = 'o', long, env = MODEL_ENV)]
    model: Option<String>,

    /// Maximum characters in a chat answer
    #[arg(long)]
    char_limit: Option<usize>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    logging::init(&args.log_level)?;
    info!("Starting relay daemon");

    let mut config = match RelayConfig::load(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(anyhow::anyhow!("Configuration error: {}", e));
        }
    };

    // Update config from CLI args
    if let Some(http_addr) = args.http_addr {
        config.http_addr = http_addr;
    }
    if let Some(model) = args.model {
        config.gemini.model_name = Some(model);
    }
    if let Some(char_limit) = args.char_limit {
        config.policy.char_limit = char_limit;
    }
    config.validate()?;

    if config.api_key().is_none() {
        warn!(
            env = %config.api_key_env,
            "No API key found; requests will fail until it is set"
        );
    }
    info!(model = config.gemini.model(), char_limit = config.policy.char_limit, "Configuration loaded");

    let relay = Relay::new(
        config.policy.clone(),
        Arc::new(GeminiProviderFactory::new(config.gemini.clone())),
        Arc::new(HttpCallbackSink::new()),
    );

    if let Err(e) = http_server::run_server(AppState::new(config, relay)).await {
        error!(error = %e, "HTTP server failed");
        return Err(e.into());
    }

    info!("Relay daemon shutting down");
    Ok(())
}
