//! Poisson Odds API — entry point.
//!
//! Loads `.env` and configuration, initialises structured logging and
//! serves the HTTP API until Ctrl+C.

use anyhow::Result;
use tracing::info;

use poisson_odds::api;
use poisson_odds::config::AppConfig;

/// Optional config file; environment variables override its values.
const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let cfg = AppConfig::load(CONFIG_PATH)?;
    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        api_keys = cfg.api_keys.len(),
        cors_origins = ?cfg.server.cors_allow_origins,
        mu_default = cfg.model.mu_default,
        home_adv = cfg.model.home_adv,
        "Poisson odds API starting up"
    );

    api::serve(cfg).await
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("poisson_odds=info"));

    let json_logging = std::env::var("POISSON_ODDS_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
