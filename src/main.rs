mod api;
mod blocktime;
mod catalog;
mod config;
mod error;
mod fetcher;
mod loader;
mod normalize;
mod report;
mod state;
mod types;

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthState;
use crate::api::routes::{router, ApiState};
use crate::config::{Config, FETCH_TIMEOUT_SECS};
use crate::error::Result;
use crate::loader::Loader;
use crate::state::DataCache;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()?;

    let cache = Arc::new(DataCache::new(Duration::from_secs(cfg.cache_ttl_secs)));
    let health = Arc::new(HealthState::new());
    let loader = Arc::new(Loader::new(
        cfg.clone(),
        client,
        Arc::clone(&cache),
        Arc::clone(&health),
    ));
    info!(
        "Dashboard ready: indexer={} cache_ttl={}s",
        cfg.indexer_url, cfg.cache_ttl_secs
    );

    let api_state = ApiState { loader, cache, health };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
