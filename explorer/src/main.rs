//! Kaspa Testnet Explorer - Main entry point

use std::sync::Arc;

use anyhow::Context;
use kaspa_explorer::{
    api::{ApiServer, AppState},
    cache::{BalanceCache, SnapshotCache},
    config::{self, Args, Config},
    indexer::{service::RefreshSettings, RefreshService},
    rpc_client::RpcClient,
    status::NodeStatus,
};
use rpc_core::RpcApi;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = config::parse_args();
    init_logging(&args);

    let config = Config::from_args(&args).context("invalid configuration")?;

    info!("Starting Kaspa Testnet Explorer v{}", env!("CARGO_PKG_VERSION"));
    info!("Node: {} ({})", config.node.kaspad_url, config.node.network);

    let client = RpcClient::new(&config.node.kaspad_url, config.rpc_timeout())
        .with_context(|| format!("invalid node endpoint {}", config.node.kaspad_url))?;
    let server_url = client.url().to_string();
    let rpc: Arc<dyn RpcApi> = Arc::new(client);

    let cache = Arc::new(SnapshotCache::new());
    let status = Arc::new(NodeStatus::new());
    let balances = BalanceCache::new(config.balance_cache_ttl(), config.cache.balance_cache_capacity);

    let refresher = RefreshService::new(
        rpc.clone(),
        cache.clone(),
        status.clone(),
        RefreshSettings {
            interval: config.refresh_interval(),
            block_limit: config.cache.block_limit,
            mempool_retain: config.cache.mempool_retain,
        },
    )
    .spawn();

    let state = AppState {
        cache,
        status,
        balances,
        rpc,
        server_url,
        network: config.node.network.clone(),
        rpc_timeout: config.rpc_timeout(),
    };

    let static_dir = config.server.static_dir.clone();
    let static_dir = if static_dir.is_dir() {
        Some(static_dir)
    } else {
        warn!("Static directory {} not found, frontend disabled", static_dir.display());
        None
    };

    let server = ApiServer::new(state, config.listen_addr(), static_dir);
    server.start(shutdown_signal()).await?;

    refresher.abort();
    info!("Explorer stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn init_logging(args: &Args) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if args.log_json {
        fmt().json().with_env_filter(filter).with_target(true).init();
    } else {
        fmt().with_env_filter(filter).with_target(true).with_thread_ids(true).init();
    }
}
