//! Network and connection status

use axum::{extract::State, routing::get, Json, Router};

use crate::api::AppState;
use crate::models::NetworkInfo;

pub fn routes(state: AppState) -> Router {
    Router::new().route("/info", get(get_network_info)).with_state(state)
}

/// Always answers, even before the first refresh or while the node is down.
#[axum::debug_handler]
async fn get_network_info(State(state): State<AppState>) -> Json<NetworkInfo> {
    let node = state.status.get();
    let snapshot = state.cache.current();

    Json(NetworkInfo {
        server_url: state.server_url.clone(),
        network: state.network.clone(),
        is_connected: node.is_connected,
        is_synced: node.server_info.as_ref().map(|i| i.is_synced),
        server_version: node.server_info.as_ref().map(|i| i.server_version.clone()),
        virtual_daa_score: snapshot.as_ref().map(|s| s.dag.virtual_daa_score),
        block_count: snapshot.as_ref().map(|s| s.dag.block_count),
        snapshot_sequence: snapshot.as_ref().map(|s| s.sequence),
        last_refresh: node.last_success,
        last_error: node.last_error,
    })
}
