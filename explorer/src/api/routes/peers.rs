//! Peer list route

use axum::{extract::State, routing::get, Json, Router};

use crate::api::AppState;
use crate::error::Result;
use crate::models::PeersResponse;

pub fn routes(state: AppState) -> Router {
    Router::new().route("/peers", get(get_peers)).with_state(state)
}

#[axum::debug_handler]
async fn get_peers(State(state): State<AppState>) -> Result<Json<PeersResponse>> {
    let snapshot = state.cache.require()?;
    Ok(Json(PeersResponse {
        sequence: snapshot.sequence,
        fetched_at: snapshot.fetched_at,
        peers: snapshot.peers.clone(),
    }))
}
