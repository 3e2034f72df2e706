//! Block-related routes

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use kaspa_hashes::Hash;
use rpc_core::RpcError;
use serde::Deserialize;

use crate::api::AppState;
use crate::error::{ExplorerError, Result};
use crate::indexer::block_indexer;
use crate::models::{BlockDetail, BlocksResponse};

#[derive(Deserialize)]
struct BlocksParams {
    limit: Option<usize>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/blocks", get(list_blocks))
        .route("/blocks/:hash", get(get_block_by_hash))
        .with_state(state)
}

#[axum::debug_handler]
async fn list_blocks(
    State(state): State<AppState>,
    query: std::result::Result<Query<BlocksParams>, QueryRejection>,
) -> Result<Json<BlocksResponse>> {
    let Query(params) = query?;
    let snapshot = state.cache.require()?;
    let limit = match params.limit {
        Some(0) => return Err(ExplorerError::InvalidInput("limit must be at least 1".into())),
        Some(n) => n,
        None => snapshot.blocks.len(),
    };

    Ok(Json(BlocksResponse {
        total_count: snapshot.dag.block_count,
        sequence: snapshot.sequence,
        fetched_at: snapshot.fetched_at,
        blocks: snapshot.blocks.iter().take(limit).map(|b| b.summary.clone()).collect(),
    }))
}

/// Served from the snapshot when possible, otherwise one bounded live lookup.
#[axum::debug_handler]
async fn get_block_by_hash(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<BlockDetail>> {
    let hash: Hash = hash
        .parse()
        .map_err(|e| ExplorerError::InvalidInput(format!("invalid block hash: {}", e)))?;

    if let Some(snapshot) = state.cache.current() {
        if let Some(block) = snapshot.block(&hash) {
            return Ok(Json(block.clone()));
        }
    }

    match state.live(state.rpc.get_block(hash, true)).await {
        Ok(block) => Ok(Json(block_indexer::detail(&block))),
        Err(ExplorerError::Rpc(RpcError::Rpc(message))) => {
            tracing::debug!("node does not know block {}: {}", hash, message);
            Err(ExplorerError::NotFound(format!("block {}", hash)))
        }
        Err(e) => Err(e),
    }
}
