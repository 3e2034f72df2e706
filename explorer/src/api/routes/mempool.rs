//! Mempool route

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::error::Result;
use crate::models::MempoolResponse;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

#[derive(Deserialize)]
struct MempoolParams {
    limit: Option<usize>,
}

pub fn routes(state: AppState) -> Router {
    Router::new().route("/mempool", get(get_mempool)).with_state(state)
}

#[axum::debug_handler]
async fn get_mempool(
    State(state): State<AppState>,
    query: std::result::Result<Query<MempoolParams>, QueryRejection>,
) -> Result<Json<MempoolResponse>> {
    let Query(params) = query?;
    let snapshot = state.cache.require()?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    Ok(Json(MempoolResponse {
        size: snapshot.mempool.size,
        sequence: snapshot.sequence,
        fetched_at: snapshot.fetched_at,
        transactions: snapshot.mempool.transactions.iter().take(limit).cloned().collect(),
    }))
}
