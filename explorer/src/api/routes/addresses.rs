//! Address balance route

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use kaspa_addresses::Address;

use crate::api::AppState;
use crate::error::{ExplorerError, Result};
use crate::indexer::address_indexer;
use crate::models::AddressBalance;

pub fn routes(state: AppState) -> Router {
    Router::new().route("/address/:address", get(get_address_balance)).with_state(state)
}

/// Status for a balance: an address with no UTXOs is reported as not found,
/// still carrying the zero balance body.
fn balance_status(balance: &AddressBalance) -> StatusCode {
    if balance.utxo_count == 0 {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

/// Live UTXO query per request, behind the short-lived balance cache.
#[axum::debug_handler]
async fn get_address_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<(StatusCode, Json<AddressBalance>)> {
    let address = Address::try_from(address.as_str())
        .map_err(|e| ExplorerError::InvalidInput(format!("invalid address: {}", e)))?;
    let key = address.to_string();

    if let Some(cached) = state.balances.get(&key).await {
        tracing::debug!("balance cache hit for {}", key);
        return Ok((balance_status(&cached), Json(cached.as_ref().clone())));
    }

    let entries = state.live(state.rpc.get_utxos(&address)).await?;
    let reference_daa = state.cache.current().map(|s| s.dag.virtual_daa_score);
    let balance = address_indexer::address_balance(&address, entries, reference_daa, Utc::now());

    tracing::debug!("{} holds {} sompi in {} UTXOs", key, balance.balance, balance.utxo_count);

    let balance = Arc::new(balance);
    state.balances.insert(key, balance.clone()).await;
    Ok((balance_status(&balance), Json(balance.as_ref().clone())))
}
