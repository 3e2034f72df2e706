//! Shared handler state

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rpc_core::{RpcApi, RpcError, RpcResult};

use crate::cache::{BalanceCache, SnapshotCache};
use crate::error::Result;
use crate::status::NodeStatus;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<SnapshotCache>,
    pub status: Arc<NodeStatus>,
    pub balances: BalanceCache,
    pub rpc: Arc<dyn RpcApi>,
    pub server_url: String,
    pub network: String,
    pub rpc_timeout: Duration,
}

impl AppState {
    /// Bounds a live node call so a stalled node cannot hang the request.
    pub async fn live<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = RpcResult<T>>,
    {
        let outcome = tokio::time::timeout(self.rpc_timeout, call)
            .await
            .map_err(|_| RpcError::Timeout(self.rpc_timeout))?;
        Ok(outcome?)
    }
}
