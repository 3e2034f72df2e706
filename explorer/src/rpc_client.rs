//! RPC client for connecting to a kaspad node over gRPC

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kaspa_addresses::Address;
use kaspa_grpc_client::GrpcClient;
use kaspa_hashes::Hash;
use kaspa_rpc_core::api::rpc::RpcApi as _;
use rpc_core::*;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Lazily connected gRPC client. The connection is opened on first use and
/// reopened after the node drops it.
pub struct RpcClient {
    url: String,
    timeout: Duration,
    client: Mutex<Option<Arc<GrpcClient>>>,
}

impl RpcClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, RpcError> {
        let url = normalize_endpoint(endpoint)?;
        let parsed = url::Url::parse(&url)
            .map_err(|e| RpcError::Connection(format!("invalid node endpoint '{}': {}", endpoint, e)))?;
        if parsed.host_str().is_none() || parsed.port().is_none() {
            return Err(RpcError::Connection(format!("node endpoint '{}' needs a host and port", endpoint)));
        }

        Ok(Self { url, timeout, client: Mutex::new(None) })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn connected(&self) -> Result<Arc<GrpcClient>, RpcError> {
        let mut slot = self.client.lock().await;
        if let Some(client) = slot.as_ref() {
            if client.is_connected() {
                return Ok(client.clone());
            }
            debug!("gRPC connection to {} dropped, reconnecting", self.url);
        }

        let client = GrpcClient::connect(self.url.clone())
            .await
            .map_err(|e| RpcError::Connection(format!("gRPC connection to {} failed: {}", self.url, e)))?;
        info!("Opened gRPC connection to {}", self.url);

        let client = Arc::new(client);
        *slot = Some(client.clone());
        Ok(client)
    }

    async fn forget(&self, client: &Arc<GrpcClient>) {
        let mut slot = self.client.lock().await;
        if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, client)) {
            *slot = None;
        }
        let _ = client.disconnect().await;
    }

    /// Runs one node call under the RPC timeout, connecting first if needed.
    async fn call<T, F, Fut>(&self, method: &str, request: F) -> Result<T, RpcError>
    where
        F: FnOnce(Arc<GrpcClient>) -> Fut + Send,
        Fut: Future<Output = kaspa_rpc_core::RpcResult<T>> + Send,
        T: Send,
    {
        let attempt = async {
            let client = self.connected().await?;
            match request(client.clone()).await {
                Ok(response) => Ok(response),
                Err(e) if !client.is_connected() => {
                    self.forget(&client).await;
                    Err(RpcError::Connection(format!("{} failed, connection lost: {}", method, e)))
                }
                Err(e) => Err(RpcError::Rpc(format!("{}: {}", method, e))),
            }
        };

        tokio::time::timeout(self.timeout, attempt)
            .await
            .map_err(|_| RpcError::Timeout(self.timeout))?
    }
}

/// Turns `host:port` or a `grpc://`, `http://` or `https://` URL into the
/// `grpc://host:port` form the gRPC client dials.
pub fn normalize_endpoint(endpoint: &str) -> Result<String, RpcError> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    let bare = ["grpc://", "http://", "https://"]
        .iter()
        .find_map(|scheme| endpoint.strip_prefix(scheme))
        .unwrap_or(endpoint);

    if bare.is_empty() || bare.contains("://") {
        return Err(RpcError::Connection(format!("unsupported node endpoint '{}'", endpoint)));
    }
    Ok(format!("grpc://{}", bare))
}

#[async_trait]
impl RpcApi for RpcClient {
    async fn get_server_info(&self) -> RpcResult<RpcServerInfo> {
        let info = self.call("getServerInfo", |c| async move { c.get_server_info().await }).await?;
        Ok(info.into())
    }

    async fn get_block_dag_info(&self) -> RpcResult<RpcBlockDagInfo> {
        let info = self.call("getBlockDagInfo", |c| async move { c.get_block_dag_info().await }).await?;
        Ok(info.into())
    }

    async fn get_block(&self, hash: Hash, include_transactions: bool) -> RpcResult<RpcBlock> {
        let block = self
            .call("getBlock", |c| async move { c.get_block(hash, include_transactions).await })
            .await?;
        if block.header.hash != hash {
            return Err(RpcError::Protocol(format!("asked for block {} but got {}", hash, block.header.hash)));
        }
        Ok(block.into())
    }

    async fn get_mempool_entries(
        &self,
        include_orphan_pool: bool,
        filter_transaction_pool: bool,
    ) -> RpcResult<Vec<RpcMempoolEntry>> {
        let entries = self
            .call("getMempoolEntries", |c| async move {
                c.get_mempool_entries(include_orphan_pool, filter_transaction_pool).await
            })
            .await?;
        Ok(entries.into_iter().map(RpcMempoolEntry::from).collect())
    }

    async fn get_utxos_by_addresses(&self, addresses: Vec<Address>) -> RpcResult<Vec<RpcUtxosByAddressesEntry>> {
        let entries = self
            .call("getUtxosByAddresses", |c| async move { c.get_utxos_by_addresses(addresses).await })
            .await?;
        Ok(entries.into_iter().map(RpcUtxosByAddressesEntry::from).collect())
    }

    async fn get_connected_peer_info(&self) -> RpcResult<Vec<RpcPeerInfo>> {
        let response = self
            .call("getConnectedPeerInfo", |c| async move { c.get_connected_peer_info().await })
            .await?;
        Ok(response.peer_info.into_iter().map(RpcPeerInfo::from).collect())
    }
}
