//! Periodic snapshot refresh

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rpc_core::{RpcApi, RpcError, RpcPeerInfo};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::cache::{DagSummary, Snapshot, SnapshotCache};
use crate::indexer::{block_indexer, transaction_indexer};
use crate::models::PeerSummary;
use crate::status::NodeStatus;

#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub interval: Duration,
    pub block_limit: usize,
    pub mempool_retain: usize,
}

/// Sole writer of the [`SnapshotCache`].
pub struct RefreshService {
    rpc: Arc<dyn RpcApi>,
    cache: Arc<SnapshotCache>,
    status: Arc<NodeStatus>,
    settings: RefreshSettings,
}

impl RefreshService {
    pub fn new(
        rpc: Arc<dyn RpcApi>,
        cache: Arc<SnapshotCache>,
        status: Arc<NodeStatus>,
        settings: RefreshSettings,
    ) -> Self {
        Self { rpc, cache, status, settings }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    pub async fn run(self) {
        info!(
            "Starting snapshot refresh every {:?} ({} blocks)",
            self.settings.interval, self.settings.block_limit
        );

        let mut ticker = interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.refresh().await;
        }
    }

    /// One refresh cycle: fetch, publish on success, record node status either way.
    pub async fn refresh(&self) -> Option<Arc<Snapshot>> {
        match self.fetch_snapshot().await {
            Ok((snapshot, server_info)) => {
                let published = self.cache.publish(snapshot);
                if self.status.record_success(server_info, published.fetched_at) {
                    info!("Connected to node");
                }
                debug!(
                    "Published snapshot #{} ({} blocks, {} mempool txs, {} peers)",
                    published.sequence,
                    published.blocks.len(),
                    published.mempool.size,
                    published.peers.len()
                );
                Some(published)
            }
            Err(e) => {
                if self.status.record_failure(&e) {
                    info!("Lost connection to node");
                }
                match &e {
                    RpcError::Protocol(_) => warn!("Refresh failed, keeping previous snapshot: {}", e),
                    _ if e.is_connection_failure() => warn!("Node unreachable: {}", e),
                    _ => error!("Refresh failed: {}", e),
                }
                None
            }
        }
    }

    async fn fetch_snapshot(&self) -> Result<(Snapshot, rpc_core::RpcServerInfo), RpcError> {
        let server_info = self.rpc.get_server_info().await?;
        let dag = self.rpc.get_block_dag_info().await?;
        let blocks = self.rpc.get_blocks_from(dag.sink, self.settings.block_limit).await?;
        let mempool = self.rpc.get_mempool().await?;
        let peers = self.rpc.get_peers().await?;

        let snapshot = Snapshot::new(
            DagSummary {
                network: dag.network,
                block_count: dag.block_count,
                sink: dag.sink,
                difficulty: dag.difficulty,
                virtual_daa_score: dag.virtual_daa_score,
            },
            blocks.iter().map(block_indexer::detail).collect(),
            transaction_indexer::mempool_snapshot(mempool, self.settings.mempool_retain),
            peers.iter().map(peer_summary).collect(),
            Utc::now(),
        );

        Ok((snapshot, server_info))
    }
}

fn peer_summary(peer: &RpcPeerInfo) -> PeerSummary {
    PeerSummary {
        id: peer.id.clone(),
        address: peer.address.clone(),
        is_connected: true,
        is_outbound: peer.is_outbound,
        is_ibd_peer: peer.is_ibd_peer,
        last_ping_ms: peer.last_ping_duration,
        user_agent: peer.user_agent.clone(),
        protocol_version: peer.advertised_protocol_version,
        time_connected: peer.time_connected,
    }
}
