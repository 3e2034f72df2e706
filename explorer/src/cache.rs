//! In-process caches: the refreshed node snapshot and the per-address balance cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use kaspa_hashes::Hash;
use moka::future::Cache;
use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::error::{ExplorerError, Result};
use crate::models::{AddressBalance, BlockDetail, PeerSummary, SnapshotEvent, TransactionInfo};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct DagSummary {
    pub network: String,
    pub block_count: u64,
    pub sink: Hash,
    pub difficulty: f64,
    pub virtual_daa_score: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MempoolSnapshot {
    /// Size of the node's mempool at fetch time.
    pub size: usize,
    /// Retained transactions, highest fee first.
    pub transactions: Vec<TransactionInfo>,
}

/// Node state as of a single refresh cycle. Never mutated after publication.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub sequence: u64,
    pub fetched_at: DateTime<Utc>,
    pub dag: DagSummary,
    pub blocks: Vec<BlockDetail>,
    pub mempool: MempoolSnapshot,
    pub peers: Vec<PeerSummary>,
    by_hash: HashMap<Hash, usize>,
}

impl Snapshot {
    pub fn new(
        dag: DagSummary,
        blocks: Vec<BlockDetail>,
        mempool: MempoolSnapshot,
        peers: Vec<PeerSummary>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let by_hash = blocks.iter().enumerate().map(|(i, b)| (b.summary.hash, i)).collect();
        Self { sequence: 0, fetched_at, dag, blocks, mempool, peers, by_hash }
    }

    pub fn block(&self, hash: &Hash) -> Option<&BlockDetail> {
        self.by_hash.get(hash).map(|&i| &self.blocks[i])
    }

    pub fn event(&self) -> SnapshotEvent {
        SnapshotEvent {
            sequence: self.sequence,
            fetched_at: self.fetched_at,
            block_count: self.dag.block_count,
            latest_block: self.blocks.first().map(|b| b.summary.clone()),
            mempool_size: self.mempool.size,
            peer_count: self.peers.len(),
        }
    }
}

/// Single-writer, many-reader holder of the current [`Snapshot`].
///
/// Readers clone the `Arc` and release the lock immediately; the refresher
/// swaps in a whole new snapshot, so a reader only ever sees one refresh cycle.
pub struct SnapshotCache {
    current: RwLock<Option<Arc<Snapshot>>>,
    events: broadcast::Sender<SnapshotEvent>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { current: RwLock::new(None), events }
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.read().clone()
    }

    /// The current snapshot, or [`ExplorerError::NotSynced`] before the first refresh.
    pub fn require(&self) -> Result<Arc<Snapshot>> {
        self.current().ok_or(ExplorerError::NotSynced)
    }

    /// Replaces the current snapshot and assigns it the next sequence number.
    pub fn publish(&self, mut snapshot: Snapshot) -> Arc<Snapshot> {
        let published = {
            let mut current = self.current.write();
            snapshot.sequence = current.as_ref().map_or(1, |s| s.sequence + 1);
            let published = Arc::new(snapshot);
            *current = Some(published.clone());
            published
        };

        // No subscribers is fine.
        let _ = self.events.send(published.event());
        published
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SnapshotEvent> {
        self.events.subscribe()
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Short-lived balance cache keyed by the canonical address string.
#[derive(Clone)]
pub struct BalanceCache {
    inner: Option<Cache<String, Arc<AddressBalance>>>,
}

impl BalanceCache {
    /// A zero `ttl` disables caching entirely.
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        let inner = (!ttl.is_zero()).then(|| Cache::builder().time_to_live(ttl).max_capacity(capacity).build());
        Self { inner }
    }

    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub async fn get(&self, address: &str) -> Option<Arc<AddressBalance>> {
        match &self.inner {
            Some(cache) => cache.get(address).await,
            None => None,
        }
    }

    pub async fn insert(&self, address: String, balance: Arc<AddressBalance>) {
        if let Some(cache) = &self.inner {
            cache.insert(address, balance).await;
        }
    }
}
