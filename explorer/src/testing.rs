//! In-memory node used by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kaspa_addresses::Address;
use kaspa_hashes::Hash;
use parking_lot::Mutex;
use rpc_core::*;

pub fn h(n: u64) -> Hash {
    Hash::from_u64_word(n)
}

pub fn test_block(n: u64, parents: Vec<u64>) -> RpcBlock {
    RpcBlock {
        header: RpcBlockHeader {
            hash: h(n),
            version: 1,
            parents_by_level: vec![parents.into_iter().map(h).collect()],
            timestamp: 1_700_000_000_000 + n * 1_000,
            bits: 0x1e7fffff,
            nonce: n,
            daa_score: n,
            blue_score: n,
        },
        transactions: vec![],
        verbose_data: None,
    }
}

fn mempool_entry(id: u64, fee: u64) -> RpcMempoolEntry {
    RpcMempoolEntry {
        fee,
        transaction: RpcTransaction {
            version: 0,
            inputs: vec![],
            outputs: vec![RpcTransactionOutput {
                value: 1_000 * id,
                script_public_key: RpcScriptPublicKey { version: 0, script: "20ab".into() },
            }],
            lock_time: 0,
            verbose_data: Some(RpcTransactionVerboseData {
                transaction_id: h(10_000 + id),
                hash: h(10_000 + id),
                block_hash: None,
                block_time: 0,
            }),
        },
        is_orphan: false,
    }
}

pub struct MockNode {
    blocks: Mutex<HashMap<Hash, RpcBlock>>,
    sink: Mutex<Hash>,
    utxos: Mutex<HashMap<String, Vec<RpcUtxosByAddressesEntry>>>,
    unreachable: AtomicBool,
    malformed: AtomicBool,
    delay: Mutex<Option<Duration>>,
    utxo_calls: AtomicUsize,
}

impl MockNode {
    /// Linear chain 1 <- 2 <- ... <- n, two mempool entries and one peer.
    pub fn with_chain(n: u64) -> Self {
        let blocks = (1..=n)
            .map(|i| {
                let parents = if i == 1 { vec![] } else { vec![i - 1] };
                (h(i), test_block(i, parents))
            })
            .collect();
        Self {
            blocks: Mutex::new(blocks),
            sink: Mutex::new(h(n)),
            utxos: Mutex::new(HashMap::new()),
            unreachable: AtomicBool::new(false),
            malformed: AtomicBool::new(false),
            delay: Mutex::new(None),
            utxo_calls: AtomicUsize::new(0),
        }
    }

    pub fn sink(&self) -> Hash {
        *self.sink.lock()
    }

    /// Appends a block on top of the current sink.
    pub fn extend_chain(&self, n: u64) {
        let parent = self.sink();
        let mut block = test_block(n, vec![]);
        block.header.parents_by_level = vec![vec![parent]];
        self.blocks.lock().insert(h(n), block);
        *self.sink.lock() = h(n);
    }

    pub fn insert_block(&self, block: RpcBlock) {
        self.blocks.lock().insert(block.hash(), block);
    }

    pub fn set_unreachable(&self, value: bool) {
        self.unreachable.store(value, Ordering::SeqCst);
    }

    pub fn set_malformed(&self, value: bool) {
        self.malformed.store(value, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock() = delay;
    }

    pub fn set_utxos(&self, address: &Address, entries: Vec<RpcUtxosByAddressesEntry>) {
        self.utxos.lock().insert(address.to_string(), entries);
    }

    pub fn utxo_calls(&self) -> usize {
        self.utxo_calls.load(Ordering::SeqCst)
    }

    async fn gate(&self) -> RpcResult<()> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(RpcError::Connection("connection refused".into()));
        }
        if self.malformed.load(Ordering::SeqCst) {
            return Err(RpcError::Protocol("unexpected response shape".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RpcApi for MockNode {
    async fn get_server_info(&self) -> RpcResult<RpcServerInfo> {
        self.gate().await?;
        Ok(RpcServerInfo {
            server_version: "0.15.0".into(),
            network_id: "testnet-12".into(),
            is_synced: true,
            has_utxo_index: true,
            virtual_daa_score: self.blocks.lock().len() as u64,
        })
    }

    async fn get_block_dag_info(&self) -> RpcResult<RpcBlockDagInfo> {
        self.gate().await?;
        let count = self.blocks.lock().len() as u64;
        let sink = self.sink();
        Ok(RpcBlockDagInfo {
            network: "testnet-12".into(),
            block_count: count,
            header_count: count,
            tip_hashes: vec![sink],
            difficulty: 1.0,
            past_median_time: 0,
            virtual_parent_hashes: vec![sink],
            pruning_point_hash: h(1),
            virtual_daa_score: count,
            sink,
        })
    }

    async fn get_block(&self, hash: Hash, _include_transactions: bool) -> RpcResult<RpcBlock> {
        self.gate().await?;
        self.blocks
            .lock()
            .get(&hash)
            .cloned()
            .ok_or_else(|| RpcError::Rpc(format!("block {} not found", hash)))
    }

    async fn get_mempool_entries(&self, _include_orphan_pool: bool, _filter: bool) -> RpcResult<Vec<RpcMempoolEntry>> {
        self.gate().await?;
        Ok(vec![mempool_entry(1, 10), mempool_entry(2, 30)])
    }

    async fn get_utxos_by_addresses(&self, addresses: Vec<Address>) -> RpcResult<Vec<RpcUtxosByAddressesEntry>> {
        self.utxo_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        let utxos = self.utxos.lock();
        Ok(addresses
            .iter()
            .flat_map(|a| utxos.get(&a.to_string()).cloned().unwrap_or_default())
            .collect())
    }

    async fn get_connected_peer_info(&self) -> RpcResult<Vec<RpcPeerInfo>> {
        self.gate().await?;
        Ok(vec![RpcPeerInfo {
            id: "peer-1".into(),
            address: "10.0.0.2:16311".into(),
            last_ping_duration: 12,
            is_outbound: true,
            time_offset: 0,
            user_agent: "/kaspad:0.15.0/".into(),
            advertised_protocol_version: 7,
            time_connected: 1_700_000_000_000,
            is_ibd_peer: false,
        }])
    }
}
