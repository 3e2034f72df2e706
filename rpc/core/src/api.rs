//! RPC API trait definitions

use std::collections::HashSet;

use async_trait::async_trait;
use kaspa_addresses::Address;
use kaspa_hashes::Hash;

use crate::model::*;

/// Read-only node queries the explorer relies on.
///
/// Implementors supply the raw node calls; the walking and fallback logic in
/// the provided methods is shared by every transport.
#[async_trait]
pub trait RpcApi: Send + Sync {
    async fn get_server_info(&self) -> RpcResult<RpcServerInfo>;
    async fn get_block_dag_info(&self) -> RpcResult<RpcBlockDagInfo>;
    async fn get_block(&self, hash: Hash, include_transactions: bool) -> RpcResult<RpcBlock>;
    async fn get_mempool_entries(
        &self,
        include_orphan_pool: bool,
        filter_transaction_pool: bool,
    ) -> RpcResult<Vec<RpcMempoolEntry>>;
    async fn get_utxos_by_addresses(&self, addresses: Vec<Address>) -> RpcResult<Vec<RpcUtxosByAddressesEntry>>;
    async fn get_connected_peer_info(&self) -> RpcResult<Vec<RpcPeerInfo>>;

    /// Walks back from `start` along selected parents, returning at most `limit` blocks
    /// newest first. Stops early at a block without parents.
    async fn get_blocks_from(&self, start: Hash, limit: usize) -> RpcResult<Vec<RpcBlock>> {
        let mut blocks = Vec::with_capacity(limit);
        let mut visited = HashSet::with_capacity(limit);
        let mut current = start;

        while blocks.len() < limit && visited.insert(current) {
            let block = self.get_block(current, true).await?;
            let next = block.selected_parent();
            blocks.push(block);
            match next {
                Some(hash) => current = hash,
                None => break,
            }
        }

        Ok(blocks)
    }

    async fn get_latest_blocks(&self, limit: usize) -> RpcResult<Vec<RpcBlock>> {
        let dag = self.get_block_dag_info().await?;
        self.get_blocks_from(dag.sink, limit).await
    }

    /// Mempool including orphans; nodes that refuse that combination get a second
    /// request without the orphan pool.
    async fn get_mempool(&self) -> RpcResult<Vec<RpcMempoolEntry>> {
        match self.get_mempool_entries(true, false).await {
            Ok(entries) => Ok(entries),
            Err(RpcError::Rpc(message)) => {
                tracing::debug!("mempool with orphans rejected ({}), retrying without", message);
                self.get_mempool_entries(false, false).await
            }
            Err(e) => Err(e),
        }
    }

    async fn get_utxos(&self, address: &Address) -> RpcResult<Vec<RpcUtxosByAddressesEntry>> {
        self.get_utxos_by_addresses(vec![address.clone()]).await
    }

    async fn get_peers(&self) -> RpcResult<Vec<RpcPeerInfo>> {
        self.get_connected_peer_info().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn h(n: u64) -> Hash {
        Hash::from_u64_word(n)
    }

    fn block(n: u64, parents: Vec<u64>) -> RpcBlock {
        RpcBlock {
            header: RpcBlockHeader {
                hash: h(n),
                version: 1,
                parents_by_level: vec![parents.into_iter().map(h).collect()],
                timestamp: n * 1000,
                bits: 0,
                nonce: 0,
                daa_score: n,
                blue_score: n,
            },
            transactions: vec![],
            verbose_data: None,
        }
    }

    struct ChainNode {
        blocks: HashMap<Hash, RpcBlock>,
        sink: Hash,
        reject_orphans: bool,
        mempool_calls: AtomicUsize,
    }

    impl ChainNode {
        /// Linear chain 1 <- 2 <- ... <- n
        fn linear(n: u64) -> Self {
            let blocks = (1..=n)
                .map(|i| {
                    let parents = if i == 1 { vec![] } else { vec![i - 1] };
                    (h(i), block(i, parents))
                })
                .collect();
            Self { blocks, sink: h(n), reject_orphans: false, mempool_calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl RpcApi for ChainNode {
        async fn get_server_info(&self) -> RpcResult<RpcServerInfo> {
            Err(RpcError::Connection("unused".into()))
        }

        async fn get_block_dag_info(&self) -> RpcResult<RpcBlockDagInfo> {
            Ok(RpcBlockDagInfo {
                network: "testnet-12".into(),
                block_count: self.blocks.len() as u64,
                header_count: self.blocks.len() as u64,
                tip_hashes: vec![self.sink],
                difficulty: 1.0,
                past_median_time: 0,
                virtual_parent_hashes: vec![self.sink],
                pruning_point_hash: h(1),
                virtual_daa_score: 0,
                sink: self.sink,
            })
        }

        async fn get_block(&self, hash: Hash, _include_transactions: bool) -> RpcResult<RpcBlock> {
            self.blocks
                .get(&hash)
                .cloned()
                .ok_or_else(|| RpcError::Rpc(format!("block {} not found", hash)))
        }

        async fn get_mempool_entries(&self, include_orphan_pool: bool, _filter: bool) -> RpcResult<Vec<RpcMempoolEntry>> {
            self.mempool_calls.fetch_add(1, Ordering::SeqCst);
            if include_orphan_pool && self.reject_orphans {
                return Err(RpcError::Rpc("orphans not allowed".into()));
            }
            Ok(vec![])
        }

        async fn get_utxos_by_addresses(&self, _addresses: Vec<Address>) -> RpcResult<Vec<RpcUtxosByAddressesEntry>> {
            Ok(vec![])
        }

        async fn get_connected_peer_info(&self) -> RpcResult<Vec<RpcPeerInfo>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn latest_blocks_walk_back_from_sink() {
        let node = ChainNode::linear(30);
        let blocks = node.get_latest_blocks(20).await.unwrap();
        assert_eq!(blocks.len(), 20);
        assert_eq!(blocks[0].hash(), h(30));
        assert_eq!(blocks[19].hash(), h(11));
    }

    #[tokio::test]
    async fn walk_stops_at_genesis() {
        let node = ChainNode::linear(5);
        let blocks = node.get_latest_blocks(20).await.unwrap();
        let hashes: Vec<_> = blocks.iter().map(RpcBlock::hash).collect();
        assert_eq!(hashes, vec![h(5), h(4), h(3), h(2), h(1)]);
    }

    #[tokio::test]
    async fn walk_propagates_missing_block() {
        let mut node = ChainNode::linear(5);
        node.blocks.remove(&h(3));
        let err = node.get_latest_blocks(20).await.unwrap_err();
        assert!(matches!(err, RpcError::Rpc(ref m) if m.contains("not found")));
    }

    #[tokio::test]
    async fn walk_does_not_loop_on_cycles() {
        let mut node = ChainNode::linear(3);
        node.blocks.insert(h(1), block(1, vec![3]));
        let blocks = node.get_latest_blocks(20).await.unwrap();
        assert_eq!(blocks.len(), 3);
    }

    #[tokio::test]
    async fn mempool_retries_without_orphans() {
        let mut node = ChainNode::linear(1);
        node.reject_orphans = true;
        assert!(node.get_mempool().await.unwrap().is_empty());
        assert_eq!(node.mempool_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn mempool_single_call_when_accepted() {
        let node = ChainNode::linear(1);
        node.get_mempool().await.unwrap();
        assert_eq!(node.mempool_calls.load(Ordering::SeqCst), 1);
    }
}
