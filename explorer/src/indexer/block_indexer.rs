//! Block conversion

use rpc_core::RpcBlock;

use crate::indexer::transaction_indexer;
use crate::models::{BlockDetail, BlockSummary, InclusionStatus};

pub fn summarize(block: &RpcBlock) -> BlockSummary {
    BlockSummary {
        hash: block.hash(),
        level: block.header.daa_score,
        blue_score: block.header.blue_score,
        parents: block.parent_hashes(),
        selected_parent: block.selected_parent(),
        tx_count: block.tx_count(),
        timestamp: block.header.timestamp,
        difficulty: block.difficulty(),
    }
}

pub fn detail(block: &RpcBlock) -> BlockDetail {
    BlockDetail {
        summary: summarize(block),
        transaction_ids: block.transaction_ids(),
        transactions: block
            .transactions
            .iter()
            .map(|tx| transaction_indexer::describe(tx, InclusionStatus::Confirmed, None))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaspa_hashes::Hash;
    use rpc_core::*;

    fn h(n: u64) -> Hash {
        Hash::from_u64_word(n)
    }

    fn coinbase(id: u64, value: u64) -> RpcTransaction {
        RpcTransaction {
            version: 0,
            inputs: vec![],
            outputs: vec![RpcTransactionOutput {
                value,
                script_public_key: RpcScriptPublicKey { version: 0, script: "20aa".into() },
            }],
            lock_time: 0,
            verbose_data: Some(RpcTransactionVerboseData {
                transaction_id: h(id),
                hash: h(id),
                block_hash: None,
                block_time: 0,
            }),
        }
    }

    #[test]
    fn detail_carries_confirmed_transactions() {
        let block = RpcBlock {
            header: RpcBlockHeader {
                hash: h(50),
                version: 1,
                parents_by_level: vec![vec![h(49), h(48), h(49)]],
                timestamp: 1_000,
                bits: 0x1e7fffff,
                nonce: 0,
                daa_score: 77,
                blue_score: 70,
            },
            transactions: vec![coinbase(900, 5_000)],
            verbose_data: Some(RpcBlockVerboseData {
                hash: h(50),
                difficulty: 2.5,
                selected_parent_hash: h(48),
                transaction_ids: vec![h(900)],
                is_chain_block: true,
                children_hashes: vec![],
            }),
        };

        let detail = detail(&block);
        assert_eq!(detail.summary.level, 77);
        assert_eq!(detail.summary.parents, vec![h(49), h(48)]);
        assert_eq!(detail.summary.selected_parent, Some(h(48)));
        assert_eq!(detail.summary.tx_count, 1);
        assert_eq!(detail.summary.difficulty, 2.5);
        assert_eq!(detail.transaction_ids, vec![h(900)]);
        assert_eq!(detail.transactions[0].status, InclusionStatus::Confirmed);
        assert_eq!(detail.transactions[0].amount, 5_000);
        assert_eq!(detail.transactions[0].fee, None);
    }
}
