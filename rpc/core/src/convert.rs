//! Conversions from the kaspad RPC types returned by the gRPC client.

use kaspa_hashes::Hash;
use kaspa_rpc_core as node;

use crate::model::*;

impl From<node::GetServerInfoResponse> for RpcServerInfo {
    fn from(info: node::GetServerInfoResponse) -> Self {
        Self {
            server_version: info.server_version,
            network_id: info.network_id.to_string(),
            is_synced: info.is_synced,
            has_utxo_index: info.has_utxo_index,
            virtual_daa_score: info.virtual_daa_score,
        }
    }
}

impl From<node::GetBlockDagInfoResponse> for RpcBlockDagInfo {
    fn from(info: node::GetBlockDagInfoResponse) -> Self {
        Self {
            network: info.network.to_string(),
            block_count: info.block_count,
            header_count: info.header_count,
            tip_hashes: info.tip_hashes,
            difficulty: info.difficulty,
            past_median_time: info.past_median_time,
            virtual_parent_hashes: info.virtual_parent_hashes,
            pruning_point_hash: info.pruning_point_hash,
            virtual_daa_score: info.virtual_daa_score,
            sink: info.sink,
        }
    }
}

impl From<node::RpcBlock> for RpcBlock {
    fn from(block: node::RpcBlock) -> Self {
        let header = block.header;
        Self {
            header: RpcBlockHeader {
                hash: header.hash,
                version: header.version,
                parents_by_level: header.parents_by_level,
                timestamp: header.timestamp,
                bits: header.bits,
                nonce: header.nonce,
                daa_score: header.daa_score,
                blue_score: header.blue_score,
            },
            transactions: block.transactions.into_iter().map(RpcTransaction::from).collect(),
            verbose_data: block.verbose_data.map(|v| RpcBlockVerboseData {
                hash: v.hash,
                difficulty: v.difficulty,
                selected_parent_hash: v.selected_parent_hash,
                transaction_ids: v.transaction_ids,
                is_chain_block: v.is_chain_block,
                children_hashes: v.children_hashes,
            }),
        }
    }
}

fn outpoint(outpoint: node::RpcTransactionOutpoint) -> RpcOutpoint {
    RpcOutpoint { transaction_id: outpoint.transaction_id, index: outpoint.index }
}

fn script_public_key(spk: &node::RpcScriptPublicKey) -> RpcScriptPublicKey {
    RpcScriptPublicKey { version: spk.version(), script: hex::encode(spk.script()) }
}

impl From<node::RpcTransaction> for RpcTransaction {
    fn from(tx: node::RpcTransaction) -> Self {
        Self {
            version: tx.version,
            inputs: tx
                .inputs
                .into_iter()
                .map(|input| RpcTransactionInput {
                    previous_outpoint: outpoint(input.previous_outpoint),
                    signature_script: hex::encode(&input.signature_script),
                    sequence: input.sequence,
                })
                .collect(),
            outputs: tx
                .outputs
                .iter()
                .map(|output| RpcTransactionOutput {
                    value: output.value,
                    script_public_key: script_public_key(&output.script_public_key),
                })
                .collect(),
            lock_time: tx.lock_time,
            verbose_data: tx.verbose_data.map(|v| RpcTransactionVerboseData {
                transaction_id: v.transaction_id,
                hash: v.hash,
                // zero until the transaction is in a block
                block_hash: Some(v.block_hash).filter(|h| *h != Hash::default()),
                block_time: v.block_time,
            }),
        }
    }
}

impl From<node::RpcMempoolEntry> for RpcMempoolEntry {
    fn from(entry: node::RpcMempoolEntry) -> Self {
        Self { fee: entry.fee, transaction: entry.transaction.into(), is_orphan: entry.is_orphan }
    }
}

impl From<node::RpcUtxosByAddressesEntry> for RpcUtxosByAddressesEntry {
    fn from(entry: node::RpcUtxosByAddressesEntry) -> Self {
        Self {
            address: entry.address.map(|a| a.to_string()),
            outpoint: outpoint(entry.outpoint),
            utxo_entry: RpcUtxoEntry {
                amount: entry.utxo_entry.amount,
                script_public_key: script_public_key(&entry.utxo_entry.script_public_key),
                block_daa_score: entry.utxo_entry.block_daa_score,
                is_coinbase: entry.utxo_entry.is_coinbase,
            },
        }
    }
}

impl From<node::RpcPeerInfo> for RpcPeerInfo {
    fn from(peer: node::RpcPeerInfo) -> Self {
        Self {
            id: peer.id.to_string(),
            address: peer.address.to_string(),
            last_ping_duration: peer.last_ping_duration,
            is_outbound: peer.is_outbound,
            time_offset: peer.time_offset,
            user_agent: peer.user_agent,
            advertised_protocol_version: peer.advertised_protocol_version,
            time_connected: peer.time_connected,
            is_ibd_peer: peer.is_ibd_peer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaspa_addresses::{Address, Prefix, Version};

    fn h(n: u64) -> Hash {
        Hash::from_u64_word(n)
    }

    #[test]
    fn dag_info_keeps_sink_and_network() {
        let info = node::GetBlockDagInfoResponse {
            network: "testnet-10".parse().unwrap(),
            block_count: 1_234,
            header_count: 1_240,
            tip_hashes: vec![h(9), h(8)],
            difficulty: 3.5,
            past_median_time: 1_700_000_000_000,
            virtual_parent_hashes: vec![h(9)],
            pruning_point_hash: h(1),
            virtual_daa_score: 5_000,
            sink: h(9),
        };

        let converted = RpcBlockDagInfo::from(info);
        assert_eq!(converted.network, "testnet-10");
        assert_eq!(converted.block_count, 1_234);
        assert_eq!(converted.sink, h(9));
        assert_eq!(converted.tip_hashes, vec![h(9), h(8)]);
        assert_eq!(converted.virtual_daa_score, 5_000);
    }

    #[test]
    fn utxo_entry_hex_encodes_script() {
        let address = Address::new(Prefix::Testnet, Version::PubKey, &[4u8; 32]);
        let entry = node::RpcUtxosByAddressesEntry {
            address: Some(address.clone()),
            outpoint: node::RpcTransactionOutpoint { transaction_id: h(77), index: 2 },
            utxo_entry: node::RpcUtxoEntry {
                amount: 150_000_000,
                script_public_key: node::RpcScriptPublicKey::from_vec(0, vec![0x20, 0xab, 0xac]),
                block_daa_score: 4_321,
                is_coinbase: true,
            },
        };

        let converted = RpcUtxosByAddressesEntry::from(entry);
        assert_eq!(converted.address, Some(address.to_string()));
        assert_eq!(converted.outpoint, RpcOutpoint { transaction_id: h(77), index: 2 });
        assert_eq!(converted.utxo_entry.amount, 150_000_000);
        assert_eq!(converted.utxo_entry.script_public_key.script, "20abac");
        assert_eq!(converted.utxo_entry.block_daa_score, 4_321);
        assert!(converted.utxo_entry.is_coinbase);
    }
}
