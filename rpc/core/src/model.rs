//! RPC data models and types
//!
//! Trimmed mirrors of the kaspad RPC responses the explorer reads. They keep the
//! node's camelCase field names when serialized, and optional fields default.

use std::collections::HashSet;
use std::time::Duration;

use kaspa_hashes::Hash;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RPC error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RpcError {
    /// The node could not be reached or the connection dropped mid-call.
    #[error("connection error: {0}")]
    Connection(String),

    /// The node answered with something inconsistent with the request.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The node rejected the request.
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl RpcError {
    /// True when the node itself is unreachable, as opposed to answering badly.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, RpcError::Connection(_) | RpcError::Timeout(_))
    }
}

pub type RpcResult<T> = std::result::Result<T, RpcError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcServerInfo {
    pub server_version: String,
    pub network_id: String,
    #[serde(default)]
    pub is_synced: bool,
    #[serde(default)]
    pub has_utxo_index: bool,
    #[serde(default)]
    pub virtual_daa_score: u64,
}

/// Block DAG information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlockDagInfo {
    pub network: String,
    pub block_count: u64,
    #[serde(default)]
    pub header_count: u64,
    #[serde(default)]
    pub tip_hashes: Vec<Hash>,
    #[serde(default)]
    pub difficulty: f64,
    #[serde(default)]
    pub past_median_time: u64,
    #[serde(default)]
    pub virtual_parent_hashes: Vec<Hash>,
    #[serde(default)]
    pub pruning_point_hash: Hash,
    #[serde(default)]
    pub virtual_daa_score: u64,
    pub sink: Hash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlockHeader {
    pub hash: Hash,
    #[serde(default)]
    pub version: u16,
    #[serde(default)]
    pub parents_by_level: Vec<Vec<Hash>>,
    pub timestamp: u64,
    #[serde(default)]
    pub bits: u32,
    #[serde(default)]
    pub nonce: u64,
    #[serde(default)]
    pub daa_score: u64,
    #[serde(default)]
    pub blue_score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlockVerboseData {
    pub hash: Hash,
    #[serde(default)]
    pub difficulty: f64,
    #[serde(default)]
    pub selected_parent_hash: Hash,
    #[serde(default)]
    pub transaction_ids: Vec<Hash>,
    #[serde(default)]
    pub is_chain_block: bool,
    #[serde(default)]
    pub children_hashes: Vec<Hash>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    pub header: RpcBlockHeader,
    #[serde(default)]
    pub transactions: Vec<RpcTransaction>,
    #[serde(default)]
    pub verbose_data: Option<RpcBlockVerboseData>,
}

impl RpcBlock {
    pub fn hash(&self) -> Hash {
        self.header.hash
    }

    /// Level-0 parents with duplicates removed, in the order the node sent them.
    pub fn parent_hashes(&self) -> Vec<Hash> {
        let mut seen = HashSet::new();
        self.header
            .parents_by_level
            .first()
            .into_iter()
            .flat_map(|level0| level0.iter())
            .copied()
            .filter(|h| seen.insert(*h))
            .collect()
    }

    /// The verbose selected parent when the node supplied a non-zero one,
    /// otherwise the first direct parent.
    pub fn selected_parent(&self) -> Option<Hash> {
        self.verbose_data
            .as_ref()
            .map(|v| v.selected_parent_hash)
            .filter(|h| *h != Hash::default())
            .or_else(|| self.parent_hashes().first().copied())
    }

    /// Transaction ids, preferring the verbose list since transactions may be omitted.
    pub fn transaction_ids(&self) -> Vec<Hash> {
        match &self.verbose_data {
            Some(v) if !v.transaction_ids.is_empty() => v.transaction_ids.clone(),
            _ => self.transactions.iter().filter_map(RpcTransaction::id).collect(),
        }
    }

    pub fn tx_count(&self) -> usize {
        self.verbose_data
            .as_ref()
            .map(|v| v.transaction_ids.len())
            .filter(|&n| n > 0)
            .unwrap_or(self.transactions.len())
    }

    /// Falls back to the compact `bits` value when verbose data is missing.
    pub fn difficulty(&self) -> f64 {
        self.verbose_data
            .as_ref()
            .map(|v| v.difficulty)
            .unwrap_or(f64::from(self.header.bits))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcOutpoint {
    pub transaction_id: Hash,
    pub index: u32,
}

/// Script public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcScriptPublicKey {
    #[serde(default)]
    pub version: u16,
    /// Hex encoded script bytes.
    pub script: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransactionInput {
    pub previous_outpoint: RpcOutpoint,
    #[serde(default)]
    pub signature_script: String,
    #[serde(default)]
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransactionOutput {
    pub value: u64,
    pub script_public_key: RpcScriptPublicKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransactionVerboseData {
    #[serde(default)]
    pub transaction_id: Hash,
    #[serde(default)]
    pub hash: Hash,
    /// Containing block, when the node reports one.
    #[serde(default)]
    pub block_hash: Option<Hash>,
    #[serde(default)]
    pub block_time: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    #[serde(default)]
    pub version: u16,
    pub inputs: Vec<RpcTransactionInput>,
    pub outputs: Vec<RpcTransactionOutput>,
    #[serde(default)]
    pub lock_time: u64,
    #[serde(default)]
    pub verbose_data: Option<RpcTransactionVerboseData>,
}

impl RpcTransaction {
    /// The transaction id, or the transaction hash when the node left the id zeroed.
    pub fn id(&self) -> Option<Hash> {
        self.verbose_data.as_ref().map(|v| {
            if v.transaction_id == Hash::default() {
                v.hash
            } else {
                v.transaction_id
            }
        })
    }

    pub fn output_total(&self) -> u64 {
        self.outputs.iter().map(|o| o.value).sum()
    }
}

/// Mempool entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcMempoolEntry {
    pub fee: u64,
    pub transaction: RpcTransaction,
    #[serde(default)]
    pub is_orphan: bool,
}

/// UTXO entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcUtxoEntry {
    pub amount: u64,
    pub script_public_key: RpcScriptPublicKey,
    #[serde(default)]
    pub block_daa_score: u64,
    #[serde(default)]
    pub is_coinbase: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcUtxosByAddressesEntry {
    #[serde(default)]
    pub address: Option<String>,
    pub outpoint: RpcOutpoint,
    pub utxo_entry: RpcUtxoEntry,
}

/// Peer information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcPeerInfo {
    pub id: String,
    pub address: String,
    #[serde(default)]
    pub last_ping_duration: u64,
    #[serde(default)]
    pub is_outbound: bool,
    #[serde(default)]
    pub time_offset: i64,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub advertised_protocol_version: u32,
    #[serde(default)]
    pub time_connected: u64,
    #[serde(default)]
    pub is_ibd_peer: bool,
}
