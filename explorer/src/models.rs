//! Data models for the explorer API

use chrono::{DateTime, Utc};
use kaspa_hashes::Hash;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub server_url: String,
    pub network: String,
    pub is_connected: bool,
    pub is_synced: Option<bool>,
    pub server_version: Option<String>,
    pub virtual_daa_score: Option<u64>,
    pub block_count: Option<u64>,
    pub snapshot_sequence: Option<u64>,
    pub last_refresh: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub hash: Hash,
    /// DAA score, shown as the block level.
    pub level: u64,
    pub blue_score: u64,
    pub parents: Vec<Hash>,
    pub selected_parent: Option<Hash>,
    pub tx_count: usize,
    /// Milliseconds since the unix epoch.
    pub timestamp: u64,
    pub difficulty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDetail {
    #[serde(flatten)]
    pub summary: BlockSummary,
    pub transaction_ids: Vec<Hash>,
    pub transactions: Vec<TransactionInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlocksResponse {
    pub total_count: u64,
    pub sequence: u64,
    pub fetched_at: DateTime<Utc>,
    pub blocks: Vec<BlockSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InclusionStatus {
    Mempool,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputInfo {
    pub previous_outpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputInfo {
    pub amount: u64,
    pub script_public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub id: Option<Hash>,
    pub inputs: Vec<InputInfo>,
    pub outputs: Vec<OutputInfo>,
    pub input_count: usize,
    pub output_count: usize,
    /// Sum of output amounts in sompi.
    pub amount: u64,
    /// Only known for mempool entries.
    pub fee: Option<u64>,
    pub status: InclusionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MempoolResponse {
    /// Full mempool size, not the number of transactions returned.
    pub size: usize,
    pub sequence: u64,
    pub fetched_at: DateTime<Utc>,
    pub transactions: Vec<TransactionInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtxoStatus {
    Confirmed,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoInfo {
    /// `<transaction id>:<index>`
    pub outpoint: String,
    pub transaction_id: Hash,
    pub index: u32,
    pub amount: u64,
    pub script_public_key: String,
    pub block_daa_score: u64,
    pub is_coinbase: bool,
    pub status: UtxoStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBalance {
    pub address: String,
    /// Always the sum of `utxos[].amount`.
    pub balance: u64,
    pub utxo_count: usize,
    pub utxos: Vec<UtxoInfo>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerSummary {
    pub id: String,
    pub address: String,
    pub is_connected: bool,
    pub is_outbound: bool,
    pub is_ibd_peer: bool,
    pub last_ping_ms: u64,
    pub user_agent: String,
    pub protocol_version: u32,
    pub time_connected: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeersResponse {
    pub sequence: u64,
    pub fetched_at: DateTime<Utc>,
    pub peers: Vec<PeerSummary>,
}

/// Pushed to live-feed clients after every published snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEvent {
    pub sequence: u64,
    pub fetched_at: DateTime<Utc>,
    pub block_count: u64,
    pub latest_block: Option<BlockSummary>,
    pub mempool_size: usize,
    pub peer_count: usize,
}
