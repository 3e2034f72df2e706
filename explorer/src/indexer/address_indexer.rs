//! Address balance assembly from live UTXO queries

use chrono::{DateTime, Utc};
use kaspa_addresses::Address;
use rpc_core::RpcUtxosByAddressesEntry;

use crate::models::{AddressBalance, UtxoInfo, UtxoStatus};

/// Builds the balance response. Every returned UTXO counts toward the balance,
/// so `balance` always equals the sum of the listed amounts.
///
/// UTXOs from blocks newer than `virtual_daa_score` are reported as pending;
/// without a reference score everything is treated as confirmed.
pub fn address_balance(
    address: &Address,
    entries: Vec<RpcUtxosByAddressesEntry>,
    virtual_daa_score: Option<u64>,
    fetched_at: DateTime<Utc>,
) -> AddressBalance {
    let reference = virtual_daa_score.unwrap_or(u64::MAX);

    let mut utxos: Vec<UtxoInfo> = entries
        .into_iter()
        .map(|entry| {
            let status = if entry.utxo_entry.block_daa_score > reference {
                UtxoStatus::Pending
            } else {
                UtxoStatus::Confirmed
            };
            UtxoInfo {
                outpoint: format!("{}:{}", entry.outpoint.transaction_id, entry.outpoint.index),
                transaction_id: entry.outpoint.transaction_id,
                index: entry.outpoint.index,
                amount: entry.utxo_entry.amount,
                script_public_key: entry.utxo_entry.script_public_key.script,
                block_daa_score: entry.utxo_entry.block_daa_score,
                is_coinbase: entry.utxo_entry.is_coinbase,
                status,
            }
        })
        .collect();

    utxos.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.transaction_id.cmp(&b.transaction_id))
            .then_with(|| a.index.cmp(&b.index))
    });

    let balance = utxos.iter().map(|u| u.amount).sum();

    AddressBalance {
        address: address.to_string(),
        balance,
        utxo_count: utxos.len(),
        utxos,
        fetched_at,
    }
}
