//! Transaction and mempool conversion

use rpc_core::{RpcMempoolEntry, RpcTransaction};

use crate::cache::MempoolSnapshot;
use crate::models::{InclusionStatus, InputInfo, OutputInfo, TransactionInfo};

pub fn describe(tx: &RpcTransaction, status: InclusionStatus, fee: Option<u64>) -> TransactionInfo {
    TransactionInfo {
        id: tx.id(),
        inputs: tx
            .inputs
            .iter()
            .map(|input| InputInfo {
                previous_outpoint: format!(
                    "{}:{}",
                    input.previous_outpoint.transaction_id, input.previous_outpoint.index
                ),
            })
            .collect(),
        outputs: tx
            .outputs
            .iter()
            .map(|output| OutputInfo {
                amount: output.value,
                script_public_key: output.script_public_key.script.clone(),
            })
            .collect(),
        input_count: tx.inputs.len(),
        output_count: tx.outputs.len(),
        amount: tx.output_total(),
        fee,
        status,
    }
}

/// Keeps at most `retain` entries, highest fee first, ties broken by id so the
/// order does not depend on how the node happened to list them.
pub fn mempool_snapshot(entries: Vec<RpcMempoolEntry>, retain: usize) -> MempoolSnapshot {
    let size = entries.len();
    let mut transactions: Vec<TransactionInfo> = entries
        .iter()
        .map(|entry| describe(&entry.transaction, InclusionStatus::Mempool, Some(entry.fee)))
        .collect();

    transactions.sort_by(|a, b| b.fee.cmp(&a.fee).then_with(|| a.id.cmp(&b.id)));
    transactions.truncate(retain);

    MempoolSnapshot { size, transactions }
}
