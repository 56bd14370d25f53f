use std::collections::BTreeMap;

use crate::core::types::TransactionIdentifier;

/// Txpool inspection content: account -> nonce -> summary.
///
/// Nonces are quoted in node responses and keyed numerically here, so
/// transactions of an account come out in nonce order. Summaries start
/// with the transaction hash followed by a colon,
/// e.g. `0xabc...: 0 wei + 21000 gas × 25000000000 wei`.
pub type TxAccountMap = BTreeMap<String, BTreeMap<u64, String>>;

/// Identifiers of the transactions in a txpool content map.
pub fn mempool_transaction_ids(content: &TxAccountMap) -> Vec<TransactionIdentifier> {
    content
        .values()
        .flat_map(|nonces| nonces.values())
        .filter_map(|summary| summary.split(':').next())
        .map(|hash| TransactionIdentifier::new(hash.trim()))
        .collect()
}
