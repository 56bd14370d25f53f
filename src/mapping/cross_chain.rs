//! Atomic transactions moving AVAX in and out of the C-chain.
//!
//! Imports credit C-chain accounts from UTXOs of another chain, exports
//! debit C-chain accounts and create UTXOs on the destination chain. The
//! difference between what goes in and what comes out is the fee.
use itertools::Itertools;
use serde_json::json;
use serde_json::Value;

use super::amounts::account;
use super::amounts::atomic_avax_amount;
use super::amounts::atomic_to_wei;
use super::amounts::avax_amount;
use super::index::OperationCounter;
use crate::config::MapperConfig;
use crate::constants::metadata;
use crate::core::avax::atomic::AtomicTx;
use crate::core::avax::atomic::UnsignedAtomicTx;
use crate::core::avax::atomic::UnsignedExportTx;
use crate::core::avax::atomic::UnsignedImportTx;
use crate::core::avax::bech32;
use crate::core::avax::ids::Id;
use crate::core::avax::ids::UtxoId;
use crate::core::types::AccountIdentifier;
use crate::core::types::CoinChange;
use crate::core::types::Metadata;
use crate::core::types::Operation;
use crate::core::types::OperationType;
use crate::core::types::Transaction;
use crate::core::types::TransactionIdentifier;
use crate::error::MapperError;

/// Operations of an atomic tx along with its in and out totals.
struct Decomposition {
    operations: Vec<Operation>,
    exported_outputs: Vec<Operation>,
    total_in: u128,
    total_out: u128,
}

/// Maps an atomic transaction, indexing its operations from 0.
pub(super) fn map_atomic_tx(config: &MapperConfig, tx: &AtomicTx) -> Result<Transaction, MapperError> {
    let tx_id = tx.id();
    let meta = format!("0x{}", base16::encode_lower(&tx.unsigned_bytes()));
    let mut counter = OperationCounter::new();
    let decomposition = match &tx.unsigned {
        UnsignedAtomicTx::Import(import) => {
            import_operations(config, &tx_id, &meta, import, &mut counter)
        }
        UnsignedAtomicTx::Export(export) => {
            export_operations(config, &tx_id, &meta, export, &mut counter)?
        }
    };

    let fee = decomposition.total_in as i128 - decomposition.total_out as i128;
    if fee < 0 {
        tracing::warn!("atomic tx {tx_id} has a negative fee of {fee}");
    }
    let mut tx_meta = Metadata::new();
    tx_meta.insert(
        metadata::TX_FEE.to_owned(),
        serde_json::to_value(atomic_avax_amount(fee))?,
    );
    if !decomposition.exported_outputs.is_empty() {
        tx_meta.insert(
            metadata::EXPORTED_OUTPUTS.to_owned(),
            serde_json::to_value(&decomposition.exported_outputs)?,
        );
    }

    Ok(Transaction {
        transaction_identifier: TransactionIdentifier::new(&tx_id.to_string()),
        operations: decomposition.operations,
        metadata: tx_meta,
    })
}

fn import_operations(
    config: &MapperConfig,
    tx_id: &Id,
    meta: &str,
    import: &UnsignedImportTx,
    counter: &mut OperationCounter,
) -> Decomposition {
    let source_tx_ids: Vec<String> = import
        .imported_inputs
        .iter()
        .map(|input| input.utxo_id.tx_id)
        .unique()
        .sorted()
        .map(|id| id.to_string())
        .collect();
    let total_in: u128 = import
        .imported_inputs
        .iter()
        .filter(|input| input.asset_id == config.avax_asset_id)
        .map(|input| input.amount as u128)
        .sum();

    let mut total_out = 0;
    let mut operations = vec![];
    for out in &import.outs {
        if out.asset_id != config.avax_asset_id {
            continue;
        }
        total_out += out.amount as u128;
        let mut op_meta = Metadata::new();
        op_meta.insert(metadata::TX.to_owned(), json!(tx_id.to_string()));
        op_meta.insert(metadata::TX_IDS.to_owned(), json!(source_tx_ids));
        op_meta.insert(
            metadata::BLOCKCHAIN_ID.to_owned(),
            json!(import.blockchain_id.to_string()),
        );
        op_meta.insert(metadata::NETWORK_ID.to_owned(), json!(import.network_id));
        op_meta.insert(
            metadata::SOURCE_CHAIN.to_owned(),
            json!(import.source_chain.to_string()),
        );
        op_meta.insert(metadata::META.to_owned(), json!(meta));
        op_meta.insert(
            metadata::ASSET_ID.to_owned(),
            json!(out.asset_id.to_string()),
        );
        operations.push(
            Operation::new(counter.claim(), OperationType::Import, account(&out.address))
                .amount(Some(avax_amount(atomic_to_wei(out.amount), false)))
                .metadata(op_meta),
        );
    }

    Decomposition {
        operations,
        exported_outputs: vec![],
        total_in,
        total_out,
    }
}

fn export_operations(
    config: &MapperConfig,
    tx_id: &Id,
    meta: &str,
    export: &UnsignedExportTx,
    counter: &mut OperationCounter,
) -> Result<Decomposition, MapperError> {
    let mut total_in = 0;
    let mut operations = vec![];
    for input in &export.ins {
        if input.asset_id != config.avax_asset_id {
            continue;
        }
        total_in += input.amount as u128;
        let mut op_meta = Metadata::new();
        op_meta.insert(metadata::TX.to_owned(), json!(tx_id.to_string()));
        op_meta.insert(
            metadata::BLOCKCHAIN_ID.to_owned(),
            json!(export.blockchain_id.to_string()),
        );
        op_meta.insert(metadata::NETWORK_ID.to_owned(), json!(export.network_id));
        op_meta.insert(
            metadata::DESTINATION_CHAIN.to_owned(),
            json!(export.destination_chain.to_string()),
        );
        op_meta.insert(metadata::META.to_owned(), json!(meta));
        op_meta.insert(
            metadata::ASSET_ID.to_owned(),
            json!(input.asset_id.to_string()),
        );
        operations.push(
            Operation::new(counter.claim(), OperationType::Export, account(&input.address))
                .amount(Some(avax_amount(atomic_to_wei(input.amount), true)))
                .metadata(op_meta),
        );
    }

    let mut total_out = 0;
    let mut exported_outputs = vec![];
    let alias = config.chain_aliases.get(&export.destination_chain);
    match (export.exported_outputs.is_empty(), alias) {
        (true, _) => (),
        (false, None) => tracing::warn!(
            "no alias for destination chain {}, skipping exported outputs of {tx_id}",
            export.destination_chain
        ),
        (false, Some(alias)) => {
            let hrp = config.network.hrp()?;
            for (index, out) in export.exported_outputs.iter().enumerate() {
                if out.asset_id != config.avax_asset_id {
                    continue;
                }
                total_out += out.amount as u128;
                // Ownerless outputs keep an empty address
                let address = match out.addrs.first() {
                    Some(owner) => bech32::format_address(&alias.to_string(), hrp, owner.as_bytes())?,
                    None => String::new(),
                };
                let utxo_id = UtxoId::new(*tx_id, index as u32);
                let mut op_meta = Metadata::new();
                op_meta.insert(
                    metadata::ASSET_ID.to_owned(),
                    Value::String(out.asset_id.to_string()),
                );
                let account = AccountIdentifier { address };
                exported_outputs.push(
                    Operation::new(counter.claim(), OperationType::Export, account)
                        .amount(Some(atomic_avax_amount(out.amount as i128)))
                        .coin_change(CoinChange::created(utxo_id.to_string()))
                        .metadata(op_meta),
                );
            }
        }
    }

    Ok(Decomposition {
        operations,
        exported_outputs,
        total_in,
        total_out,
    })
}
