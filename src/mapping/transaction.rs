use serde_json::json;

use super::amounts::token_currency;
use super::fees::fee_operations;
use super::index::OperationCounter;
use super::tokens;
use super::tokens::TokenStandard;
use super::trace::trace_operations;
use super::Mapper;
use crate::constants::metadata;
use crate::core::client::ContractInfoSource;
use crate::core::evm::Log;
use crate::core::evm::TransactionData;
use crate::core::types::Metadata;
use crate::core::types::Operation;
use crate::core::types::Transaction;
use crate::core::types::TransactionIdentifier;
use crate::error::MapperError;

/// Fee, then internal call, then token operations, indexed from 0.
pub(super) fn assemble<C: ContractInfoSource>(
    mapper: &Mapper<C>,
    data: &TransactionData,
) -> Result<Transaction, MapperError> {
    let mut counter = OperationCounter::new();
    let mut operations = fee_operations(
        &data.message.from,
        &data.header.coinbase,
        data.receipt.gas_used,
        data.message.gas_price,
        &mut counter,
    )?;
    operations.extend(trace_operations(&data.trace.flatten(), &mut counter)?);
    for log in &data.receipt.logs {
        operations.extend(token_operations(mapper, log, &mut counter)?);
    }
    tracing::debug!("mapped {} operation(s)", operations.len());

    Ok(Transaction {
        transaction_identifier: TransactionIdentifier::new(&data.transaction.hash.to_string()),
        operations,
        metadata: transaction_metadata(data)?,
    })
}

/// Operations of a token transfer log, empty for other or untracked logs.
fn token_operations<C: ContractInfoSource>(
    mapper: &Mapper<C>,
    log: &Log,
    counter: &mut OperationCounter,
) -> Result<Vec<Operation>, MapperError> {
    let Some(standard) = tokens::classify(log) else {
        return Ok(vec![]);
    };
    if !mapper.is_tracked(&log.address) {
        return Ok(vec![]);
    }
    let info = mapper
        .client
        .contract_info(log.address, standard == TokenStandard::Erc20)?;
    if info.is_unknown() && !mapper.config.include_unknown_tokens {
        tracing::debug!("skipping transfer of unknown token {}", log.address);
        return Ok(vec![]);
    }
    match standard {
        TokenStandard::Erc20 => {
            Ok(tokens::erc20_operations(log, &token_currency(&info, &log.address), counter))
        }
        TokenStandard::Erc721 => Ok(tokens::erc721_operations(log, counter)),
    }
}

fn transaction_metadata(data: &TransactionData) -> Result<Metadata, MapperError> {
    let mut meta = Metadata::new();
    meta.insert(metadata::GAS.to_owned(), json!(data.transaction.gas));
    meta.insert(metadata::GAS_USED.to_owned(), json!(data.receipt.gas_used));
    meta.insert(
        metadata::GAS_PRICE.to_owned(),
        json!(data.transaction.gas_price.to_string()),
    );
    meta.insert(
        metadata::RECEIPT.to_owned(),
        serde_json::to_value(&data.receipt)?,
    );
    meta.insert(metadata::TRACE.to_owned(), serde_json::to_value(&data.trace)?);
    meta.insert(metadata::TYPE.to_owned(), json!(data.transaction.tx_type));
    Ok(meta)
}
