pub mod amounts;
mod cross_chain;
mod fees;
pub mod index;
pub mod mempool;
mod tokens;
pub mod trace;
mod transaction;

use std::collections::HashSet;

use alloy_primitives::Address;

use crate::config::MapperConfig;
use crate::core::avax::codec;
use crate::core::client::ContractInfoSource;
use crate::core::evm::BlockData;
use crate::core::evm::TransactionData;
use crate::core::types::Transaction;
use crate::error::MapperError;

pub use mempool::mempool_transaction_ids;
pub use mempool::TxAccountMap;

/// Maps transactions to Rosetta operations.
///
/// Holds no per-transaction state, a single instance can serve any number
/// of (concurrent) requests.
pub struct Mapper<C> {
    config: MapperConfig,
    /// Lowercase hex of allow-listed token contracts
    allow_list: HashSet<String>,
    client: C,
}

impl<C: ContractInfoSource> Mapper<C> {
    pub fn new(config: MapperConfig, client: C) -> Self {
        let allow_list = config
            .standard_mode_allow_list
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        Self {
            config,
            allow_list,
            client,
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Maps an ordinary transaction: fee, internal calls and token transfers.
    #[tracing::instrument(skip_all, fields(tx = %data.transaction.hash))]
    pub fn map_transaction(&self, data: &TransactionData) -> Result<Transaction, MapperError> {
        transaction::assemble(self, data)
    }

    /// Maps the atomic transactions carried in a block's extra data.
    #[tracing::instrument(skip_all, fields(block = block.header.number))]
    pub fn map_cross_chain_transactions(
        &self,
        block: &BlockData,
    ) -> Result<Vec<Transaction>, MapperError> {
        if block.ext_data.is_empty() {
            return Ok(vec![]);
        }
        let batch = block.header.timestamp >= self.config.ap5_activation;
        let txs = codec::extract_atomic_txs(&block.ext_data, batch)?;
        tracing::debug!("found {} atomic transaction(s)", txs.len());
        txs.iter()
            .map(|tx| cross_chain::map_atomic_tx(&self.config, tx))
            .collect()
    }

    /// True if token transfers emitted by `contract` are to be processed.
    fn is_tracked(&self, contract: &Address) -> bool {
        self.config.analytics_mode
            || self
                .allow_list
                .contains(&contract.to_checksum(None).to_lowercase())
    }
}
