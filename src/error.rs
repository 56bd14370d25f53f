use alloy_primitives::Address;
use alloy_primitives::I256;
use thiserror::Error;

use crate::core::avax::bech32::Bech32Error;
use crate::core::avax::codec::CodecError;
use crate::core::client::ClientError;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Contract info lookup failed: {0}")]
    ContractInfo(#[from] ClientError),
    /// A self-destructed account paid out more than it received before liquidation.
    #[error("Negative balance for destroyed account {address}: {balance}")]
    NegativeDestroyedBalance { address: Address, balance: I256 },
    #[error("Amount out of range ({0})")]
    AmountOverflow(String),
    #[error("Failed decoding atomic transactions: {0}")]
    Codec(#[from] CodecError),
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),
    #[error("Failed formatting exported output address: {0}")]
    AddressFormat(#[from] Bech32Error),
    #[error("Failed serializing transaction metadata: {0}")]
    Serialization(#[from] serde_json::Error),
}
