//! Execution layer artifacts supplied by the node.
use alloy_primitives::Address;
use alloy_primitives::Bytes;
use alloy_primitives::B256;
use alloy_primitives::U256;
use serde::Deserialize;
use serde::Serialize;

use super::trace::Call;

pub type BlockNumber = u64;
pub type Timestamp = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub number: BlockNumber,
    /// Receiver of transaction fees.
    pub coinbase: Address,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmTransaction {
    pub hash: B256,
    /// Gas limit
    pub gas: u64,
    pub gas_price: U256,
    #[serde(rename = "type", default)]
    pub tx_type: u8,
}

/// Transaction as executed: recovered sender and effective gas price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub from: Address,
    pub gas_price: U256,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    #[serde(default)]
    pub status: u64,
    #[serde(default)]
    pub cumulative_gas_used: u64,
    pub gas_used: u64,
    #[serde(default)]
    pub logs: Vec<Log>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Emitting contract
    pub address: Address,
    pub topics: Vec<B256>,
    #[serde(default)]
    pub data: Bytes,
    #[serde(default)]
    pub log_index: u64,
}

/// Everything needed to map an ordinary transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionData {
    pub header: Header,
    pub transaction: EvmTransaction,
    pub message: Message,
    pub receipt: Receipt,
    pub trace: Call,
}

/// Block fields relevant to atomic transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockData {
    pub header: Header,
    /// Encoded atomic transactions, if any.
    #[serde(default)]
    pub ext_data: Bytes,
}

#[cfg(feature = "test-utilities")]
pub mod testing {
    use super::*;
    use crate::constants::TRANSFER_TOPIC;
    use crate::core::trace::CallType;

    impl Header {
        pub fn dummy() -> Self {
            Self {
                number: 1,
                coinbase: Address::repeat_byte(0xcb),
                timestamp: 1_600_000_000,
            }
        }

        pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
            self.timestamp = timestamp;
            self
        }
    }

    impl Log {
        /// An ERC20 `Transfer` event.
        pub fn erc20_transfer(contract: Address, from: Address, to: Address, value: U256) -> Self {
            Self {
                address: contract,
                topics: vec![TRANSFER_TOPIC, from.into_word(), to.into_word()],
                data: Bytes::from(value.to_be_bytes::<32>().to_vec()),
                log_index: 0,
            }
        }

        /// An ERC721 `Transfer` event.
        pub fn erc721_transfer(
            contract: Address,
            from: Address,
            to: Address,
            token_id: U256,
        ) -> Self {
            Self {
                address: contract,
                topics: vec![
                    TRANSFER_TOPIC,
                    from.into_word(),
                    to.into_word(),
                    B256::from(token_id.to_be_bytes::<32>()),
                ],
                data: Bytes::new(),
                log_index: 0,
            }
        }
    }

    impl TransactionData {
        pub fn dummy() -> Self {
            let from = Address::repeat_byte(0xaa);
            Self {
                header: Header::dummy(),
                transaction: EvmTransaction {
                    hash: B256::repeat_byte(0x11),
                    gas: 21_000,
                    gas_price: U256::from(25),
                    tx_type: 0,
                },
                message: Message {
                    from,
                    gas_price: U256::from(25),
                },
                receipt: Receipt {
                    status: 1,
                    cumulative_gas_used: 21_000,
                    gas_used: 21_000,
                    logs: vec![],
                    contract_address: None,
                },
                trace: Call::new(CallType::Call, from, Some(Address::repeat_byte(0xbb))),
            }
        }

        pub fn gas(mut self, gas_used: u64, gas_price: u64) -> Self {
            self.receipt.gas_used = gas_used;
            self.message.gas_price = U256::from(gas_price);
            self.transaction.gas_price = U256::from(gas_price);
            self
        }

        pub fn trace(mut self, trace: Call) -> Self {
            self.trace = trace;
            self
        }

        pub fn add_log(mut self, log: Log) -> Self {
            self.receipt.logs.push(log);
            self
        }
    }
}
