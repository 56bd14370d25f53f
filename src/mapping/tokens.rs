use alloy_primitives::Address;
use serde_json::Value;

use super::amounts::account;
use super::amounts::erc20_value;
use super::amounts::signed_value;
use super::index::OperationCounter;
use crate::constants::metadata;
use crate::constants::TOPICS_IN_ERC20_TRANSFER;
use crate::constants::TOPICS_IN_ERC721_TRANSFER;
use crate::constants::TRANSFER_TOPIC;
use crate::core::evm::Log;
use crate::core::types::Amount;
use crate::core::types::Currency;
use crate::core::types::Metadata;
use crate::core::types::Operation;
use crate::core::types::OperationType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStandard {
    Erc20,
    Erc721,
}

/// Standard of a `Transfer` log, if it is one.
///
/// Both standards share the event signature and differ by the token id
/// being indexed (4 topics) or not (3 topics).
pub fn classify(log: &Log) -> Option<TokenStandard> {
    if log.topics.first() != Some(&TRANSFER_TOPIC) {
        return None;
    }
    match log.topics.len() {
        TOPICS_IN_ERC20_TRANSFER => Some(TokenStandard::Erc20),
        TOPICS_IN_ERC721_TRANSFER => Some(TokenStandard::Erc721),
        _ => None,
    }
}

/// Sender and recipient of a transfer-shaped log.
fn parties(log: &Log) -> (Address, Address) {
    (
        Address::from_word(log.topics[1]),
        Address::from_word(log.topics[2]),
    )
}

/// ERC20 mint, burn or transfer.
///
/// `log` must be an ERC20 transfer, see [`classify`].
pub(super) fn erc20_operations(
    log: &Log,
    currency: &Currency,
    counter: &mut OperationCounter,
) -> Vec<Operation> {
    let (from, to) = parties(log);
    let value = erc20_value(&log.data);
    let amount = |negative: bool| Amount {
        value: signed_value(value, negative),
        currency: currency.clone(),
    };

    if from == Address::ZERO {
        let mint = Operation::new(counter.claim(), OperationType::Erc20Mint, account(&to))
            .amount(Some(amount(false)));
        return vec![mint];
    }
    if to == Address::ZERO {
        let burn = Operation::new(counter.claim(), OperationType::Erc20Burn, account(&from))
            .amount(Some(amount(true)));
        return vec![burn];
    }
    let debit = Operation::new(counter.claim(), OperationType::Erc20Transfer, account(&from))
        .amount(Some(amount(true)));
    let credit = Operation::new(counter.claim(), OperationType::Erc20Transfer, account(&to))
        .related_to(debit.index())
        .amount(Some(amount(false)));
    vec![debit, credit]
}

/// ERC721 mint, burn or transfer. Tokens are identified in metadata.
///
/// `log` must be an ERC721 transfer, see [`classify`].
pub(super) fn erc721_operations(log: &Log, counter: &mut OperationCounter) -> Vec<Operation> {
    let (from, to) = parties(log);
    let mut meta = Metadata::new();
    meta.insert(
        metadata::CONTRACT_ADDRESS.to_owned(),
        Value::String(log.address.to_checksum(None)),
    );
    meta.insert(
        metadata::INDEX_TRANSFERRED.to_owned(),
        Value::String(log.topics[3].to_string()),
    );

    if from == Address::ZERO {
        return vec![
            Operation::new(counter.claim(), OperationType::Erc721Mint, account(&to)).metadata(meta),
        ];
    }
    if to == Address::ZERO {
        return vec![
            Operation::new(counter.claim(), OperationType::Erc721Burn, account(&from))
                .metadata(meta),
        ];
    }
    let sender = Operation::new(counter.claim(), OperationType::Erc721Sender, account(&from))
        .metadata(meta.clone());
    let receiver = Operation::new(counter.claim(), OperationType::Erc721Receive, account(&to))
        .related_to(sender.index())
        .metadata(meta);
    vec![sender, receiver]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::OperationIdentifier;
    use alloy_primitives::Bytes;
    use alloy_primitives::B256;
    use alloy_primitives::U256;
    use pretty_assertions::assert_eq;

    fn usdc() -> Currency {
        Currency::new("USDC", 6)
    }

    #[test]
    fn test_classify() {
        let contract = Address::repeat_byte(0xc0);
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let erc20 = Log::erc20_transfer(contract, a, b, U256::from(1));
        let erc721 = Log::erc721_transfer(contract, a, b, U256::from(1));
        assert_eq!(classify(&erc20), Some(TokenStandard::Erc20));
        assert_eq!(classify(&erc721), Some(TokenStandard::Erc721));

        // Wrong signature
        let mut other = erc20.clone();
        other.topics[0] = B256::repeat_byte(0x01);
        assert_eq!(classify(&other), None);

        // Unexpected topic counts are ignored
        let mut short = erc20.clone();
        short.topics.pop();
        assert_eq!(classify(&short), None);
        let mut long = erc721.clone();
        long.topics.push(B256::ZERO);
        assert_eq!(classify(&long), None);

        let empty = Log {
            address: contract,
            topics: vec![],
            data: Bytes::new(),
            log_index: 0,
        };
        assert_eq!(classify(&empty), None);
    }

    #[test]
    fn test_erc20_transfer() {
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let log = Log::erc20_transfer(Address::repeat_byte(0xc0), a, b, U256::from(1_000_000));
        let mut counter = OperationCounter::starting_at(4);
        let ops = erc20_operations(&log, &usdc(), &mut counter);
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].index(), 4);
        assert_eq!(ops[0].op_type, OperationType::Erc20Transfer);
        assert_eq!(ops[0].account, account(&a));
        assert_eq!(ops[0].amount.as_ref().unwrap().value, "-1000000");
        assert_eq!(ops[0].amount.as_ref().unwrap().currency, usdc());
        assert_eq!(ops[1].index(), 5);
        assert_eq!(ops[1].account, account(&b));
        assert_eq!(ops[1].amount.as_ref().unwrap().value, "1000000");
        assert_eq!(ops[1].related_operations, vec![OperationIdentifier::new(4)]);
    }

    #[test]
    fn test_erc20_value_from_last_word() {
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let mut log = Log::erc20_transfer(Address::repeat_byte(0xc0), a, b, U256::from(5));
        let mut data = log.data.to_vec();
        data.extend_from_slice(&[0x11; 32]);
        log.data = Bytes::from(data);
        let ops = erc20_operations(&log, &usdc(), &mut OperationCounter::new());
        assert_eq!(ops.len(), 2);
        assert_eq!(
            ops[1].amount.as_ref().unwrap().value,
            U256::from_be_slice(&[0x11; 32]).to_string()
        );
    }

    #[test]
    fn test_erc20_mint_and_burn() {
        let a = Address::repeat_byte(1);
        let contract = Address::repeat_byte(0xc0);
        let mut counter = OperationCounter::new();

        let mint = Log::erc20_transfer(contract, Address::ZERO, a, U256::from(7));
        let ops = erc20_operations(&mint, &usdc(), &mut counter);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].op_type, OperationType::Erc20Mint);
        assert_eq!(ops[0].account, account(&a));
        assert_eq!(ops[0].amount.as_ref().unwrap().value, "7");

        let burn = Log::erc20_transfer(contract, a, Address::ZERO, U256::from(7));
        let ops = erc20_operations(&burn, &usdc(), &mut counter);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].index(), 1);
        assert_eq!(ops[0].op_type, OperationType::Erc20Burn);
        assert_eq!(ops[0].account, account(&a));
        assert_eq!(ops[0].amount.as_ref().unwrap().value, "-7");
    }

    #[test]
    fn test_erc721_transfer() {
        let contract = Address::repeat_byte(0xc0);
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let log = Log::erc721_transfer(contract, a, b, U256::from(255));
        let mut counter = OperationCounter::new();
        let ops = erc721_operations(&log, &mut counter);
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].op_type, OperationType::Erc721Sender);
        assert_eq!(ops[0].account, account(&a));
        assert_eq!(ops[1].op_type, OperationType::Erc721Receive);
        assert_eq!(ops[1].account, account(&b));
        assert_eq!(ops[1].related_operations, vec![OperationIdentifier::new(0)]);
        for op in &ops {
            assert_eq!(op.amount, None);
            assert_eq!(
                op.metadata[metadata::CONTRACT_ADDRESS],
                Value::String(contract.to_checksum(None))
            );
            assert_eq!(
                op.metadata[metadata::INDEX_TRANSFERRED],
                Value::String(format!("0x{}ff", "0".repeat(62)))
            );
        }
    }

    #[test]
    fn test_erc721_mint_and_burn() {
        let contract = Address::repeat_byte(0xc0);
        let a = Address::repeat_byte(1);
        let mut counter = OperationCounter::new();
        let mint = Log::erc721_transfer(contract, Address::ZERO, a, U256::from(1));
        let burn = Log::erc721_transfer(contract, a, Address::ZERO, U256::from(1));
        let minted = erc721_operations(&mint, &mut counter);
        let burnt = erc721_operations(&burn, &mut counter);
        assert_eq!(minted.len(), 1);
        assert_eq!(minted[0].op_type, OperationType::Erc721Mint);
        assert_eq!(minted[0].account, account(&a));
        assert_eq!(burnt.len(), 1);
        assert_eq!(burnt[0].op_type, OperationType::Erc721Burn);
        assert_eq!(burnt[0].index(), 1);
        assert_eq!(burnt[0].account, account(&a));
    }
}
